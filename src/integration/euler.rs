use crate::forces::{Environment, ForceRegistry};
use crate::integration::{handle_boundary, stop_on_reversal, Integrator};
use crate::track::TrackParticle;

/// Forward Euler along the track.
///
/// Work done by friction over the sub-step is converted into thermal energy,
/// and friction stops the rider rather than reversing it.
pub struct EulerIntegrator;

impl EulerIntegrator {
    /// Creates a new Euler integrator
    pub fn new() -> Self {
        Self
    }
}

impl Default for EulerIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for EulerIntegrator {
    fn integrate(&self, particle: &mut TrackParticle, forces: &ForceRegistry, environment: &Environment, dt: f64) {
        let origin = particle.position();
        let acceleration = particle.tangential_acceleration(forces, environment);

        let velocity = particle.get_velocity();
        let next_velocity = velocity + acceleration * dt;
        if stop_on_reversal(particle, next_velocity, forces, environment, dt) {
            return;
        }

        let distance = velocity * dt + 0.5 * acceleration * dt * dt;
        let alpha = particle.get_alpha();
        let step = particle.track().fractional_distance(alpha, distance);
        particle.set_alpha(alpha + step);
        particle.set_velocity(next_velocity);

        particle.accumulate_friction_heat(origin, forces, environment);
        handle_boundary(particle);
    }

    fn name(&self) -> &str {
        "Euler"
    }
}

/// Moves at constant speed, ignoring every force
pub struct ConstantVelocityIntegrator;

impl ConstantVelocityIntegrator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConstantVelocityIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for ConstantVelocityIntegrator {
    fn integrate(&self, particle: &mut TrackParticle, _forces: &ForceRegistry, _environment: &Environment, dt: f64) {
        let alpha = particle.get_alpha();
        let step = particle.track().fractional_distance(alpha, particle.get_velocity() * dt);
        particle.set_alpha(alpha + step);
        handle_boundary(particle);
    }

    fn name(&self) -> &str {
        "ConstantVelocity"
    }
}
