use crate::forces::{Environment, ForceRegistry};
use crate::integration::{handle_boundary, stop_on_reversal, Integrator};
use crate::track::TrackParticle;

/// Velocity Verlet along the track: the position uses the starting
/// acceleration, the velocity the average of the starting and ending ones.
pub struct VerletIntegrator;

impl VerletIntegrator {
    /// Creates a new Velocity Verlet integrator
    pub fn new() -> Self {
        Self
    }
}

impl Default for VerletIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared Verlet step with both accelerations multiplied by `scale`
fn verlet_step(particle: &mut TrackParticle, forces: &ForceRegistry, environment: &Environment, dt: f64, scale: f64) {
    let origin = particle.position();
    let alpha = particle.get_alpha();
    let velocity = particle.get_velocity();

    let initial = scale * particle.tangential_acceleration_at(alpha, velocity, forces, environment);
    let distance = velocity * dt + 0.5 * initial * dt * dt;
    let new_alpha = alpha + particle.track().fractional_distance(alpha, distance);

    let last = scale * particle.tangential_acceleration_at(new_alpha, velocity, forces, environment);
    let next_velocity = velocity + 0.5 * (initial + last) * dt;
    if stop_on_reversal(particle, next_velocity, forces, environment, dt) {
        return;
    }
    particle.set_alpha(new_alpha);
    particle.set_velocity(next_velocity);

    particle.accumulate_friction_heat(origin, forces, environment);
    handle_boundary(particle);
}

impl Integrator for VerletIntegrator {
    fn integrate(&self, particle: &mut TrackParticle, forces: &ForceRegistry, environment: &Environment, dt: f64) {
        verlet_step(particle, forces, environment, dt, 1.0);
    }

    fn name(&self) -> &str {
        "Verlet"
    }
}

/// Verlet for a rider whose centre of mass sits `offset` away from the track.
///
/// Accelerations are scaled by `(R / (R + L))^2 * (1 + L / R)` with `R` the
/// signed radius of curvature at the start of the step and `L` the offset.
pub struct VerletOffsetIntegrator {
    offset: f64,
}

impl VerletOffsetIntegrator {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }

    pub fn get_offset(&self) -> f64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    /// Acceleration scale for a radius of curvature; 1 on straight track
    pub fn scale_factor(&self, radius: f64) -> f64 {
        if !radius.is_finite() || (radius + self.offset).abs() < crate::math::EPSILON || radius == 0.0 {
            return 1.0;
        }
        let ratio = radius / (radius + self.offset);
        ratio * ratio * (1.0 + self.offset / radius)
    }
}

impl Integrator for VerletOffsetIntegrator {
    fn integrate(&self, particle: &mut TrackParticle, forces: &ForceRegistry, environment: &Environment, dt: f64) {
        let scale = self.scale_factor(particle.radius_of_curvature());
        verlet_step(particle, forces, environment, dt, scale);
    }

    fn name(&self) -> &str {
        "VerletOffset"
    }
}
