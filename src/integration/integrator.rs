use crate::bodies::Body;
use crate::forces::{Environment, ForceRegistry};
use crate::integration::handle_boundary;
use crate::math::Vector2;
use crate::track::TrackParticle;

/// Numerical integration of a particle constrained to a track
pub trait Integrator: Send + Sync {
    /// Advances the particle by one sub-step and applies the boundary handler
    fn integrate(&self, particle: &mut TrackParticle, forces: &ForceRegistry, environment: &Environment, dt: f64);

    /// Returns the name of the integrator
    fn name(&self) -> &str;
}

/// Numerical integration of a free body under a known net force
pub trait BodyIntegrator: Send + Sync {
    /// Advances position, velocity and orientation of the body over `dt`
    fn integrate(&self, body: &mut Body, force: Vector2, dt: f64);

    /// Returns the name of the integrator
    fn name(&self) -> &str;
}

/// Ends the sub-step at rest when friction would carry the rider's speed
/// through zero.
///
/// The rider covers the distance of its average speed over the sub-step and
/// the mechanical energy it lost becomes heat. Returns false and leaves the
/// rider alone when `next_velocity` keeps the current direction or no
/// friction acts.
pub fn stop_on_reversal(
    particle: &mut TrackParticle,
    next_velocity: f64,
    forces: &ForceRegistry,
    environment: &Environment,
    dt: f64,
) -> bool {
    let velocity = particle.get_velocity();
    if velocity == 0.0 || velocity * next_velocity > 0.0 {
        return false;
    }
    if forces.dissipative_force(&particle.state(), environment).is_zero() {
        return false;
    }

    let alpha = particle.get_alpha();
    let rest = alpha + particle.track().fractional_distance(alpha, 0.5 * velocity * dt);
    particle.come_to_rest(rest, environment);
    handle_boundary(particle);
    true
}
