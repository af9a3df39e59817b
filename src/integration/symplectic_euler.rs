use crate::bodies::Body;
use crate::integration::BodyIntegrator;
use crate::math::Vector2;

/// Symplectic Euler integrator (semi-implicit Euler).
/// Updates the velocity first, then moves with the new velocity.
pub struct SymplecticEulerIntegrator;

impl SymplecticEulerIntegrator {
    /// Creates a new Symplectic Euler integrator
    pub fn new() -> Self {
        Self
    }
}

impl Default for SymplecticEulerIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyIntegrator for SymplecticEulerIntegrator {
    fn integrate(&self, body: &mut Body, force: Vector2, dt: f64) {
        if body.is_fixed() {
            return;
        }

        let velocity = body.get_velocity() + force * (body.get_inverse_mass() * dt);
        body.set_velocity(velocity);
        body.set_position(body.get_position() + velocity * dt);
        body.set_angle(body.get_angle() + body.get_angular_velocity() * dt);
    }

    fn name(&self) -> &str {
        "SymplecticEuler"
    }
}

/// Explicit Euler with the constant-acceleration position term
pub struct ExplicitEulerIntegrator;

impl ExplicitEulerIntegrator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExplicitEulerIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyIntegrator for ExplicitEulerIntegrator {
    fn integrate(&self, body: &mut Body, force: Vector2, dt: f64) {
        if body.is_fixed() {
            return;
        }

        let acceleration = force * body.get_inverse_mass();
        let velocity = body.get_velocity();
        body.set_position(body.get_position() + velocity * dt + acceleration * (0.5 * dt * dt));
        body.set_velocity(velocity + acceleration * dt);
        body.set_angle(body.get_angle() + body.get_angular_velocity() * dt);
    }

    fn name(&self) -> &str {
        "ExplicitEuler"
    }
}
