use crate::forces::{Environment, ForceModel, ForceSubject};
use crate::math::Vector2;

/// Uniform gravity, `mass * environment.gravity`
#[derive(Debug, Clone)]
pub struct GravityForce {
    /// Multiplier on the environment's gravity (1 for real gravity)
    scale: f64,
}

impl GravityForce {
    pub fn new() -> Self {
        Self { scale: 1.0 }
    }

    /// Gravity scaled by a constant factor
    pub fn scaled(scale: f64) -> Self {
        Self { scale }
    }

    pub fn get_scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }
}

impl Default for GravityForce {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceModel for GravityForce {
    fn model_type(&self) -> &'static str {
        "Gravity"
    }

    fn compute_force(&self, subject: &dyn ForceSubject, environment: &Environment) -> Vector2 {
        if !subject.affected_by_gravity() {
            return Vector2::zero();
        }
        environment.gravity * (subject.mass() * self.scale)
    }
}

/// User-controlled thrust, `mass * environment.thrust`
#[derive(Debug, Clone, Default)]
pub struct ThrustForce;

impl ThrustForce {
    pub fn new() -> Self {
        Self
    }
}

impl ForceModel for ThrustForce {
    fn model_type(&self) -> &'static str {
        "Thrust"
    }

    fn compute_force(&self, subject: &dyn ForceSubject, environment: &Environment) -> Vector2 {
        environment.thrust * subject.mass()
    }
}
