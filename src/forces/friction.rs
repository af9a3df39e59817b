use crate::bodies::Body;
use crate::forces::{Environment, ForceModel, ForceSubject};
use crate::math::Vector2;

/// Default empirical multiplier on `coefficient * |N|`
pub const DEFAULT_FRICTION_GAIN: f64 = 25.0;

/// Sliding friction opposing the subject's velocity.
///
/// Magnitude is `coefficient * |normal force| * gain`. The gain is an
/// empirical tuning knob, not a physical constant.
#[derive(Debug, Clone)]
pub struct FrictionForce {
    gain: f64,
}

impl FrictionForce {
    pub fn new(gain: f64) -> Self {
        Self { gain: gain.max(0.0) }
    }

    pub fn get_gain(&self) -> f64 {
        self.gain
    }

    pub fn set_gain(&mut self, gain: f64) {
        self.gain = gain.max(0.0);
    }

    /// Friction magnitude for the subject, ignoring direction
    pub fn magnitude(&self, subject: &dyn ForceSubject, environment: &Environment) -> f64 {
        let coefficient = subject.friction_coefficient(environment);
        if coefficient == 0.0 {
            return 0.0;
        }
        coefficient * subject.normal_force(environment).abs() * self.gain
    }
}

impl Default for FrictionForce {
    fn default() -> Self {
        Self::new(DEFAULT_FRICTION_GAIN)
    }
}

impl ForceModel for FrictionForce {
    fn model_type(&self) -> &'static str {
        "Friction"
    }

    fn compute_force(&self, subject: &dyn ForceSubject, environment: &Environment) -> Vector2 {
        let velocity = subject.velocity();
        if velocity.is_zero() {
            return Vector2::zero();
        }
        let magnitude = self.magnitude(subject, environment);
        if magnitude == 0.0 {
            return Vector2::zero();
        }
        velocity.with_magnitude(-magnitude)
    }

    fn is_dissipative(&self) -> bool {
        true
    }
}

/// Caps the friction share of a free body's net force.
///
/// When `friction` would reverse the velocity left by the rest of `net` over
/// `dt`, the returned force instead brings the body to rest at the end of the
/// step. Fixed bodies and frictionless forces pass through unchanged.
pub fn limit_friction(body: &Body, net: Vector2, friction: Vector2, dt: f64) -> Vector2 {
    let inverse_mass = body.get_inverse_mass();
    if friction.is_zero() || inverse_mass == 0.0 || dt <= 0.0 {
        return net;
    }
    let scale = inverse_mass * dt;
    let driven = body.get_velocity() + (net - friction) * scale;
    let after = driven + friction * scale;
    if driven.dot(&after) > 0.0 {
        return net;
    }
    body.get_velocity() * (-1.0 / scale)
}
