use crate::forces::{ForceSubject, PairForce};
use crate::math::Vector2;

/// Separation below which pairwise forces stop growing
pub const DEFAULT_MIN_DISTANCE: f64 = 1.2;

/// Unit vector from source to target and the clamped separation.
///
/// Returns `None` when the two subjects coincide and no direction exists.
fn separation(target: &dyn ForceSubject, source: &dyn ForceSubject, min_distance: f64) -> Option<(Vector2, f64)> {
    let offset = target.position() - source.position();
    let distance = offset.length();
    if distance < crate::math::EPSILON {
        return None;
    }
    Some((offset / distance, distance.max(min_distance)))
}

/// Inverse-power electrostatic force, `strength * q1 * q2 / d^exponent`.
///
/// Like charges repel, unlike charges attract.
#[derive(Debug, Clone)]
pub struct CoulombForce {
    strength: f64,
    exponent: f64,
    min_distance: f64,
}

impl CoulombForce {
    pub fn new(strength: f64, exponent: f64, min_distance: f64) -> Self {
        Self {
            strength,
            exponent,
            min_distance: min_distance.max(0.0),
        }
    }

    pub fn get_strength(&self) -> f64 {
        self.strength
    }

    pub fn get_exponent(&self) -> f64 {
        self.exponent
    }

    pub fn get_min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Signed magnitude at a separation, positive when repulsive
    pub fn magnitude(&self, q1: f64, q2: f64, distance: f64) -> f64 {
        let d = distance.max(self.min_distance);
        self.strength * q1 * q2 / d.powf(self.exponent)
    }
}

impl Default for CoulombForce {
    fn default() -> Self {
        Self::new(500.0, 2.0, DEFAULT_MIN_DISTANCE)
    }
}

impl PairForce for CoulombForce {
    fn model_type(&self) -> &'static str {
        "Coulomb"
    }

    fn force_on(&self, target: &dyn ForceSubject, source: &dyn ForceSubject) -> Vector2 {
        let (q1, q2) = (target.charge(), source.charge());
        if q1 == 0.0 || q2 == 0.0 {
            return Vector2::zero();
        }
        match separation(target, source, self.min_distance) {
            Some((direction, distance)) => direction * self.magnitude(q1, q2, distance),
            None => Vector2::zero(),
        }
    }
}

/// 12-6 Lennard-Jones interaction between neutral particles
#[derive(Debug, Clone)]
pub struct LennardJonesForce {
    /// Separation at which the potential crosses zero
    sigma: f64,

    /// Depth of the potential well
    epsilon: f64,

    min_distance: f64,
}

impl LennardJonesForce {
    pub fn new(sigma: f64, epsilon: f64) -> Self {
        Self::with_min_distance(sigma, epsilon, DEFAULT_MIN_DISTANCE)
    }

    pub fn with_min_distance(sigma: f64, epsilon: f64, min_distance: f64) -> Self {
        Self {
            sigma,
            epsilon,
            min_distance: min_distance.max(0.0),
        }
    }

    pub fn get_sigma(&self) -> f64 {
        self.sigma
    }

    pub fn get_epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Signed magnitude at a separation, positive when repulsive
    pub fn magnitude(&self, distance: f64) -> f64 {
        let d = distance.max(self.min_distance);
        let s6 = (self.sigma / d).powi(6);
        24.0 * self.epsilon / d * (2.0 * s6 * s6 - s6)
    }

    /// Potential energy at a separation
    pub fn potential(&self, distance: f64) -> f64 {
        let d = distance.max(self.min_distance);
        let s6 = (self.sigma / d).powi(6);
        4.0 * self.epsilon * (s6 * s6 - s6)
    }
}

impl PairForce for LennardJonesForce {
    fn model_type(&self) -> &'static str {
        "LennardJones"
    }

    fn force_on(&self, target: &dyn ForceSubject, source: &dyn ForceSubject) -> Vector2 {
        match separation(target, source, self.min_distance) {
            Some((direction, distance)) => direction * self.magnitude(distance),
            None => Vector2::zero(),
        }
    }
}
