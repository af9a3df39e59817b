mod vector;
mod aabb;

pub use vector::{Vector2, Vector3};
pub use aabb::Aabb;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f64 = 1.0e-9;

/// Returns true if the two values agree within a relative tolerance
#[inline]
pub fn approx_eq(a: f64, b: f64, relative: f64) -> bool {
    approx::relative_eq!(a, b, epsilon = EPSILON, max_relative = relative)
}

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f64) -> bool {
    a.abs() < EPSILON
}

/// Clamps a value between a minimum and maximum value
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Linearly interpolates between two values
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Sign of `value`, with zero mapping to zero (unlike `f64::signum`)
#[inline]
pub fn signum_or_zero(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
