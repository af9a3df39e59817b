use phys_micro::math::{approx_eq, lerp, signum_or_zero, Aabb, Vector2, Vector3};
use std::f64::consts::PI;
use approx::assert_relative_eq;

#[test]
fn test_vector2_operations() {
    let v1 = Vector2::new(1.0, 2.0);
    let v2 = Vector2::new(4.0, -1.0);

    assert_eq!(v1 + v2, Vector2::new(5.0, 1.0));
    assert_eq!(v1 - v2, Vector2::new(-3.0, 3.0));
    assert_eq!(v1 * 2.0, Vector2::new(2.0, 4.0));
    assert_eq!(2.0 * v1, Vector2::new(2.0, 4.0));
    assert_eq!(-v1, Vector2::new(-1.0, -2.0));

    assert_relative_eq!(v1.dot(&v2), 2.0);
    assert_relative_eq!(v1.cross(&v2), -9.0);
    assert_relative_eq!(Vector2::new(3.0, 4.0).length(), 5.0);

    let unit = Vector2::new(3.0, 4.0).normalize();
    assert_relative_eq!(unit.length(), 1.0);
    assert_relative_eq!(unit.x, 0.6);

    // Zero vector normalizes to itself instead of NaN
    assert_eq!(Vector2::zero().normalize(), Vector2::zero());
    assert!(Vector2::zero().is_zero());
    assert!(!Vector2::new(f64::NAN, 0.0).is_finite());
}

#[test]
fn test_vector2_rotation_and_cross_scalar() {
    let x = Vector2::new(1.0, 0.0);
    let rotated = x.rotate(PI / 2.0);
    assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-12);

    // ω ẑ × r is r rotated a quarter turn, scaled by ω
    let spun = Vector2::cross_scalar(2.0, &x);
    assert_relative_eq!(spun.x, 0.0);
    assert_relative_eq!(spun.y, 2.0);

    let polar = Vector2::from_polar(2.0, PI);
    assert_relative_eq!(polar.x, -2.0, epsilon = 1e-12);
    assert_relative_eq!(polar.angle().abs(), PI, epsilon = 1e-12);
}

#[test]
fn test_vector3_cross_matches_planar_cross() {
    let a = Vector2::new(1.0, 2.0);
    let b = Vector2::new(-3.0, 0.5);
    let cross = a.extend(0.0).cross(&b.extend(0.0));

    assert_relative_eq!(cross.x, 0.0);
    assert_relative_eq!(cross.y, 0.0);
    assert_relative_eq!(cross.z, a.cross(&b));
    assert_eq!(Vector3::unit_z().truncate(), Vector2::zero());

    let na = a.to_nalgebra();
    assert_eq!(Vector2::from_nalgebra(&na), a);
}

#[test]
fn test_aabb_operations() {
    let a = Aabb::from_circle(Vector2::new(0.0, 0.0), 1.0);
    let b = Aabb::from_circle(Vector2::new(1.5, 0.0), 1.0);
    let c = Aabb::from_circle(Vector2::new(5.0, 5.0), 1.0);

    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
    assert!(a.contains_point(Vector2::new(0.5, -0.5)));
    assert!(!a.contains_point(Vector2::new(1.5, 0.0)));

    let merged = a.merged(&c);
    assert_eq!(merged.min, Vector2::new(-1.0, -1.0));
    assert_eq!(merged.max, Vector2::new(6.0, 6.0));
    assert_relative_eq!(merged.width(), 7.0);

    let points = [Vector2::new(1.0, 3.0), Vector2::new(-2.0, 0.0), Vector2::new(0.0, 4.0)];
    let bounds = Aabb::from_points(&points).unwrap();
    assert_eq!(bounds.min, Vector2::new(-2.0, 0.0));
    assert_eq!(bounds.max, Vector2::new(1.0, 4.0));
    assert!(Aabb::from_points(&[]).is_none());
}

#[test]
fn test_scalar_helpers() {
    assert!(approx_eq(1.0, 1.0 + 1e-12, 1e-9));
    assert!(!approx_eq(1.0, 1.1, 1e-9));
    assert_relative_eq!(lerp(2.0, 4.0, 0.25), 2.5);
    assert_eq!(signum_or_zero(0.0), 0.0);
    assert_eq!(signum_or_zero(-3.0), -1.0);
    assert_eq!(signum_or_zero(0.1), 1.0);
}
