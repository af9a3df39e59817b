use phys_micro::bodies::{Body, BodyFlags, Species};
use phys_micro::core::{BodyHandle, HandleStorage, Storage};
use phys_micro::forces::{
    limit_friction, CoulombForce, Environment, ForceModel, ForceRegistry, FrictionForce, GravityForce, LennardJonesForce,
    PairForce, SpringForce, ThrustForce, DEFAULT_FRICTION_GAIN,
};
use phys_micro::math::Vector2;
use approx::assert_relative_eq;

fn disk_at(x: f64, y: f64) -> Body {
    Body::disk(Species(1), 2.0, 0.5).unwrap().with_position(Vector2::new(x, y))
}

#[test]
fn test_gravity_respects_flag() {
    let environment = Environment::default();
    let falling = disk_at(0.0, 0.0).with_flags(BodyFlags::default() | BodyFlags::AFFECTED_BY_GRAVITY);
    let floating = disk_at(0.0, 0.0);

    let gravity = GravityForce::new();
    let force = gravity.compute_force(&falling, &environment);
    assert_relative_eq!(force.x, 0.0);
    assert_relative_eq!(force.y, -19.6);
    assert!(gravity.compute_force(&floating, &environment).is_zero());
}

#[test]
fn test_thrust_scales_with_mass() {
    let environment = Environment {
        thrust: Vector2::new(3.0, 0.0),
        ..Environment::empty()
    };
    let force = ThrustForce::new().compute_force(&disk_at(0.0, 0.0), &environment);
    assert_relative_eq!(force.x, 6.0);
}

#[test]
fn test_friction_is_anti_parallel_to_velocity() {
    let environment = Environment {
        friction_coefficient: 0.1,
        ..Environment::default()
    };
    let body = disk_at(0.0, 0.0).with_velocity(Vector2::new(3.0, 4.0));
    let friction = FrictionForce::default();
    let force = friction.compute_force(&body, &environment);

    // |F| = coefficient * m|g| * gain
    let expected = 0.1 * 2.0 * 9.8 * DEFAULT_FRICTION_GAIN;
    assert_relative_eq!(force.length(), expected, epsilon = 1e-9);
    assert_relative_eq!(force.normalize().dot(&Vector2::new(0.6, 0.8)), -1.0, epsilon = 1e-12);
    assert!(friction.is_dissipative());

    let resting = disk_at(0.0, 0.0);
    assert!(friction.compute_force(&resting, &environment).is_zero());
}

#[test]
fn test_coulomb_sign_and_distance_clamp() {
    let coulomb = CoulombForce::default();
    let a = disk_at(0.0, 0.0).with_charge(1.0);
    let like = disk_at(2.0, 0.0).with_charge(1.0);
    let unlike = disk_at(2.0, 0.0).with_charge(-1.0);

    // Like charges push the target away from the source
    let repulsion = coulomb.force_on(&like, &a);
    assert!(repulsion.x > 0.0);
    assert_relative_eq!(repulsion.x, 500.0 / 4.0, epsilon = 1e-9);

    let attraction = coulomb.force_on(&unlike, &a);
    assert!(attraction.x < 0.0);

    // Closer than the minimum distance behaves as if at the minimum
    let close = disk_at(0.5, 0.0).with_charge(1.0);
    let clamped = coulomb.force_on(&close, &a);
    assert_relative_eq!(clamped.x, 500.0 / (1.2 * 1.2), epsilon = 1e-9);

    // Neutral bodies feel nothing
    assert!(coulomb.force_on(&disk_at(2.0, 0.0), &a).is_zero());
}

#[test]
fn test_lennard_jones_zero_crossing() {
    let sigma = 2.0;
    let lj = LennardJonesForce::new(sigma, 1.0);
    let equilibrium = 2.0_f64.powf(1.0 / 6.0) * sigma;

    assert_relative_eq!(lj.magnitude(equilibrium), 0.0, epsilon = 1e-9);
    assert!(lj.magnitude(equilibrium * 0.9) > 0.0);
    assert!(lj.magnitude(equilibrium * 1.5) < 0.0);
    assert_relative_eq!(lj.potential(sigma), 0.0, epsilon = 1e-12);

    // Clamped below the minimum distance
    assert_relative_eq!(lj.magnitude(0.1), lj.magnitude(1.2));

    let a = disk_at(0.0, 0.0);
    let b = disk_at(equilibrium * 1.5, 0.0);
    assert!(lj.force_on(&b, &a).x < 0.0);
}

#[test]
fn test_registry_composes_models() {
    let mut registry = ForceRegistry::with_defaults(DEFAULT_FRICTION_GAIN);
    registry.add_pair_force(Box::new(CoulombForce::default()));
    assert_eq!(registry.model_types(), vec!["Gravity", "Thrust", "Friction", "Coulomb"]);

    let mut bodies: HandleStorage<BodyHandle, Body> = HandleStorage::new();
    let a = bodies.add(disk_at(0.0, 0.0).with_charge(1.0));
    let b = bodies.add(disk_at(2.0, 0.0).with_charge(1.0));

    let forces = registry.accumulate(&bodies, &Environment::empty());
    assert_eq!(forces.len(), 2);
    let (handle_a, force_a) = forces[0];
    let (handle_b, force_b) = forces[1];
    assert_eq!(handle_a, a);
    assert_eq!(handle_b, b);

    // Newton's third law for the pair force
    assert_relative_eq!(force_a.x, -force_b.x, epsilon = 1e-9);
    assert!(force_a.x < 0.0);
}

#[test]
fn test_spring_pulls_toward_anchor() {
    let mut bodies: HandleStorage<BodyHandle, Body> = HandleStorage::new();
    let a = bodies.add(disk_at(3.0, 0.0));

    let spring = SpringForce::anchored_at(a, Vector2::zero(), 1.0, 10.0, 0.0);
    let (on_a, on_anchor) = spring.forces(&bodies).unwrap();
    assert_relative_eq!(on_a.x, -20.0, epsilon = 1e-9);
    assert!(on_anchor.is_none());

    let mut registry = ForceRegistry::new();
    registry.add_spring(spring);
    assert_eq!(registry.len(), 1);
    registry.remove_springs_for(a);
    assert!(registry.is_empty());
}

#[test]
fn test_friction_is_capped_at_rest() {
    let body = disk_at(0.0, 0.0).with_velocity(Vector2::new(1.0, 0.0));
    let dt = 0.1;

    // Enough friction to reverse the body: the force stops it instead
    let stopping = limit_friction(&body, Vector2::new(-50.0, 0.0), Vector2::new(-50.0, 0.0), dt);
    assert_relative_eq!(stopping.x, -20.0, epsilon = 1e-9);
    assert_relative_eq!(stopping.y, 0.0);

    // Other forces count before friction is weighed
    let pushed = limit_friction(&body, Vector2::new(-47.0, 0.0), Vector2::new(-50.0, 0.0), dt);
    assert_relative_eq!(pushed.x, -20.0, epsilon = 1e-9);

    let gentle = limit_friction(&body, Vector2::new(-5.0, 0.0), Vector2::new(-5.0, 0.0), dt);
    assert_eq!(gentle, Vector2::new(-5.0, 0.0));

    let pinned = body.clone().with_flags(BodyFlags::default() | BodyFlags::FIXED);
    let untouched = limit_friction(&pinned, Vector2::new(-50.0, 0.0), Vector2::new(-50.0, 0.0), dt);
    assert_eq!(untouched, Vector2::new(-50.0, 0.0));
}
