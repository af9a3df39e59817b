use phys_micro::bodies::{Body, BodyFlags, Bond, Member, Species};
use phys_micro::collision::DistinctSpeciesCriteria;
use phys_micro::core::{
    BodyEvent, BodyEventType, CollisionOutcome, CommandQueue, PhysicsWorld, SimulationConfig, StepState,
};
use phys_micro::error::PhysicsError;
use phys_micro::forces::Environment;
use phys_micro::integration::EulerIntegrator;
use phys_micro::math::Vector2;
use phys_micro::track::{LineTrack, TrackParticle};
use approx::assert_relative_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn disk(species: u32, x: f64, vx: f64) -> Body {
    Body::disk(Species(species), 1.0, 1.0)
        .unwrap()
        .with_position(Vector2::new(x, 0.0))
        .with_velocity(Vector2::new(vx, 0.0))
}

fn diatomic(x: f64) -> Body {
    let members = vec![
        Member::new(Species(1), 1.0, 0.5, Vector2::new(-0.5, 0.0)),
        Member::new(Species(1), 1.0, 0.5, Vector2::new(0.5, 0.0)),
    ];
    Body::from_members(members, vec![Bond { a: 0, b: 1 }], Vector2::new(x, 0.0)).unwrap()
}

#[test]
fn test_world_creation() {
    let world = PhysicsWorld::new();
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.rider_count(), 0);
    assert_eq!(world.state(), StepState::Idle);
    assert_eq!(world.get_time(), 0.0);

    let bad = SimulationConfig {
        track_substeps: 0,
        ..SimulationConfig::default()
    };
    assert!(matches!(PhysicsWorld::with_config(bad), Err(PhysicsError::InvalidParameter(_))));
}

#[test]
fn test_step_rejects_bad_time_step() {
    let mut world = PhysicsWorld::new();
    assert!(world.step(0.0).is_err());
    assert!(world.step(f64::NAN).is_err());
    assert_eq!(world.state(), StepState::Idle);
    assert_eq!(world.diagnostics().steps, 0);

    world.step_default().unwrap();
    assert_relative_eq!(world.get_time(), world.get_config().time_step);
}

#[test]
fn test_free_body_falls_only_with_gravity_flag() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let falling = world.add_body(disk(1, 0.0, 0.0).with_flags(BodyFlags::default() | BodyFlags::AFFECTED_BY_GRAVITY));
    let floating = world.add_body(disk(1, 10.0, 0.0));

    world.step(0.1).unwrap();

    assert_relative_eq!(world.get_body(falling).unwrap().get_velocity().y, -0.98, epsilon = 1e-12);
    assert!(world.get_body(floating).unwrap().get_velocity().is_zero());
}

#[test]
fn test_friction_brings_sliding_body_to_rest() {
    init_logger();
    let mut world = PhysicsWorld::new();
    world.set_environment(Environment {
        friction_coefficient: 0.01,
        ..Environment::default()
    });
    let handle = world.add_body(disk(1, 0.0, 0.3));

    let mut last_x = 0.0;
    for _ in 0..30 {
        world.step(1.0 / 30.0).unwrap();
        let body = world.get_body(handle).unwrap();
        assert!(body.get_velocity().x > -1e-12);
        assert!(body.get_position().x >= last_x - 1e-12);
        last_x = body.get_position().x;
    }

    let body = world.get_body(handle).unwrap();
    assert!(body.get_velocity().is_zero());
    assert!(last_x > 0.0);
}

#[test]
fn test_equal_disks_meeting_at_midpoint_exchange_velocities() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let left = Body::disk(Species(1), 1.0, 0.5)
        .unwrap()
        .with_position(Vector2::new(-0.5, 0.0))
        .with_velocity(Vector2::new(2.0, 0.0));
    let right = Body::disk(Species(1), 1.0, 0.5)
        .unwrap()
        .with_position(Vector2::new(0.5, 0.0))
        .with_velocity(Vector2::new(-2.0, 0.0));
    let a = world.add_body(left);
    let b = world.add_body(right);

    world.step(0.01).unwrap();

    assert_eq!(world.diagnostics().collisions, 1);
    let (va, vb) = (world.get_body(a).unwrap().get_velocity(), world.get_body(b).unwrap().get_velocity());
    assert_relative_eq!(va.x, -2.0, epsilon = 1e-9);
    assert_relative_eq!(va.y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(vb.x, 2.0, epsilon = 1e-9);
    assert_relative_eq!(vb.y, 0.0, epsilon = 1e-12);
}

#[test]
fn test_riders_follow_their_track() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let track = Arc::new(LineTrack::new(Vector2::new(0.0, 10.0), Vector2::new(10.0, 0.0)).unwrap());
    let particle = TrackParticle::new(track, 1.0).unwrap().with_alpha(0.1);
    let rider = world.add_rider(particle, Box::new(EulerIntegrator::new()));

    for _ in 0..10 {
        world.step(0.01).unwrap();
    }

    let particle = world.get_rider(rider).unwrap();
    assert!(particle.get_velocity() > 0.0);
    assert!(particle.get_alpha() > 0.1);
    assert_eq!(world.rider_integrator(rider).unwrap(), "Euler");
    assert_eq!(world.diagnostics().skipped_bodies, 0);

    world.remove_rider(rider).unwrap();
    assert!(world.get_rider(rider).is_err());
}

#[test]
fn test_non_finite_body_is_skipped() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let broken = world.add_body(disk(1, 0.0, f64::NAN));
    let healthy = world.add_body(disk(1, 10.0, 1.0));

    world.step(0.1).unwrap();

    assert_eq!(world.diagnostics().skipped_bodies, 1);
    assert!(world.get_body(broken).unwrap().get_velocity().x.is_nan());
    assert_relative_eq!(world.get_body(healthy).unwrap().get_position().x, 10.1, epsilon = 1e-12);
}

#[test]
fn test_elastic_collision_in_world() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let a = world.add_body(disk(1, 0.0, 2.0));
    let b = world.add_body(disk(1, 1.8, -2.0));

    world.step(0.01).unwrap();

    assert_eq!(world.diagnostics().collisions, 1);
    assert_relative_eq!(world.get_body(a).unwrap().get_velocity().x, -2.0, epsilon = 1e-9);
    assert_relative_eq!(world.get_body(b).unwrap().get_velocity().x, 2.0, epsilon = 1e-9);

    let events: Vec<_> = world.get_events().collision_events_for_body(a);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0].outcome, CollisionOutcome::Impulse(_)));
}

#[test]
fn test_bonding_replaces_bodies_with_product() {
    init_logger();
    let mut world = PhysicsWorld::new();
    world.set_reaction_criteria(Box::new(DistinctSpeciesCriteria::new(1.0)));
    let a = world.add_body(disk(1, 0.0, 2.0));
    let b = world.add_body(disk(2, 1.8, -1.0));

    world.step(0.01).unwrap();

    assert_eq!(world.body_count(), 1);
    assert_eq!(world.diagnostics().reactions, 1);
    assert!(world.get_body(a).is_err());
    assert!(world.get_body(b).is_err());

    let events = world.get_events();
    assert_eq!(events.body_events_of_type(BodyEventType::Added).len(), 2);
    assert_eq!(events.body_events_of_type(BodyEventType::Removed).len(), 2);
    let merged = events.body_events_of_type(BodyEventType::Merged);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].sources, vec![a, b]);

    let product = world.get_body(merged[0].body).unwrap();
    assert!(product.is_composite());
    assert_relative_eq!(product.linear_momentum().x, 1.0, epsilon = 1e-9);
}

#[test]
fn test_composite_pairs_are_counted_and_skipped() {
    init_logger();
    let mut world = PhysicsWorld::new();
    world.add_body(diatomic(0.0));
    world.add_body(diatomic(1.5));

    world.step(0.01).unwrap();

    assert_eq!(world.diagnostics().unsupported_pairs, 1);
    assert_eq!(world.diagnostics().collisions, 0);
    assert_eq!(world.body_count(), 2);
}

#[test]
fn test_observer_commands_apply_next_step() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let seen_states = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen_states);
    let mut queued = false;

    world.observers_mut().on_step(Box::new(move |world: &PhysicsWorld, commands: &mut CommandQueue| {
        if let Ok(mut states) = recorder.lock() {
            states.push(world.state());
        }
        if !queued {
            commands.add_body(disk(1, 5.0, 0.0));
            queued = true;
        }
    }));

    world.step(0.01).unwrap();
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.state(), StepState::Idle);

    world.step(0.01).unwrap();
    assert_eq!(world.body_count(), 1);
    assert_eq!(world.get_events().body_events_of_type(BodyEventType::Added).len(), 1);

    let states = seen_states.lock().unwrap();
    assert_eq!(*states, vec![StepState::Stepping, StepState::Stepping]);
}

#[test]
fn test_body_observers_see_removals() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let removed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&removed);
    world.observers_mut().on_body_event(Box::new(move |event: &BodyEvent, _: &mut CommandQueue| {
        if event.event_type == BodyEventType::Removed {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }));

    let handle = world.add_body(disk(1, 0.0, 0.0));
    world.step(0.01).unwrap();
    world.remove_body(handle).unwrap();
    assert!(world.remove_body(handle).is_err());
    assert_eq!(removed.load(Ordering::SeqCst), 0);

    world.step(0.01).unwrap();
    assert_eq!(removed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_electrons_move_with_world_step() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let (circuit, particles) = world.circuit_and_particles_mut();
    let j1 = circuit.add_junction();
    let j2 = circuit.add_junction();
    let branch = circuit.add_branch(j1, j2, 4.0).unwrap();
    circuit.set_current(branch, 5.0).unwrap();
    let electron = particles.add_at(circuit, branch, 1.0).unwrap();

    world.step(1.0).unwrap();

    let moved = world.particles().get(electron).unwrap();
    assert_relative_eq!(moved.get_distance(), 1.05, epsilon = 1e-12);
    assert!(!world.speed_limited());
}
