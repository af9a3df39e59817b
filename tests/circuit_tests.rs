use phys_micro::circuit::{Circuit, CircuitLocation, ConstantDensityPropagator, DestinationPolicy, ParticleSet};
use phys_micro::core::{BranchHandle, Diagnostics, JunctionHandle, MovingAverage, PropagatorConfig};
use phys_micro::error::PhysicsError;
use approx::assert_relative_eq;

/// Three junctions in a row: `first` runs j1 -> j2, `second` runs j2 -> j3
fn series(current: f64) -> (Circuit, BranchHandle, BranchHandle) {
    let mut circuit = Circuit::new();
    let j1 = circuit.add_junction();
    let j2 = circuit.add_junction();
    let j3 = circuit.add_junction();
    let first = circuit.add_branch(j1, j2, 1.0).unwrap();
    let second = circuit.add_branch(j2, j3, 2.0).unwrap();
    circuit.set_current(first, current).unwrap();
    circuit.set_current(second, current).unwrap();
    (circuit, first, second)
}

/// One incoming branch splitting into two outgoing branches of equal length
fn fork() -> (Circuit, BranchHandle, BranchHandle, BranchHandle) {
    let mut circuit = Circuit::new();
    let source = circuit.add_junction();
    let split = circuit.add_junction();
    let left = circuit.add_junction();
    let right = circuit.add_junction();
    let incoming = circuit.add_branch(source, split, 1.0).unwrap();
    let a = circuit.add_branch(split, left, 2.0).unwrap();
    let b = circuit.add_branch(split, right, 2.0).unwrap();
    for branch in [incoming, a, b] {
        circuit.set_current(branch, 5.0).unwrap();
    }
    (circuit, incoming, a, b)
}

#[test]
fn test_circuit_validation() {
    let mut circuit = Circuit::new();
    let j1 = circuit.add_junction();
    let j2 = circuit.add_junction();
    assert_eq!(circuit.num_junctions(), 2);

    let missing: JunctionHandle = phys_micro::core::Handle::from_raw(42);
    assert!(matches!(circuit.add_branch(j1, missing, 1.0), Err(PhysicsError::ResourceNotFound(_))));
    assert!(matches!(circuit.add_branch(j1, j2, 0.0), Err(PhysicsError::InvalidGeometry(_))));

    let branch = circuit.add_branch(j1, j2, 2.0).unwrap();
    assert!(matches!(circuit.set_current(branch, f64::NAN), Err(PhysicsError::InvalidParameter(_))));
    circuit.set_current(branch, -3.0).unwrap();
    assert_relative_eq!(circuit.max_current(), 3.0);
    assert_eq!(circuit.adjacent_branches(j2), vec![branch]);
}

#[test]
fn test_location_must_lie_on_branch() {
    let (circuit, _, second) = series(0.0);

    assert!(CircuitLocation::new(&circuit, second, 0.0).is_ok());
    assert!(CircuitLocation::new(&circuit, second, 2.0).is_ok());
    assert!(matches!(CircuitLocation::new(&circuit, second, 2.5), Err(PhysicsError::InvalidGeometry(_))));
    assert!(matches!(CircuitLocation::new(&circuit, second, -0.1), Err(PhysicsError::InvalidGeometry(_))));
    assert!(CircuitLocation::new(&circuit, second, f64::NAN).is_err());
}

#[test]
fn test_particle_set_neighbours_and_density() {
    let (circuit, first, second) = series(0.0);
    let mut particles = ParticleSet::new();
    let low = particles.add_at(&circuit, second, 0.5).unwrap();
    let mid = particles.add_at(&circuit, second, 1.0).unwrap();
    let high = particles.add_at(&circuit, second, 1.8).unwrap();
    particles.add_at(&circuit, first, 0.9).unwrap();

    assert_eq!(particles.upper_neighbor(mid), Some(high));
    assert_eq!(particles.lower_neighbor(mid), Some(low));
    assert_eq!(particles.lower_neighbor(low), None);
    assert_eq!(particles.upper_neighbor(high), None);

    assert_relative_eq!(particles.density(&circuit, second).unwrap(), 1.5);
    assert_relative_eq!(particles.distance_to_closest_electron(second, 1.2), 0.2, epsilon = 1e-12);

    assert_eq!(particles.remove_branch(second), 3);
    assert_eq!(particles.len(), 1);
    assert_eq!(particles.distance_to_closest_electron(second, 1.0), f64::INFINITY);
}

#[test]
fn test_fill_branch_spacing() {
    let (circuit, _, second) = series(0.0);
    let mut particles = ParticleSet::new();

    let added = particles.fill_branch(&circuit, second, 0.56).unwrap();
    assert_eq!(added.len(), 4);
    let distances: Vec<f64> = added.iter().map(|h| particles.get(*h).unwrap().get_distance()).collect();
    for (actual, expected) in distances.iter().zip([0.25, 0.75, 1.25, 1.75]) {
        assert_relative_eq!(*actual, expected, epsilon = 1e-12);
    }

    assert!(particles.fill_branch(&circuit, second, 0.0).is_err());
}

#[test]
fn test_overshoot_carries_into_next_branch() {
    let (circuit, first, second) = series(5.0);
    let mut particles = ParticleSet::new();
    let electron = particles.add_at(&circuit, first, 0.99).unwrap();

    let mut propagator = ConstantDensityPropagator::new(PropagatorConfig::default(), 7);
    let mut diagnostics = Diagnostics::new();
    assert_relative_eq!(propagator.update_speed_scale(&circuit, 1.0), 1.0);
    propagator.propagate(electron, &mut particles, &circuit, 1.0, &mut diagnostics);

    // dx = 5 * 0.01 * 1, so 0.04 past the end of the first branch
    let moved = particles.get(electron).unwrap();
    assert_eq!(moved.get_branch(), second);
    assert_relative_eq!(moved.get_distance(), 0.04, epsilon = 1e-12);
    assert_eq!(diagnostics.deferred_electrons, 0);
}

#[test]
fn test_non_finite_step_leaves_electron_in_place() {
    let (circuit, first, _) = series(5.0);
    let mut particles = ParticleSet::new();
    let electron = particles.add_at(&circuit, first, 0.5).unwrap();

    let propagator = ConstantDensityPropagator::new(PropagatorConfig::default(), 7);
    let mut diagnostics = Diagnostics::new();
    propagator.propagate(electron, &mut particles, &circuit, f64::NAN, &mut diagnostics);

    let unmoved = particles.get(electron).unwrap();
    assert_eq!(unmoved.get_branch(), first);
    assert_eq!(unmoved.get_distance(), 0.5);
    assert_eq!(diagnostics.skipped_bodies, 1);
    assert_eq!(diagnostics.deferred_electrons, 0);
}

#[test]
fn test_negative_current_runs_backwards() {
    let (circuit, first, second) = series(-5.0);
    let mut particles = ParticleSet::new();
    let electron = particles.add_at(&circuit, second, 0.01).unwrap();

    let propagator = ConstantDensityPropagator::new(PropagatorConfig::default(), 7);
    propagator.propagate(electron, &mut particles, &circuit, 1.0, &mut Diagnostics::new());

    // Lands 0.04 before the end of the branch feeding the junction
    let moved = particles.get(electron).unwrap();
    assert_eq!(moved.get_branch(), first);
    assert_relative_eq!(moved.get_distance(), 1.0 - 0.04, epsilon = 1e-12);
}

#[test]
fn test_dead_end_defers_the_move() {
    let mut circuit = Circuit::new();
    let j1 = circuit.add_junction();
    let j2 = circuit.add_junction();
    let branch = circuit.add_branch(j1, j2, 1.0).unwrap();
    circuit.set_current(branch, 5.0).unwrap();

    let mut particles = ParticleSet::new();
    let electron = particles.add_at(&circuit, branch, 0.99).unwrap();
    let mut diagnostics = Diagnostics::new();

    let propagator = ConstantDensityPropagator::new(PropagatorConfig::default(), 7);
    propagator.propagate(electron, &mut particles, &circuit, 1.0, &mut diagnostics);

    assert_eq!(diagnostics.deferred_electrons, 1);
    assert_relative_eq!(particles.get(electron).unwrap().get_distance(), 0.99);
}

#[test]
fn test_negligible_current_leaves_electrons_alone() {
    let (circuit, first, _) = series(0.0);
    let mut particles = ParticleSet::new();
    let electron = particles.add_at(&circuit, first, 0.5).unwrap();

    let propagator = ConstantDensityPropagator::new(PropagatorConfig::default(), 7);
    propagator.propagate(electron, &mut particles, &circuit, 1.0, &mut Diagnostics::new());
    assert_relative_eq!(particles.get(electron).unwrap().get_distance(), 0.5);
}

#[test]
fn test_lowest_density_with_first_on_ties() {
    let (circuit, incoming, a, b) = fork();
    let mut particles = ParticleSet::new();
    let propagator = ConstantDensityPropagator::new(PropagatorConfig::default(), 7);

    let locations = propagator.eligible_locations(&circuit, incoming, 0.04, false);
    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].get_branch(), a);
    assert_eq!(locations[1].get_branch(), b);

    // Both empty: the earliest candidate wins
    let chosen = propagator.choose_destination(&locations, &particles, &circuit).unwrap();
    assert_eq!(chosen.get_branch(), a);

    particles.add_at(&circuit, a, 1.0).unwrap();
    let chosen = propagator.choose_destination(&locations, &particles, &circuit).unwrap();
    assert_eq!(chosen.get_branch(), b);

    assert!(propagator.choose_destination(&[], &particles, &circuit).is_none());
}

#[test]
fn test_farthest_from_electron_policy() {
    let (circuit, incoming, a, b) = fork();
    let mut particles = ParticleSet::new();
    particles.add_at(&circuit, a, 0.1).unwrap();
    particles.add_at(&circuit, b, 1.5).unwrap();

    let config = PropagatorConfig {
        destination_policy: DestinationPolicy::FarthestFromElectron,
        ..PropagatorConfig::default()
    };
    let propagator = ConstantDensityPropagator::new(config, 7);
    let locations = propagator.eligible_locations(&circuit, incoming, 0.04, false);

    let chosen = propagator.choose_destination(&locations, &particles, &circuit).unwrap();
    assert_eq!(chosen.get_branch(), b);
    assert_relative_eq!(chosen.get_x(), 0.04);
}

#[test]
fn test_equalization_is_capped_by_correction_speed() {
    let mut circuit = Circuit::new();
    let j1 = circuit.add_junction();
    let j2 = circuit.add_junction();
    let branch = circuit.add_branch(j1, j2, 10.0).unwrap();

    let mut particles = ParticleSet::new();
    particles.add_at(&circuit, branch, 1.0).unwrap();
    let middle = particles.add_at(&circuit, branch, 2.0).unwrap();
    particles.add_at(&circuit, branch, 5.0).unwrap();

    let mut propagator = ConstantDensityPropagator::new(PropagatorConfig::default(), 7);
    let mut diagnostics = Diagnostics::new();
    propagator.equalize(&mut particles, &circuit, 1.0, &mut diagnostics);

    // Against zero current, at the backward speed split over two passes
    assert_relative_eq!(particles.get(middle).unwrap().get_distance(), 2.0 + 0.01 / 2.0, epsilon = 1e-12);
    assert_eq!(diagnostics.capped_equalize_moves, 1);
    assert_relative_eq!(diagnostics.max_equalize_distance, 1.0);
}

#[test]
fn test_equalization_never_passes_midpoint() {
    let mut circuit = Circuit::new();
    let j1 = circuit.add_junction();
    let j2 = circuit.add_junction();
    let branch = circuit.add_branch(j1, j2, 10.0).unwrap();
    circuit.set_current(branch, 2.0).unwrap();

    let mut particles = ParticleSet::new();
    particles.add_at(&circuit, branch, 1.0).unwrap();
    let middle = particles.add_at(&circuit, branch, 2.0).unwrap();
    particles.add_at(&circuit, branch, 5.0).unwrap();

    let config = PropagatorConfig {
        forward_correction_speed: 100.0,
        backward_correction_speed: 100.0,
        ..PropagatorConfig::default()
    };
    let mut propagator = ConstantDensityPropagator::new(config, 7);
    let mut diagnostics = Diagnostics::new();
    propagator.equalize(&mut particles, &circuit, 1.0, &mut diagnostics);

    assert_relative_eq!(particles.get(middle).unwrap().get_distance(), 3.0, epsilon = 1e-12);
    assert_eq!(diagnostics.capped_equalize_moves, 0);
}

#[test]
fn test_speed_scale_limits_fast_currents() {
    let (mut circuit, first, second) = series(100.0);
    let config = PropagatorConfig::default();
    let max_step = config.max_step;
    let mut propagator = ConstantDensityPropagator::new(config, 7);
    assert!(propagator.speed_percent().is_none());

    // 100 * 0.01 * 1 = 1.0 would overshoot the maximum step
    let scale = propagator.update_speed_scale(&circuit, 1.0);
    assert_relative_eq!(scale, max_step / 1.0, epsilon = 1e-12);
    assert!(propagator.speed_limited());

    circuit.set_current(first, 1.0).unwrap();
    circuit.set_current(second, 1.0).unwrap();
    assert_relative_eq!(propagator.update_speed_scale(&circuit, 1.0), 1.0);
    assert_relative_eq!(propagator.get_scale(), 1.0);
    assert!(propagator.speed_percent().unwrap() > scale * 100.0);
}

#[test]
fn test_full_step_moves_every_electron() {
    let (circuit, first, second) = series(5.0);
    let mut particles = ParticleSet::new();
    let a = particles.add_at(&circuit, first, 0.2).unwrap();
    let b = particles.add_at(&circuit, second, 1.0).unwrap();

    let mut propagator = ConstantDensityPropagator::new(PropagatorConfig::default(), 3);
    propagator.step(&mut particles, &circuit, 1.0, &mut Diagnostics::new());

    assert_relative_eq!(particles.get(a).unwrap().get_distance(), 0.25, epsilon = 1e-12);
    assert_relative_eq!(particles.get(b).unwrap().get_distance(), 1.05, epsilon = 1e-12);
}

#[test]
fn test_moving_average_evicts_oldest() {
    let mut average = MovingAverage::new(2);
    assert!(average.average().is_none());

    average.push(1.0);
    average.push(2.0);
    average.push(3.0);
    assert_eq!(average.len(), 2);
    assert_relative_eq!(average.average().unwrap(), 2.5);

    assert_eq!(MovingAverage::new(0).capacity(), 1);
}
