use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::circuit::{Circuit, CircuitLocation, ParticleSet};
use crate::core::{BranchHandle, Diagnostics, ElectronHandle, MovingAverage, PropagatorConfig};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// How an electron leaving a branch picks among the eligible neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum DestinationPolicy {
    /// Branch with the fewest electrons per unit length
    #[default]
    LowestDensity,

    /// Landing spot furthest from any electron already on the branch
    FarthestFromElectron,
}

/// Moves electrons with their branch currents while keeping the density of
/// every branch roughly constant.
#[derive(Debug, Clone)]
pub struct ConstantDensityPropagator {
    config: PropagatorConfig,
    smoothing: MovingAverage,
    scale: f64,
    rng: StdRng,
}

impl ConstantDensityPropagator {
    pub fn new(config: PropagatorConfig, seed: u64) -> Self {
        Self {
            smoothing: MovingAverage::new(config.smoothing_window),
            config,
            scale: 1.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn get_config(&self) -> &PropagatorConfig {
        &self.config
    }

    /// Factor applied to every electron displacement in the current step
    pub fn get_scale(&self) -> f64 {
        self.scale
    }

    /// Smoothed percentage of real-time speed, if any step has run
    pub fn speed_percent(&self) -> Option<f64> {
        self.smoothing.average()
    }

    /// True when the smoothed speed is below the configured threshold
    pub fn speed_limited(&self) -> bool {
        self.smoothing
            .average()
            .is_some_and(|average| average < self.config.speed_limit_threshold)
    }

    /// Shrinks the step so that no electron travels further than `max_step`
    pub fn update_speed_scale(&mut self, circuit: &Circuit, dt: f64) -> f64 {
        let max_step = circuit.max_current() * self.config.speed_scale * dt;
        self.scale = if max_step >= self.config.max_step {
            self.config.max_step / max_step
        } else {
            1.0
        };
        self.smoothing.push(self.scale * 100.0);
        if self.speed_limited() {
            log::trace!("electron speed limited to {:.0}%", self.speed_percent().unwrap_or(100.0));
        }
        self.scale
    }

    /// One full propagator step: speed scale, propagation, then equalization
    pub fn step(&mut self, particles: &mut ParticleSet, circuit: &Circuit, dt: f64, diagnostics: &mut Diagnostics) {
        self.update_speed_scale(circuit, dt);
        for handle in particles.handles() {
            self.propagate(handle, particles, circuit, dt, diagnostics);
        }
        for _ in 0..self.config.equalize_passes {
            self.equalize(particles, circuit, dt, diagnostics);
        }
    }

    /// Advances one electron with its branch current, hopping to a neighbouring
    /// branch when it runs off the end of its own
    pub fn propagate(
        &self,
        handle: ElectronHandle,
        particles: &mut ParticleSet,
        circuit: &Circuit,
        dt: f64,
        diagnostics: &mut Diagnostics,
    ) {
        let Some((branch_handle, x)) = particles.get(handle).map(|e| e.location()) else {
            return;
        };
        let Some(branch) = circuit.branch(branch_handle) else {
            return;
        };
        if !x.is_finite() {
            log::debug!("skipping {} with non-finite position {}", handle, x);
            diagnostics.skipped_bodies += 1;
            return;
        }
        let current = branch.get_current();
        if current.abs() < self.config.min_current {
            return;
        }

        let dx = current * self.config.speed_scale * dt * self.scale;
        if !dx.is_finite() {
            log::debug!("skipping {} with non-finite step {}", handle, dx);
            diagnostics.skipped_bodies += 1;
            return;
        }
        let new_x = x + dx;
        if branch.contains_scalar_location(new_x) {
            particles.set_distance(handle, new_x);
            return;
        }

        let under = new_x < 0.0;
        let overshoot = if under { -new_x } else { (branch.get_length() - new_x).abs() };
        let locations = self.eligible_locations(circuit, branch_handle, overshoot, under);

        match self.choose_destination(&locations, particles, circuit) {
            Some(destination) => {
                if particles.set_location(handle, destination).is_ok() {
                    log::trace!(
                        "{} moved from {} to {} at {}",
                        handle,
                        branch_handle,
                        destination.get_branch(),
                        destination.get_x()
                    );
                }
            }
            None => {
                diagnostics.deferred_electrons += 1;
                log::trace!("{} has no outgoing branch, deferred", handle);
            }
        }
    }

    /// Landing spots on the branches that carry current away from the junction
    /// the electron ran into
    pub fn eligible_locations(&self, circuit: &Circuit, branch: BranchHandle, overshoot: f64, under: bool) -> Vec<CircuitLocation> {
        let Some(origin) = circuit.branch(branch) else {
            return Vec::new();
        };
        let root = if under { origin.get_start() } else { origin.get_end() };
        let fire_current = self.config.fire_current;

        circuit
            .adjacent_branches(root)
            .into_iter()
            .filter_map(|handle| {
                let neighbor = circuit.branch(handle)?;
                let current = neighbor.get_current().clamp(-fire_current, fire_current);
                let length = neighbor.get_length();
                let x = if current > 0.0 && neighbor.get_start() == root {
                    overshoot
                } else if current < 0.0 && neighbor.get_end() == root {
                    length - overshoot
                } else {
                    return None;
                };
                CircuitLocation::new(circuit, handle, x.clamp(0.0, length)).ok()
            })
            .collect()
    }

    /// Picks a destination according to the policy; ties go to the earliest
    /// candidate
    pub fn choose_destination(&self, locations: &[CircuitLocation], particles: &ParticleSet, circuit: &Circuit) -> Option<CircuitLocation> {
        let score = |location: &CircuitLocation| match self.config.destination_policy {
            DestinationPolicy::LowestDensity => particles.density(circuit, location.get_branch()).unwrap_or(f64::INFINITY),
            DestinationPolicy::FarthestFromElectron => {
                -particles.distance_to_closest_electron(location.get_branch(), location.get_x())
            }
        };

        let mut best: Option<(CircuitLocation, f64)> = None;
        for location in locations {
            let value = score(location);
            match best {
                Some((_, lowest)) if value >= lowest => {}
                _ => best = Some((*location, value)),
            }
        }
        best.map(|(location, _)| location)
    }

    /// One equalization pass over all electrons in random order. Each electron
    /// with neighbours on both sides drifts toward their midpoint, limited by
    /// the correction speed and never beyond the midpoint.
    pub fn equalize(&mut self, particles: &mut ParticleSet, circuit: &Circuit, dt: f64, diagnostics: &mut Diagnostics) {
        let mut order = particles.handles();
        order.shuffle(&mut self.rng);

        let passes = self.config.equalize_passes.max(1) as f64;
        for handle in order {
            let (Some(upper), Some(lower)) = (particles.upper_neighbor(handle), particles.lower_neighbor(handle)) else {
                continue;
            };
            let (Some(me), Some(upper), Some(lower)) = (particles.get(handle), particles.get(upper), particles.get(lower)) else {
                continue;
            };
            let Some(branch) = circuit.branch(me.get_branch()) else {
                continue;
            };

            let position = me.get_distance();
            let midpoint = lower.get_distance() + (upper.get_distance() - lower.get_distance()) / 2.0;
            let offset = midpoint - position;
            let distance = offset.abs();

            let current = branch.get_current();
            let with_current = (offset > 0.0 && current > 0.0) || (offset < 0.0 && current < 0.0);
            let correction_speed = if with_current {
                self.config.forward_correction_speed
            } else {
                self.config.backward_correction_speed
            } / passes;
            let max_dx = (correction_speed * dt).abs();

            diagnostics.max_equalize_distance = diagnostics.max_equalize_distance.max(distance);

            let destination = if distance > max_dx {
                diagnostics.capped_equalize_moves += 1;
                position + max_dx.copysign(offset)
            } else {
                midpoint
            };
            if branch.contains_scalar_location(destination) {
                particles.set_distance(handle, destination);
            }
        }
    }
}
