use crate::core::EnergyFixConfig;
use crate::forces::Environment;
use crate::track::TrackParticle;

/// Result of one energy correction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyFixOutcome {
    /// No correction was attempted (thrust applied or correction disabled)
    Skipped,

    /// Drift was already below the skip tolerance
    WithinTolerance,

    /// Drift was corrected
    Converged,

    /// The budget ran out; carries the remaining `energy - target`
    Exhausted(f64),
}

impl EnergyFixOutcome {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, EnergyFixOutcome::Exhausted(_))
    }
}

/// Bounded heuristic that pulls a track rider back to a target total energy.
///
/// Too much energy is removed from the speed when the kinetic energy can
/// absorb it, otherwise by searching for a nearby position between the
/// previous and the current one. Too little energy is added back to the
/// speed, keeping its sign, unless the rider is at rest. Every loop has a
/// fixed iteration budget.
pub struct EnergyConserver<'a> {
    config: &'a EnergyFixConfig,
}

impl<'a> EnergyConserver<'a> {
    pub fn new(config: &'a EnergyFixConfig) -> Self {
        Self { config }
    }

    /// Corrects `particle` toward `target_energy`; `previous_alpha` bounds the position search
    pub fn fix(
        &self,
        particle: &mut TrackParticle,
        previous_alpha: f64,
        target_energy: f64,
        environment: &Environment,
    ) -> EnergyFixOutcome {
        let drift = particle.total_energy(environment) - target_energy;
        if drift.abs() <= self.config.skip_tolerance {
            return EnergyFixOutcome::WithinTolerance;
        }

        if drift > 0.0 {
            if particle.kinetic_energy() > drift.abs() {
                self.reduce_velocity(particle, target_energy, environment);
            } else {
                let alpha = self.search_alpha(particle, previous_alpha, target_energy, environment);
                particle.set_alpha(alpha);
                let remaining = particle.total_energy(environment) - target_energy;
                if remaining.abs() > self.config.tolerance && particle.kinetic_energy() > remaining.abs() {
                    self.reduce_velocity(particle, target_energy, environment);
                }
            }
        } else {
            self.raise_velocity(particle, target_energy, environment);
        }

        let residual = particle.total_energy(environment) - target_energy;
        if residual.abs() <= self.config.skip_tolerance {
            EnergyFixOutcome::Converged
        } else {
            log::debug!(
                "energy correction exhausted at alpha {:.6}: residual {:.3e}",
                particle.get_alpha(),
                residual
            );
            EnergyFixOutcome::Exhausted(residual)
        }
    }

    /// Newton iteration on the speed, keeping position fixed
    fn reduce_velocity(&self, particle: &mut TrackParticle, target_energy: f64, environment: &Environment) {
        let mass = particle.get_mass();
        for _ in 0..self.config.velocity_iterations {
            let velocity = particle.get_velocity();
            if velocity == 0.0 {
                break;
            }
            let excess = particle.total_energy(environment) - target_energy;
            particle.set_velocity(velocity - excess / (mass * velocity));
            if (particle.total_energy(environment) - target_energy).abs() < self.config.tolerance {
                break;
            }
        }
    }

    /// Sets the exact speed that restores the target, keeping direction.
    /// A rider at rest has no direction and stays put.
    fn raise_velocity(&self, particle: &mut TrackParticle, target_energy: f64, environment: &Environment) {
        if particle.get_velocity() == 0.0 {
            return;
        }
        let available = target_energy - particle.potential_energy(environment) - particle.get_thermal_energy();
        if available < 0.0 {
            return;
        }
        let speed = (2.0 * available / particle.get_mass()).sqrt();
        particle.set_velocity(speed.copysign(particle.get_velocity()));
    }

    /// Refining grid search for the position between the previous and current
    /// alpha whose energy is closest to the target
    fn search_alpha(
        &self,
        particle: &TrackParticle,
        previous_alpha: f64,
        target_energy: f64,
        environment: &Environment,
    ) -> f64 {
        let velocity = particle.get_velocity();
        let error = |alpha: f64| (particle.energy_at(alpha, velocity, environment) - target_energy).abs();
        let clamp = |alpha: f64| {
            if particle.is_reflecting() {
                alpha.clamp(0.0, 1.0)
            } else {
                alpha
            }
        };

        let steps = self.config.search_steps.max(1);
        let mut center = (particle.get_alpha() + previous_alpha) / 2.0;
        let mut half_width = (particle.get_alpha() - previous_alpha).abs() / 2.0;
        for _ in 0..self.config.search_passes {
            let low = center - half_width;
            let span = 2.0 * half_width;
            let mut best = center;
            let mut best_error = error(center);
            for i in 0..=steps {
                let candidate = clamp(low + span * i as f64 / steps as f64);
                let candidate_error = error(candidate);
                if candidate_error <= best_error {
                    best = candidate;
                    best_error = candidate_error;
                }
            }
            center = best;
            half_width = span / steps as f64;
        }
        center
    }
}
