#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Per-world counters of recovered problems and notable events.
///
/// Everything here is informational: the engine never changes behaviour
/// based on these values.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Diagnostics {
    /// Completed steps
    pub steps: u64,

    /// Overlapping pairs handed to the resolver
    pub collisions: u64,

    /// Collisions that ended in a bond
    pub reactions: u64,

    /// Impulses whose kinetic energy drift exceeded the tolerance
    pub energy_drift_events: u64,

    /// Largest relative kinetic energy drift seen after an impulse
    pub max_energy_drift: f64,

    /// Bodies, riders and electrons skipped because their state became NaN or infinite
    pub skipped_bodies: u64,

    /// Track-rider energy corrections that ran out of budget
    pub energy_fix_exhausted: u64,

    /// Largest residual left by an exhausted energy correction
    pub max_energy_fix_residual: f64,

    /// Candidate pairs the detector could not handle (composite against composite)
    pub unsupported_pairs: u64,

    /// Electron moves deferred because no outgoing branch was available
    pub deferred_electrons: u64,

    /// Largest distance an electron wanted to move during equalization
    pub max_equalize_distance: f64,

    /// Equalization moves that were capped by the correction speed
    pub capped_equalize_moves: u64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every counter to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn observe_energy_drift(&mut self, drift: f64, tolerance: f64) {
        self.max_energy_drift = self.max_energy_drift.max(drift);
        if drift > tolerance {
            self.energy_drift_events += 1;
        }
    }

    pub(crate) fn record_energy_fix_exhausted(&mut self, residual: f64) {
        self.energy_fix_exhausted += 1;
        self.max_energy_fix_residual = self.max_energy_fix_residual.max(residual.abs());
    }
}
