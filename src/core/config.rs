use crate::circuit::DestinationPolicy;
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Configuration parameters for the physics simulation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Default time step used by `PhysicsWorld::step_default`
    pub time_step: f64,

    /// Gravity the world starts with, y up
    pub gravity: Vector2,

    /// Number of sub-steps a track rider takes per step
    pub track_substeps: u32,

    /// Empirical multiplier applied to `coefficient * |normal force|` in friction
    pub friction_gain: f64,

    /// Seed for the random order of equalization passes
    pub seed: u64,

    /// Electron propagation on the wire network
    pub propagator: PropagatorConfig,

    /// Energy correction applied to track riders after each step
    pub energy_fix: EnergyFixConfig,

    /// Collision response
    pub collision: CollisionConfig,
}

/// Tuning of the constant-density electron propagator
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct PropagatorConfig {
    /// Conversion from current to electron speed along the wire
    pub speed_scale: f64,

    /// Currents with a smaller magnitude leave electrons in place
    pub min_current: f64,

    /// Nominal spacing between neighbouring electrons
    pub electron_spacing: f64,

    /// Largest distance any electron may travel in one step
    pub max_step: f64,

    /// Magnitude at which branch currents are clamped when choosing a destination
    pub fire_current: f64,

    /// Number of equalization passes per step
    pub equalize_passes: u32,

    /// Correction speed when the move agrees with the branch current
    pub forward_correction_speed: f64,

    /// Correction speed when the move opposes the branch current
    pub backward_correction_speed: f64,

    /// Number of samples in the speed-limit moving average
    pub smoothing_window: usize,

    /// Average speed percentage below which the step is reported as speed limited
    pub speed_limit_threshold: f64,

    /// How an electron picks among several outgoing branches
    pub destination_policy: DestinationPolicy,
}

/// Budget and tolerances of the track-rider energy correction
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct EnergyFixConfig {
    pub enabled: bool,

    /// Drift below this absolute value is left alone
    pub skip_tolerance: f64,

    /// Target absolute accuracy of the correction
    pub tolerance: f64,

    /// Maximum Newton iterations when adjusting the velocity
    pub velocity_iterations: u32,

    /// Number of refinement passes of the position search
    pub search_passes: u32,

    /// Samples taken per refinement pass
    pub search_steps: u32,
}

/// Collision response parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct CollisionConfig {
    /// Coefficient of restitution for the impulse response
    pub restitution: f64,

    /// Relative kinetic-energy drift tolerated after an impulse before it is reported
    pub energy_tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 30.0,
            gravity: Vector2::new(0.0, -9.8),
            track_substeps: 10,
            friction_gain: 25.0,
            seed: 0,
            propagator: PropagatorConfig::default(),
            energy_fix: EnergyFixConfig::default(),
            collision: CollisionConfig::default(),
        }
    }
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        let electron_spacing = 0.56;
        Self {
            speed_scale: 0.01,
            min_current: 1.0e-10,
            electron_spacing,
            max_step: electron_spacing * 0.43,
            fire_current: 10.0,
            equalize_passes: 2,
            forward_correction_speed: 0.055,
            backward_correction_speed: 0.01,
            smoothing_window: 30,
            speed_limit_threshold: 95.0,
            destination_policy: DestinationPolicy::LowestDensity,
        }
    }
}

impl Default for EnergyFixConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            skip_tolerance: 1.0e-6,
            tolerance: 1.0e-8,
            velocity_iterations: 100,
            search_passes: 10,
            search_steps: 10,
        }
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            restitution: 1.0,
            energy_tolerance: 1.0e-6,
        }
    }
}

impl SimulationConfig {
    /// Checks that every parameter is usable, failing fast on the first bad one
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(PhysicsError::InvalidParameter(format!("{} must be positive, got {}", name, value)))
            }
        }

        positive("time_step", self.time_step)?;
        positive("friction_gain", self.friction_gain)?;
        positive("propagator.speed_scale", self.propagator.speed_scale)?;
        positive("propagator.electron_spacing", self.propagator.electron_spacing)?;
        positive("propagator.max_step", self.propagator.max_step)?;
        positive("propagator.fire_current", self.propagator.fire_current)?;
        positive("energy_fix.tolerance", self.energy_fix.tolerance)?;

        if self.track_substeps == 0 {
            return Err(PhysicsError::InvalidParameter("track_substeps must be at least 1".into()));
        }
        if self.propagator.equalize_passes == 0 {
            return Err(PhysicsError::InvalidParameter("propagator.equalize_passes must be at least 1".into()));
        }
        if self.propagator.smoothing_window == 0 {
            return Err(PhysicsError::InvalidParameter("propagator.smoothing_window must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.collision.restitution) {
            return Err(PhysicsError::InvalidParameter(format!(
                "collision.restitution must lie in [0, 1], got {}",
                self.collision.restitution
            )));
        }
        Ok(())
    }
}
