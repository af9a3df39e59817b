use crate::core::EnergyFixConfig;
use crate::error::PhysicsError;
use crate::forces::{Environment, ForceRegistry, ForceSubject};
use crate::integration::Integrator;
use crate::math::Vector2;
use crate::track::{EnergyConserver, EnergyFixOutcome, Track, STRAIGHT_RADIUS};
use crate::Result;
use std::sync::Arc;

/// A point mass constrained to a track, moving with a scalar speed along it
#[derive(Debug, Clone)]
pub struct TrackParticle {
    track: Arc<dyn Track>,

    /// Position parameter along the track
    alpha: f64,

    /// Signed speed along the track, positive toward increasing alpha
    velocity: f64,

    mass: f64,

    /// Heat generated by friction so far
    thermal_energy: f64,

    friction_coefficient: f64,

    /// Bounce at the track ends instead of running off
    reflect: bool,

    /// Height at which potential energy is zero
    zero_point_y: f64,
}

impl TrackParticle {
    /// Creates a rider at rest at the start of the track
    pub fn new(track: Arc<dyn Track>, mass: f64) -> Result<Self> {
        if mass <= 0.0 || !mass.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!("mass must be positive, got {}", mass)));
        }
        Ok(Self {
            track,
            alpha: 0.0,
            velocity: 0.0,
            mass,
            thermal_energy: 0.0,
            friction_coefficient: 0.0,
            reflect: true,
            zero_point_y: 0.0,
        })
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_friction(mut self, coefficient: f64) -> Self {
        self.friction_coefficient = coefficient.max(0.0);
        self
    }

    pub fn with_reflect(mut self, reflect: bool) -> Self {
        self.reflect = reflect;
        self
    }

    pub fn with_zero_point(mut self, y: f64) -> Self {
        self.zero_point_y = y;
        self
    }

    pub fn track(&self) -> &Arc<dyn Track> {
        &self.track
    }

    pub fn get_alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn get_velocity(&self) -> f64 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
    }

    pub fn get_mass(&self) -> f64 {
        self.mass
    }

    pub fn get_thermal_energy(&self) -> f64 {
        self.thermal_energy
    }

    pub fn set_thermal_energy(&mut self, thermal_energy: f64) {
        self.thermal_energy = thermal_energy;
    }

    pub fn get_friction_coefficient(&self) -> f64 {
        self.friction_coefficient
    }

    pub fn set_friction_coefficient(&mut self, coefficient: f64) {
        self.friction_coefficient = coefficient.max(0.0);
    }

    pub fn is_reflecting(&self) -> bool {
        self.reflect
    }

    /// World position on the track
    pub fn position(&self) -> Vector2 {
        self.track.evaluate(self.alpha)
    }

    /// World velocity along the track tangent
    pub fn velocity_vector(&self) -> Vector2 {
        self.track.unit_parallel_vector(self.alpha) * self.velocity
    }

    /// Signed radius of curvature at the rider
    pub fn radius_of_curvature(&self) -> f64 {
        self.track.radius_of_curvature(self.alpha)
    }

    /// View of this rider at a hypothetical state, for evaluating forces mid-step
    pub fn state_at(&self, alpha: f64, velocity: f64) -> RiderState<'_> {
        RiderState { particle: self, alpha, velocity }
    }

    /// View of this rider at its current state
    pub fn state(&self) -> RiderState<'_> {
        self.state_at(self.alpha, self.velocity)
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity * self.velocity
    }

    /// Gravitational potential energy relative to the zero-point height
    pub fn potential_energy(&self, environment: &Environment) -> f64 {
        self.potential_energy_at(self.alpha, environment)
    }

    fn potential_energy_at(&self, alpha: f64, environment: &Environment) -> f64 {
        let height = self.track.evaluate(alpha) - Vector2::new(0.0, self.zero_point_y);
        -self.mass * environment.gravity.dot(&height)
    }

    /// Kinetic plus potential plus thermal energy
    pub fn total_energy(&self, environment: &Environment) -> f64 {
        self.energy_at(self.alpha, self.velocity, environment)
    }

    /// Total energy the rider would have at another state, keeping its heat
    pub fn energy_at(&self, alpha: f64, velocity: f64, environment: &Environment) -> f64 {
        0.5 * self.mass * velocity * velocity + self.potential_energy_at(alpha, environment) + self.thermal_energy
    }

    /// Normal force vector exerted by the track
    pub fn normal_force(&self, environment: &Environment) -> Vector2 {
        let state = self.state();
        let magnitude = state.normal_force(environment);
        self.track.curvature_direction(self.alpha) * magnitude
    }

    /// Acceleration along the track at a hypothetical state
    pub fn tangential_acceleration_at(
        &self,
        alpha: f64,
        velocity: f64,
        forces: &ForceRegistry,
        environment: &Environment,
    ) -> f64 {
        let state = self.state_at(alpha, velocity);
        let net = forces.net_force(&state, environment);
        self.track.unit_parallel_vector(alpha).dot(&net) / self.mass
    }

    /// Acceleration along the track at the current state
    pub fn tangential_acceleration(&self, forces: &ForceRegistry, environment: &Environment) -> f64 {
        self.tangential_acceleration_at(self.alpha, self.velocity, forces, environment)
    }

    /// Converts the work done by friction over the move from `origin` into heat
    pub fn accumulate_friction_heat(&mut self, origin: Vector2, forces: &ForceRegistry, environment: &Environment) {
        if self.friction_coefficient <= 0.0 {
            return;
        }
        let friction = forces.dissipative_force(&self.state(), environment).length();
        self.thermal_energy += friction * self.position().distance(&origin);
    }

    /// Stops the rider at `alpha`, turning the mechanical energy it lost into heat
    pub fn come_to_rest(&mut self, alpha: f64, environment: &Environment) {
        let before = self.kinetic_energy() + self.potential_energy(environment);
        self.alpha = alpha;
        self.velocity = 0.0;
        self.thermal_energy += (before - self.potential_energy(environment)).max(0.0);
    }

    /// Advances the rider by `dt` in `substeps` equal sub-steps, then repairs
    /// energy drift when no thrust is applied
    pub fn step(
        &mut self,
        integrator: &dyn Integrator,
        forces: &ForceRegistry,
        environment: &Environment,
        substeps: u32,
        energy_fix: &EnergyFixConfig,
        dt: f64,
    ) -> EnergyFixOutcome {
        let initial_energy = self.total_energy(environment);
        let initial_alpha = self.alpha;
        let substeps = substeps.max(1);
        let h = dt / substeps as f64;
        for _ in 0..substeps {
            integrator.integrate(self, forces, environment, h);
        }

        if !energy_fix.enabled || !environment.thrust.is_zero() {
            return EnergyFixOutcome::Skipped;
        }
        EnergyConserver::new(energy_fix).fix(self, initial_alpha, initial_energy, environment)
    }

    /// Returns true if position and speed are both finite
    pub fn is_finite(&self) -> bool {
        self.alpha.is_finite() && self.velocity.is_finite() && self.thermal_energy.is_finite()
    }
}

/// A rider seen at a particular `(alpha, velocity)`, used as a force subject
#[derive(Debug, Clone, Copy)]
pub struct RiderState<'a> {
    particle: &'a TrackParticle,
    alpha: f64,
    velocity: f64,
}

impl RiderState<'_> {
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn speed(&self) -> f64 {
        self.velocity
    }
}

impl ForceSubject for RiderState<'_> {
    fn mass(&self) -> f64 {
        self.particle.mass
    }

    fn position(&self) -> Vector2 {
        self.particle.track.evaluate(self.alpha)
    }

    fn velocity(&self) -> Vector2 {
        self.particle.track.unit_parallel_vector(self.alpha) * self.velocity
    }

    /// Centripetal requirement minus the radial share of gravity and thrust
    fn normal_force(&self, environment: &Environment) -> f64 {
        let track = &self.particle.track;
        let radius = track.radius_of_curvature(self.alpha);
        let radius = if radius.is_finite() { radius.abs() } else { STRAIGHT_RADIUS };
        let mass = self.particle.mass;
        let radial = (environment.gravity * mass + environment.thrust * mass).dot(&track.curvature_direction(self.alpha));
        mass * self.velocity * self.velocity / radius - radial
    }

    fn friction_coefficient(&self, _environment: &Environment) -> f64 {
        self.particle.friction_coefficient
    }
}
