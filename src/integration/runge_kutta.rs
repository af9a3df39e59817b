use crate::forces::{Environment, ForceRegistry};
use crate::integration::{handle_boundary, stop_on_reversal, Integrator};
use crate::track::TrackParticle;
use nalgebra as na;

/// Classic fourth-order Runge-Kutta on the state `[alpha, velocity]`
pub struct RungeKuttaIntegrator;

impl RungeKuttaIntegrator {
    /// Creates a new Runge-Kutta integrator
    pub fn new() -> Self {
        Self
    }

    /// Time derivative of `[alpha, velocity]`
    fn derivative(
        particle: &TrackParticle,
        state: &na::Vector2<f64>,
        forces: &ForceRegistry,
        environment: &Environment,
    ) -> na::Vector2<f64> {
        let (alpha, velocity) = (state[0], state[1]);
        na::Vector2::new(
            particle.track().fractional_distance(alpha, velocity),
            particle.tangential_acceleration_at(alpha, velocity, forces, environment),
        )
    }
}

impl Default for RungeKuttaIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for RungeKuttaIntegrator {
    fn integrate(&self, particle: &mut TrackParticle, forces: &ForceRegistry, environment: &Environment, dt: f64) {
        let origin = particle.position();
        let state = na::Vector2::new(particle.get_alpha(), particle.get_velocity());

        let k1 = Self::derivative(particle, &state, forces, environment);
        let k2 = Self::derivative(particle, &(state + k1 * (dt / 2.0)), forces, environment);
        let k3 = Self::derivative(particle, &(state + k2 * (dt / 2.0)), forces, environment);
        let k4 = Self::derivative(particle, &(state + k3 * dt), forces, environment);
        let next = state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0);

        // Stages straddling zero speed can cancel out; check the first-stage prediction too
        if stop_on_reversal(particle, state[1] + k1[1] * dt, forces, environment, dt)
            || stop_on_reversal(particle, next[1], forces, environment, dt)
        {
            return;
        }

        particle.set_alpha(next[0]);
        particle.set_velocity(next[1]);

        particle.accumulate_friction_heat(origin, forces, environment);
        handle_boundary(particle);
    }

    fn name(&self) -> &str {
        "RK4"
    }
}
