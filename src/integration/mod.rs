mod integrator;
mod boundary;
mod euler;
mod verlet;
mod runge_kutta;
mod symplectic_euler;

pub use self::integrator::{stop_on_reversal, BodyIntegrator, Integrator};
pub use self::boundary::{handle_boundary, BoundaryOutcome};
pub use self::euler::{ConstantVelocityIntegrator, EulerIntegrator};
pub use self::verlet::{VerletIntegrator, VerletOffsetIntegrator};
pub use self::runge_kutta::RungeKuttaIntegrator;
pub use self::symplectic_euler::{ExplicitEulerIntegrator, SymplecticEulerIntegrator};
