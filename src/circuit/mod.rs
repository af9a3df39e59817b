mod network;
mod particle_set;
mod propagator;

pub use self::network::{Branch, Circuit, CircuitLocation, Junction};
pub use self::particle_set::{Electron, ParticleSet};
pub use self::propagator::{ConstantDensityPropagator, DestinationPolicy};
