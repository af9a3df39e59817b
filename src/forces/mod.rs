mod force_model;
mod gravity;
mod friction;
mod pairwise;
mod spring;

pub use self::force_model::{Environment, ForceModel, ForceRegistry, ForceSubject, PairForce};
pub use self::gravity::{GravityForce, ThrustForce};
pub use self::friction::{limit_friction, FrictionForce, DEFAULT_FRICTION_GAIN};
pub use self::pairwise::{CoulombForce, LennardJonesForce, DEFAULT_MIN_DISTANCE};
pub use self::spring::{SpringAnchor, SpringForce};
