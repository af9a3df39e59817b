pub mod math;
pub mod core;
pub mod bodies;
pub mod forces;
pub mod track;
pub mod integration;
pub mod collision;
pub mod circuit;

/// Re-export common types for easier usage
pub use crate::core::{PhysicsWorld, SimulationConfig, BodyHandle, RiderHandle, Diagnostics};
pub use crate::bodies::{Body, BodyFlags, BodyShape, Species};
pub use crate::forces::Environment;
pub use crate::math::Vector2;

/// Error types for the physics engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        /// A location, shape or dimension that cannot exist (negative radius, x off the wire)
        #[error("Invalid geometry: {0}")]
        InvalidGeometry(String),

        /// A pairing of body kinds the engine does not handle
        #[error("Unsupported topology: {0}")]
        UnsupportedTopology(String),

        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        /// A computation produced NaN or an infinite value
        #[error("Numeric degeneracy: {0}")]
        NumericDegeneracy(String),
    }
}

/// Result type for physics engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
