pub mod world;
pub mod config;
pub mod storage;
pub mod events;
pub mod smoothing;
pub mod diagnostics;

pub use self::world::{PhysicsWorld, StepState};
pub use self::config::{SimulationConfig, PropagatorConfig, EnergyFixConfig, CollisionConfig};
pub use self::storage::{HandleStorage, Storage};
pub use self::events::{
    EventQueue, CollisionEvent, CollisionOutcome, BodyEvent, BodyEventType, Command, CommandQueue,
    Observers, StepCallback, BodyEventCallback,
};
pub use self::smoothing::MovingAverage;
pub use self::diagnostics::Diagnostics;

/// Common behaviour of the integer handles used to address objects in storage
pub trait Handle: Copy + Eq + Ord + std::hash::Hash + std::fmt::Debug {
    /// Builds a handle from its raw id
    fn from_raw(id: u32) -> Self;

    /// Returns the raw id of the handle
    fn raw(&self) -> u32;
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub(crate) u32);

        impl Handle for $name {
            #[inline]
            fn from_raw(id: u32) -> Self {
                Self(id)
            }

            #[inline]
            fn raw(&self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

define_handle!(
    /// A unique identifier for a free body in the physics world
    BodyHandle
);

define_handle!(
    /// A unique identifier for a particle constrained to a track
    RiderHandle
);

define_handle!(
    /// A unique identifier for an electron on the wire network
    ElectronHandle
);

define_handle!(
    /// A unique identifier for a wire branch
    BranchHandle
);

define_handle!(
    /// A unique identifier for a junction joining branch ends
    JunctionHandle
);
