mod body;
mod composite;

pub use self::body::{Body, BodyShape, Leaf};
pub use self::composite::{bond_bodies, Bond, Composite, Member};
pub use self::body_flags::BodyFlags;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Chemical identity of a simple disk body (an atom type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Species(pub u32);

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "species {}", self.0)
    }
}

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling the behavior of free bodies
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
        pub struct BodyFlags: u32 {
            /// Body is affected by gravity
            const AFFECTED_BY_GRAVITY = 0x01;

            /// Body takes part in collision detection
            const COLLIDABLE = 0x02;

            /// Body may bond with another body on collision
            const REACTIVE = 0x04;

            /// Body has infinite mass and never moves
            const FIXED = 0x08;
        }
    }

    impl Default for BodyFlags {
        fn default() -> Self {
            BodyFlags::COLLIDABLE | BodyFlags::REACTIVE
        }
    }
}
