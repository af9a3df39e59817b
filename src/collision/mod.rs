mod collision_detector;
mod broad_phase;
mod reaction;
mod resolver;

pub use self::collision_detector::{CollisionDetector, CollisionSpec, PairClass};
pub use self::broad_phase::{BroadPhase, BruteForceBroadPhase, CollisionPair};
pub use self::reaction::{
    collision_energy, may_react, CompoundFormationCriteria, CompoundRule, DistinctSpeciesCriteria,
    EnergyThresholdCriteria, NoReactions, ReactionCriteria,
};
pub use self::resolver::{CollisionResolver, Resolution};
