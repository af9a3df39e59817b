mod curve;
mod particle;
mod energy;

pub use self::curve::{ArcTrack, LineTrack, Track, STRAIGHT_RADIUS};
pub use self::particle::{RiderState, TrackParticle};
pub use self::energy::{EnergyConserver, EnergyFixOutcome};
