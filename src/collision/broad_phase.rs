use crate::bodies::{Body, BodyFlags};
use crate::core::BodyHandle;
use crate::math::Aabb;

/// Two bodies whose bounding boxes overlap, lower handle first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
}

impl CollisionPair {
    pub fn new(first: BodyHandle, second: BodyHandle) -> Self {
        let (body_a, body_b) = if second < first { (second, first) } else { (first, second) };
        Self { body_a, body_b }
    }
}

/// Trait for broad-phase collision detection algorithms
pub trait BroadPhase: Send + Sync {
    /// Updates the broad-phase with the current body states
    fn update(&mut self, bodies: &[(BodyHandle, &Body)]);

    /// Gets all potential collision pairs, sorted
    fn get_collision_pairs(&self) -> Vec<CollisionPair>;
}

/// Tests every pair of bounding boxes
#[derive(Debug, Default)]
pub struct BruteForceBroadPhase {
    bodies: Vec<(BodyHandle, Aabb)>,
}

impl BruteForceBroadPhase {
    /// Creates a new brute-force broad-phase
    pub fn new() -> Self {
        Self { bodies: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl BroadPhase for BruteForceBroadPhase {
    fn update(&mut self, bodies: &[(BodyHandle, &Body)]) {
        self.bodies.clear();

        for (handle, body) in bodies {
            if body.get_flags().contains(BodyFlags::COLLIDABLE) && body.is_finite() {
                self.bodies.push((*handle, body.bounding_box()));
            }
        }
    }

    fn get_collision_pairs(&self) -> Vec<CollisionPair> {
        let mut pairs = Vec::new();

        for i in 0..self.bodies.len() {
            let (handle_a, aabb_a) = self.bodies[i];

            for j in (i + 1)..self.bodies.len() {
                let (handle_b, aabb_b) = self.bodies[j];

                if aabb_a.intersects(&aabb_b) {
                    pairs.push(CollisionPair::new(handle_a, handle_b));
                }
            }
        }

        pairs.sort();
        pairs
    }
}
