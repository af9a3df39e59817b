use crate::bodies::Body;
use crate::core::BodyHandle;
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

/// Which kinds of body meet in a pair, resolved once per pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairClass {
    SimpleSimple,
    SimpleComposite,
    CompositeSimple,
    CompositeComposite,
}

impl PairClass {
    pub fn of(a: &Body, b: &Body) -> Self {
        match (a.is_composite(), b.is_composite()) {
            (false, false) => PairClass::SimpleSimple,
            (false, true) => PairClass::SimpleComposite,
            (true, false) => PairClass::CompositeSimple,
            (true, true) => PairClass::CompositeComposite,
        }
    }

    /// True when exactly one side is a composite
    pub fn is_mixed(&self) -> bool {
        matches!(self, PairClass::SimpleComposite | PairClass::CompositeSimple)
    }
}

/// Description of an overlap between two bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSpec {
    pub body_a: BodyHandle,

    pub body_b: BodyHandle,

    /// Index of the touching disk inside body A
    pub leaf_a: usize,

    /// Index of the touching disk inside body B
    pub leaf_b: usize,

    /// From the centre of B's touching disk to the centre of A's
    pub line_of_action: Vector2,

    /// Point between the two disk centres, split in proportion to their radii
    pub contact_point: Vector2,

    pub class: PairClass,
}

impl CollisionSpec {
    /// Unit vector along the line of action
    pub fn normal(&self) -> Vector2 {
        self.line_of_action.normalize()
    }
}

/// Two-phase overlap test: bounding boxes first, then exact disk-disk tests
/// over the leaves of both bodies.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollisionDetector;

impl CollisionDetector {
    pub fn new() -> Self {
        Self
    }

    /// Returns the first touching pair of disks, if any.
    ///
    /// Two composites fail with `UnsupportedTopology` once their bounding
    /// boxes overlap.
    pub fn detect(&self, handle_a: BodyHandle, a: &Body, handle_b: BodyHandle, b: &Body) -> Result<Option<CollisionSpec>> {
        if !a.bounding_box().intersects(&b.bounding_box()) {
            return Ok(None);
        }

        let class = PairClass::of(a, b);
        if class == PairClass::CompositeComposite {
            return Err(PhysicsError::UnsupportedTopology(format!(
                "collision between composites {} and {}",
                handle_a, handle_b
            )));
        }

        for leaf_a in a.leaves() {
            for leaf_b in b.leaves() {
                let offset = leaf_a.center - leaf_b.center;
                let reach = leaf_a.radius + leaf_b.radius;
                if offset.length_squared() <= reach * reach {
                    let contact_point = leaf_a.center - offset * (leaf_a.radius / reach);
                    return Ok(Some(CollisionSpec {
                        body_a: handle_a,
                        body_b: handle_b,
                        leaf_a: leaf_a.index,
                        leaf_b: leaf_b.index,
                        line_of_action: offset,
                        contact_point,
                        class,
                    }));
                }
            }
        }

        Ok(None)
    }
}
