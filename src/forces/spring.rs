use crate::bodies::Body;
use crate::core::{BodyHandle, HandleStorage, Storage};
use crate::math::Vector2;

/// What the far end of a spring is attached to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpringAnchor {
    /// Centre of mass of another body
    Body(BodyHandle),

    /// Fixed point in world space
    Point(Vector2),
}

/// A damped Hookean spring between body centres, or a body and a fixed point
#[derive(Debug, Clone)]
pub struct SpringForce {
    body_a: BodyHandle,

    anchor: SpringAnchor,

    rest_length: f64,

    /// Spring constant (higher values mean stiffer springs)
    stiffness: f64,

    /// Damping along the spring axis
    damping: f64,
}

impl SpringForce {
    /// Creates a new spring between two bodies
    pub fn between_bodies(body_a: BodyHandle, body_b: BodyHandle, rest_length: f64, stiffness: f64, damping: f64) -> Self {
        Self {
            body_a,
            anchor: SpringAnchor::Body(body_b),
            rest_length: rest_length.max(0.0),
            stiffness: stiffness.max(0.0),
            damping: damping.max(0.0),
        }
    }

    /// Creates a new spring between a body and a fixed world point
    pub fn anchored_at(body: BodyHandle, point: Vector2, rest_length: f64, stiffness: f64, damping: f64) -> Self {
        Self {
            body_a: body,
            anchor: SpringAnchor::Point(point),
            rest_length: rest_length.max(0.0),
            stiffness: stiffness.max(0.0),
            damping: damping.max(0.0),
        }
    }

    pub fn body_a(&self) -> BodyHandle {
        self.body_a
    }

    pub fn body_b(&self) -> Option<BodyHandle> {
        match self.anchor {
            SpringAnchor::Body(handle) => Some(handle),
            SpringAnchor::Point(_) => None,
        }
    }

    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b() == Some(body)
    }

    pub fn get_rest_length(&self) -> f64 {
        self.rest_length
    }

    pub fn get_stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Force on an end at `position` moving at `velocity`, pulled toward `other`
    fn force_between(&self, position: Vector2, velocity: Vector2, other: Vector2, other_velocity: Vector2) -> Vector2 {
        let offset = position - other;
        let length = offset.length();
        if length < crate::math::EPSILON {
            return Vector2::zero();
        }
        let direction = offset / length;
        let stretch = length - self.rest_length;
        let closing_speed = (velocity - other_velocity).dot(&direction);
        direction * (-self.stiffness * stretch - self.damping * closing_speed)
    }

    /// Forces on body A and, for body-to-body springs, on body B.
    ///
    /// Returns `None` when an attached body no longer exists.
    pub fn forces(&self, bodies: &HandleStorage<BodyHandle, Body>) -> Option<(Vector2, Option<Vector2>)> {
        let a = bodies.get(self.body_a)?;
        match self.anchor {
            SpringAnchor::Point(point) => {
                Some((self.force_between(a.get_position(), a.get_velocity(), point, Vector2::zero()), None))
            }
            SpringAnchor::Body(handle) => {
                let b = bodies.get(handle)?;
                let on_a = self.force_between(a.get_position(), a.get_velocity(), b.get_position(), b.get_velocity());
                Some((on_a, Some(-on_a)))
            }
        }
    }
}
