use crate::math::Vector2;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Axis-aligned bounding rectangle used as the cheap reject before exact overlap tests
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Lower-left corner
    pub min: Vector2,

    /// Upper-right corner
    pub max: Vector2,
}

impl Aabb {
    #[inline]
    pub fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    /// Bounding box of a disk
    #[inline]
    pub fn from_circle(center: Vector2, radius: f64) -> Self {
        let half = Vector2::new(radius, radius);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Creates an AABB from a set of points
    pub fn from_points(points: &[Vector2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::new(*first, *first);
        for point in rest {
            aabb.expand_to_include(*point);
        }
        Some(aabb)
    }

    #[inline]
    pub fn center(&self) -> Vector2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns true if the boxes overlap or touch
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline]
    pub fn contains_point(&self, point: Vector2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Grows the box so it covers `point`
    #[inline]
    pub fn expand_to_include(&mut self, point: Vector2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Returns the smallest box covering both
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            Vector2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Vector2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }
}
