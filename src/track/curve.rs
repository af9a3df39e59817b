use crate::error::PhysicsError;
use crate::math::{lerp, Vector2};
use crate::Result;
use std::f64::consts::PI;

/// Radius used in place of an infinite radius of curvature
pub const STRAIGHT_RADIUS: f64 = 100_000.0;

/// A parametric curve a particle can ride along, `alpha` running from 0 to 1
pub trait Track: Send + Sync + std::fmt::Debug {
    /// Point on the track at `alpha`
    fn evaluate(&self, alpha: f64) -> Vector2;

    /// Unit tangent pointing toward increasing `alpha`
    fn unit_parallel_vector(&self, alpha: f64) -> Vector2;

    /// Arc length of the whole track
    fn length(&self) -> f64;

    /// Unit normal, the tangent rotated a quarter turn counter-clockwise
    fn unit_normal_vector(&self, alpha: f64) -> Vector2 {
        self.unit_parallel_vector(alpha).perpendicular()
    }

    /// Direction of the tangent in radians
    fn angle(&self, alpha: f64) -> f64 {
        self.unit_parallel_vector(alpha).angle()
    }

    /// Change in `alpha` that moves a distance `distance` along the track from `alpha`
    fn fractional_distance(&self, _alpha: f64, distance: f64) -> f64 {
        distance / self.length()
    }

    /// Signed radius of curvature; negative when the track turns counter-clockwise,
    /// infinite when straight
    fn radius_of_curvature(&self, alpha: f64) -> f64 {
        let epsilon = 0.001;
        let a0 = alpha + self.fractional_distance(alpha, -epsilon / 2.0);
        let a1 = alpha + self.fractional_distance(alpha, epsilon / 2.0);
        let distance = self.evaluate(a0).distance(&self.evaluate(a1));
        let mut turn = self.angle(a0) - self.angle(a1);
        while turn > PI {
            turn -= 2.0 * PI;
        }
        while turn < -PI {
            turn += 2.0 * PI;
        }
        if turn == 0.0 || distance == 0.0 {
            return f64::INFINITY;
        }
        distance / turn
    }

    /// Unit vector from the track toward its centre of curvature.
    ///
    /// A straight track returns its unit normal.
    fn curvature_direction(&self, alpha: f64) -> Vector2 {
        let normal = self.unit_normal_vector(alpha);
        let radius = self.radius_of_curvature(alpha);
        if radius.is_finite() && radius > 0.0 {
            -normal
        } else {
            normal
        }
    }
}

/// Straight segment between two points
#[derive(Debug, Clone)]
pub struct LineTrack {
    start: Vector2,
    end: Vector2,
}

impl LineTrack {
    pub fn new(start: Vector2, end: Vector2) -> Result<Self> {
        if start.distance(&end) < crate::math::EPSILON {
            return Err(PhysicsError::InvalidGeometry(format!(
                "line track from {} to {} has no length",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Vector2 {
        self.start
    }

    pub fn end(&self) -> Vector2 {
        self.end
    }
}

impl Track for LineTrack {
    fn evaluate(&self, alpha: f64) -> Vector2 {
        Vector2::new(lerp(self.start.x, self.end.x, alpha), lerp(self.start.y, self.end.y, alpha))
    }

    fn unit_parallel_vector(&self, _alpha: f64) -> Vector2 {
        (self.end - self.start).normalize()
    }

    fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    fn radius_of_curvature(&self, _alpha: f64) -> f64 {
        f64::INFINITY
    }
}

/// Circular arc swept from `start_angle` to `end_angle` around `center`
#[derive(Debug, Clone)]
pub struct ArcTrack {
    center: Vector2,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
}

impl ArcTrack {
    pub fn new(center: Vector2, radius: f64, start_angle: f64, end_angle: f64) -> Result<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(PhysicsError::InvalidGeometry(format!("arc radius must be positive, got {}", radius)));
        }
        if (end_angle - start_angle).abs() < crate::math::EPSILON {
            return Err(PhysicsError::InvalidGeometry("arc must sweep a non-zero angle".into()));
        }
        Ok(Self { center, radius, start_angle, end_angle })
    }

    pub fn center(&self) -> Vector2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn theta(&self, alpha: f64) -> f64 {
        lerp(self.start_angle, self.end_angle, alpha)
    }

    fn sweep_sign(&self) -> f64 {
        (self.end_angle - self.start_angle).signum()
    }
}

impl Track for ArcTrack {
    fn evaluate(&self, alpha: f64) -> Vector2 {
        self.center + Vector2::from_polar(self.radius, self.theta(alpha))
    }

    fn unit_parallel_vector(&self, alpha: f64) -> Vector2 {
        let theta = self.theta(alpha);
        Vector2::new(-theta.sin(), theta.cos()) * self.sweep_sign()
    }

    fn length(&self) -> f64 {
        self.radius * (self.end_angle - self.start_angle).abs()
    }

    fn radius_of_curvature(&self, _alpha: f64) -> f64 {
        -self.radius * self.sweep_sign()
    }

    fn curvature_direction(&self, alpha: f64) -> Vector2 {
        (self.center - self.evaluate(alpha)).normalize()
    }
}
