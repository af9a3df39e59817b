use crate::bodies::{BodyFlags, Composite, Species};
use crate::error::PhysicsError;
use crate::math::{Aabb, Vector2};
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Geometry of a free body
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum BodyShape {
    /// A single disk of one species
    Disk { species: Species, radius: f64 },

    /// Several bonded disks moving as one rigid body
    Composite(Composite),
}

/// One disk of a body, expressed in world space.
///
/// A simple body has exactly one leaf; a composite has one per member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf {
    /// Index of the member inside the body (0 for a simple body)
    pub index: usize,

    pub species: Species,

    pub radius: f64,

    pub mass: f64,

    /// Centre of the disk in world space
    pub center: Vector2,

    /// Velocity of the disk centre, including the body's spin
    pub velocity: Vector2,
}

/// A free 2D rigid body: a disk or a composite of bonded disks
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Body {
    /// Centre of mass in world space
    position: Vector2,

    velocity: Vector2,

    /// Orientation in radians, counter-clockwise
    angle: f64,

    /// Angular velocity in radians per second, counter-clockwise
    angular_velocity: f64,

    mass: f64,

    /// Moment of inertia about the centre of mass
    inertia: f64,

    charge: f64,

    flags: BodyFlags,

    shape: BodyShape,
}

impl Body {
    /// Creates a simple disk body at rest at the origin
    pub fn disk(species: Species, mass: f64, radius: f64) -> Result<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(PhysicsError::InvalidGeometry(format!("disk radius must be positive, got {}", radius)));
        }
        if mass <= 0.0 || !mass.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!("mass must be positive, got {}", mass)));
        }
        Ok(Self {
            position: Vector2::zero(),
            velocity: Vector2::zero(),
            angle: 0.0,
            angular_velocity: 0.0,
            mass,
            inertia: 0.5 * mass * radius * radius,
            charge: 0.0,
            flags: BodyFlags::default(),
            shape: BodyShape::Disk { species, radius },
        })
    }

    /// Creates a body from an already centred composite
    pub(crate) fn from_composite(composite: Composite, position: Vector2, velocity: Vector2, angular_velocity: f64) -> Self {
        let mass = composite.mass();
        let inertia = composite.moment_of_inertia();
        Self {
            position,
            velocity,
            angle: 0.0,
            angular_velocity,
            mass,
            inertia,
            charge: 0.0,
            flags: BodyFlags::default(),
            shape: BodyShape::Composite(composite),
        }
    }

    pub fn with_position(mut self, position: Vector2) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_flags(mut self, flags: BodyFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn get_position(&self) -> Vector2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    pub fn get_velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector2) {
        self.velocity = velocity;
    }

    pub fn get_angle(&self) -> f64 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }

    pub fn get_angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    pub fn get_mass(&self) -> f64 {
        self.mass
    }

    /// Inverse mass, zero for fixed bodies
    pub fn get_inverse_mass(&self) -> f64 {
        if self.is_fixed() {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    pub fn get_moment_of_inertia(&self) -> f64 {
        self.inertia
    }

    /// Inverse moment of inertia, zero for fixed bodies
    pub fn get_inverse_inertia(&self) -> f64 {
        if self.is_fixed() || self.inertia <= 0.0 {
            0.0
        } else {
            1.0 / self.inertia
        }
    }

    pub fn get_charge(&self) -> f64 {
        self.charge
    }

    pub fn set_charge(&mut self, charge: f64) {
        self.charge = charge;
    }

    pub fn get_flags(&self) -> BodyFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: BodyFlags) {
        self.flags = flags;
    }

    pub fn get_shape(&self) -> &BodyShape {
        &self.shape
    }

    pub fn is_fixed(&self) -> bool {
        self.flags.contains(BodyFlags::FIXED)
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.shape, BodyShape::Composite(_))
    }

    /// Species of a simple body, `None` for composites
    pub fn species(&self) -> Option<Species> {
        match self.shape {
            BodyShape::Disk { species, .. } => Some(species),
            BodyShape::Composite(_) => None,
        }
    }

    pub fn composite(&self) -> Option<&Composite> {
        match &self.shape {
            BodyShape::Composite(composite) => Some(composite),
            BodyShape::Disk { .. } => None,
        }
    }

    /// Velocity of a point rigidly attached to the body
    pub fn velocity_at_point(&self, point: Vector2) -> Vector2 {
        self.velocity + Vector2::cross_scalar(self.angular_velocity, &(point - self.position))
    }

    /// Every disk of the body in world space
    pub fn leaves(&self) -> Vec<Leaf> {
        match &self.shape {
            BodyShape::Disk { species, radius } => vec![Leaf {
                index: 0,
                species: *species,
                radius: *radius,
                mass: self.mass,
                center: self.position,
                velocity: self.velocity,
            }],
            BodyShape::Composite(composite) => composite
                .members()
                .iter()
                .enumerate()
                .map(|(index, member)| {
                    let center = self.position + member.offset.rotate(self.angle);
                    Leaf {
                        index,
                        species: member.species,
                        radius: member.radius,
                        mass: member.mass,
                        center,
                        velocity: self.velocity_at_point(center),
                    }
                })
                .collect(),
        }
    }

    /// Gets a single leaf by index
    pub fn leaf(&self, index: usize) -> Option<Leaf> {
        self.leaves().into_iter().nth(index)
    }

    /// Bounding box covering every leaf
    pub fn bounding_box(&self) -> Aabb {
        let leaves = self.leaves();
        let mut iter = leaves.iter().map(|leaf| Aabb::from_circle(leaf.center, leaf.radius));
        let first = iter.next().unwrap_or_else(|| Aabb::new(self.position, self.position));
        iter.fold(first, |acc, aabb| acc.merged(&aabb))
    }

    /// Translational plus rotational kinetic energy
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
            + 0.5 * self.inertia * self.angular_velocity * self.angular_velocity
    }

    pub fn linear_momentum(&self) -> Vector2 {
        self.velocity * self.mass
    }

    /// Angular momentum about an arbitrary world point
    pub fn angular_momentum_about(&self, point: Vector2) -> f64 {
        self.inertia * self.angular_velocity + self.mass * (self.position - point).cross(&self.velocity)
    }

    /// Applies an impulse at a world point, changing both linear and angular velocity
    pub fn apply_impulse_at(&mut self, impulse: Vector2, point: Vector2) {
        let r = point - self.position;
        self.velocity += impulse * self.get_inverse_mass();
        self.angular_velocity += r.cross(&impulse) * self.get_inverse_inertia();
    }

    /// Returns true if no part of the state is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.angle.is_finite()
            && self.angular_velocity.is_finite()
    }
}
