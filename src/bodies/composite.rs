use crate::bodies::{Body, Species};
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// One disk of a composite, positioned in the composite's body frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Member {
    pub species: Species,

    pub radius: f64,

    pub mass: f64,

    /// Offset of the disk centre from the composite's centre of mass, body frame
    pub offset: Vector2,
}

impl Member {
    pub fn new(species: Species, mass: f64, radius: f64, offset: Vector2) -> Self {
        Self { species, radius, mass, offset }
    }
}

/// A bond between two members, by index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Bond {
    pub a: usize,
    pub b: usize,
}

/// Bonded disks forming one rigid body.
///
/// The member list is flat: absorbing another body copies its disks in, so
/// a composite never contains a composite.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Composite {
    members: Vec<Member>,
    bonds: Vec<Bond>,
}

impl Composite {
    /// Builds a composite, shifting the offsets so the centre of mass sits at the origin.
    ///
    /// Fails on fewer than two members, non-positive radii or masses, and
    /// bonds that reference missing members.
    pub fn new(mut members: Vec<Member>, bonds: Vec<Bond>) -> Result<Self> {
        if members.len() < 2 {
            return Err(PhysicsError::InvalidGeometry(format!(
                "a composite needs at least two members, got {}",
                members.len()
            )));
        }
        for member in &members {
            if member.radius <= 0.0 || !member.radius.is_finite() {
                return Err(PhysicsError::InvalidGeometry(format!("member radius must be positive, got {}", member.radius)));
            }
            if member.mass <= 0.0 || !member.mass.is_finite() {
                return Err(PhysicsError::InvalidParameter(format!("member mass must be positive, got {}", member.mass)));
            }
        }
        if let Some(bond) = bonds.iter().find(|bond| bond.a >= members.len() || bond.b >= members.len() || bond.a == bond.b) {
            return Err(PhysicsError::InvalidGeometry(format!(
                "bond {}-{} does not join two distinct members of {}",
                bond.a,
                bond.b,
                members.len()
            )));
        }

        let mass: f64 = members.iter().map(|m| m.mass).sum();
        let center = members.iter().map(|m| m.offset * m.mass).sum::<Vector2>() / mass;
        for member in members.iter_mut() {
            member.offset -= center;
        }
        Ok(Self { members, bonds })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn mass(&self) -> f64 {
        self.members.iter().map(|m| m.mass).sum()
    }

    /// Moment of inertia about the centre of mass, each member a uniform disk
    pub fn moment_of_inertia(&self) -> f64 {
        self.members
            .iter()
            .map(|m| 0.5 * m.mass * m.radius * m.radius + m.mass * m.offset.length_squared())
            .sum()
    }

    /// Species of every member, sorted
    pub fn make_up(&self) -> Vec<Species> {
        let mut species: Vec<Species> = self.members.iter().map(|m| m.species).collect();
        species.sort();
        species
    }
}

impl Body {
    /// Creates a composite body at rest with its centre of mass at `position`
    pub fn from_members(members: Vec<Member>, bonds: Vec<Bond>, position: Vector2) -> Result<Self> {
        let composite = Composite::new(members, bonds)?;
        Ok(Body::from_composite(composite, position, Vector2::zero(), 0.0))
    }
}

/// Bonds two bodies into one composite at the touching leaves.
///
/// Mass, charge, linear momentum and angular momentum about the new centre
/// of mass are conserved. Two composites cannot bond.
pub fn bond_bodies(a: &Body, leaf_a: usize, b: &Body, leaf_b: usize) -> Result<Body> {
    if a.is_composite() && b.is_composite() {
        return Err(PhysicsError::UnsupportedTopology("two composite bodies cannot bond".into()));
    }

    let leaves_a = a.leaves();
    let leaves_b = b.leaves();
    if leaf_a >= leaves_a.len() || leaf_b >= leaves_b.len() {
        return Err(PhysicsError::ResourceNotFound(format!(
            "bond leaves {}/{} out of range {}/{}",
            leaf_a,
            leaf_b,
            leaves_a.len(),
            leaves_b.len()
        )));
    }

    let mass = a.get_mass() + b.get_mass();
    let center = (a.get_position() * a.get_mass() + b.get_position() * b.get_mass()) / mass;
    let velocity = (a.linear_momentum() + b.linear_momentum()) / mass;
    let angular_momentum = a.angular_momentum_about(center) + b.angular_momentum_about(center);

    let members: Vec<Member> = leaves_a
        .iter()
        .chain(leaves_b.iter())
        .map(|leaf| Member::new(leaf.species, leaf.mass, leaf.radius, leaf.center - center))
        .collect();

    let shift = leaves_a.len();
    let mut bonds: Vec<Bond> = a.composite().map(|c| c.bonds().to_vec()).unwrap_or_default();
    if let Some(composite) = b.composite() {
        bonds.extend(composite.bonds().iter().map(|bond| Bond { a: bond.a + shift, b: bond.b + shift }));
    }
    bonds.push(Bond { a: leaf_a, b: leaf_b + shift });

    let composite = Composite::new(members, bonds)?;
    let inertia = composite.moment_of_inertia();
    let angular_velocity = if inertia > 0.0 { angular_momentum / inertia } else { 0.0 };

    let product = Body::from_composite(composite, center, velocity, angular_velocity)
        .with_charge(a.get_charge() + b.get_charge())
        .with_flags(a.get_flags() | b.get_flags());

    log::trace!(
        "bonded bodies into composite of {} members, mass {}",
        product.composite().map_or(0, |c| c.len()),
        mass
    );
    Ok(product)
}
