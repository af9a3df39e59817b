use crate::bodies::{bond_bodies, Body};
use crate::collision::reaction::{may_react, NoReactions, ReactionCriteria};
use crate::collision::CollisionSpec;
use crate::core::{CollisionConfig, Diagnostics};
use crate::error::PhysicsError;
use crate::math::{Vector2, EPSILON};
use crate::Result;

/// What the resolver did with a collision
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The two bodies were replaced by this composite
    Bonded(Body),

    /// An impulse of this magnitude was applied along the line of action
    Impulse(f64),

    /// The bodies were already moving apart
    Separating,
}

/// Turns a detected overlap into either a bond or an impulse exchange
#[derive(Debug)]
pub struct CollisionResolver {
    criteria: Box<dyn ReactionCriteria>,
    restitution: f64,
    energy_tolerance: f64,
}

impl CollisionResolver {
    pub fn new(criteria: Box<dyn ReactionCriteria>, config: &CollisionConfig) -> Self {
        Self {
            criteria,
            restitution: config.restitution,
            energy_tolerance: config.energy_tolerance,
        }
    }

    /// Perfectly elastic resolver that never bonds
    pub fn elastic() -> Self {
        Self::new(Box::new(NoReactions), &CollisionConfig::default())
    }

    pub fn get_criteria(&self) -> &dyn ReactionCriteria {
        self.criteria.as_ref()
    }

    pub fn set_criteria(&mut self, criteria: Box<dyn ReactionCriteria>) {
        self.criteria = criteria;
    }

    pub fn get_restitution(&self) -> f64 {
        self.restitution
    }

    pub fn set_restitution(&mut self, restitution: f64) {
        self.restitution = restitution;
    }

    pub fn get_energy_tolerance(&self) -> f64 {
        self.energy_tolerance
    }

    /// Resolves one collision.
    ///
    /// When the reaction criteria are met the bodies are left untouched and
    /// the bonded product is returned for the caller to swap in. Otherwise
    /// both bodies receive equal and opposite impulses at the contact point.
    pub fn resolve(&self, spec: &CollisionSpec, a: &mut Body, b: &mut Body, diagnostics: &mut Diagnostics) -> Result<Resolution> {
        if may_react(a, b) && self.criteria.criteria_met(a, b, spec) {
            let product = bond_bodies(a, spec.leaf_a, b, spec.leaf_b)?;
            log::debug!("{} bonded {} and {}", self.criteria.name(), spec.body_a, spec.body_b);
            return Ok(Resolution::Bonded(product));
        }

        self.apply_impulse(spec, a, b, diagnostics)
    }

    fn apply_impulse(&self, spec: &CollisionSpec, a: &mut Body, b: &mut Body, diagnostics: &mut Diagnostics) -> Result<Resolution> {
        let normal = spec.normal();
        if normal.is_zero() {
            return Err(PhysicsError::NumericDegeneracy(format!(
                "coincident centres for {} and {}",
                spec.body_a, spec.body_b
            )));
        }

        // Centres must be approaching along the line of action
        if (a.get_velocity() - b.get_velocity()).dot(&normal) > 0.0 {
            return Ok(Resolution::Separating);
        }

        let contact = spec.contact_point;
        let r_a = contact - a.get_position();
        let r_b = contact - b.get_position();
        let relative_velocity = (a.velocity_at_point(contact) - b.velocity_at_point(contact)).dot(&normal);

        let denominator = a.get_inverse_mass()
            + b.get_inverse_mass()
            + angular_term(r_a, normal, a.get_inverse_inertia())
            + angular_term(r_b, normal, b.get_inverse_inertia());
        if denominator <= 0.0 {
            return Ok(Resolution::Separating);
        }

        let j = -(1.0 + self.restitution) * relative_velocity / denominator;
        if j <= 0.0 {
            return Ok(Resolution::Separating);
        }

        let energy_before = a.kinetic_energy() + b.kinetic_energy();
        a.apply_impulse_at(normal * j, contact);
        b.apply_impulse_at(-normal * j, contact);
        let energy_after = a.kinetic_energy() + b.kinetic_energy();

        let drift = (energy_after - energy_before).abs() / energy_before.max(EPSILON);
        diagnostics.observe_energy_drift(drift, self.energy_tolerance);
        if drift > self.energy_tolerance && self.restitution >= 1.0 {
            log::warn!(
                "energy not conserved in collision of {} and {}: before {}, after {}",
                spec.body_a,
                spec.body_b,
                energy_before,
                energy_after
            );
        }

        Ok(Resolution::Impulse(j))
    }
}

/// `((r × n) I⁻¹ × r) · n`, the rotational share of the impulse denominator
fn angular_term(r: Vector2, normal: Vector2, inverse_inertia: f64) -> f64 {
    let r3 = r.extend(0.0);
    let n3 = normal.extend(0.0);
    (r3.cross(&n3) * inverse_inertia).cross(&r3).dot(&n3)
}
