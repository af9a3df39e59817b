use crate::bodies::{Body, BodyFlags, Species};
use crate::collision::{CollisionSpec, PairClass};

/// Decides whether a collision bonds the two bodies instead of bouncing them
pub trait ReactionCriteria: Send + Sync + std::fmt::Debug {
    fn criteria_met(&self, a: &Body, b: &Body, spec: &CollisionSpec) -> bool;

    fn name(&self) -> &str;
}

/// Kinetic energy of the combined mass moving at the closing speed of the two
/// centres of mass; zero when they are separating
pub fn collision_energy(a: &Body, b: &Body) -> f64 {
    let axis = (b.get_position() - a.get_position()).normalize();
    let closing_speed = (a.get_velocity().dot(&axis) - b.get_velocity().dot(&axis)).max(0.0);
    0.5 * (a.get_mass() + b.get_mass()) * closing_speed * closing_speed
}

/// Both bodies must be flagged reactive and free to move
pub fn may_react(a: &Body, b: &Body) -> bool {
    let reactive = |body: &Body| body.get_flags().contains(BodyFlags::REACTIVE) && !body.is_fixed();
    reactive(a) && reactive(b)
}

/// Never bonds
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReactions;

impl ReactionCriteria for NoReactions {
    fn criteria_met(&self, _a: &Body, _b: &Body, _spec: &CollisionSpec) -> bool {
        false
    }

    fn name(&self) -> &str {
        "NoReactions"
    }
}

/// Bonds any two bodies whose combined kinetic energy exceeds a threshold
#[derive(Debug, Clone, Copy)]
pub struct EnergyThresholdCriteria {
    pub threshold: f64,
}

impl EnergyThresholdCriteria {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl ReactionCriteria for EnergyThresholdCriteria {
    fn criteria_met(&self, a: &Body, b: &Body, spec: &CollisionSpec) -> bool {
        spec.class != PairClass::CompositeComposite && a.kinetic_energy() + b.kinetic_energy() > self.threshold
    }

    fn name(&self) -> &str {
        "EnergyThreshold"
    }
}

/// Bonds two simple bodies of different species above an energy threshold
#[derive(Debug, Clone, Copy)]
pub struct DistinctSpeciesCriteria {
    pub threshold: f64,
}

impl DistinctSpeciesCriteria {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl ReactionCriteria for DistinctSpeciesCriteria {
    fn criteria_met(&self, a: &Body, b: &Body, spec: &CollisionSpec) -> bool {
        if spec.class != PairClass::SimpleSimple {
            return false;
        }
        a.species() != b.species() && a.kinetic_energy() + b.kinetic_energy() > self.threshold
    }

    fn name(&self) -> &str {
        "DistinctSpecies"
    }
}

/// A simple body of `partner` species joining a composite made of exactly `make_up`
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundRule {
    /// Species of the composite's members, in any order
    pub make_up: Vec<Species>,

    pub partner: Species,

    /// Minimum collision energy along the line between the centres
    pub threshold: f64,
}

impl CompoundRule {
    pub fn new(mut make_up: Vec<Species>, partner: Species, threshold: f64) -> Self {
        make_up.sort();
        Self { make_up, partner, threshold }
    }
}

/// Bonds a simple body to a composite when one of the rules matches
#[derive(Debug, Clone, Default)]
pub struct CompoundFormationCriteria {
    rules: Vec<CompoundRule>,
}

impl CompoundFormationCriteria {
    pub fn new(rules: Vec<CompoundRule>) -> Self {
        Self { rules }
    }

    pub fn add_rule(&mut self, rule: CompoundRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[CompoundRule] {
        &self.rules
    }
}

impl ReactionCriteria for CompoundFormationCriteria {
    fn criteria_met(&self, a: &Body, b: &Body, spec: &CollisionSpec) -> bool {
        let (composite, simple) = match spec.class {
            PairClass::CompositeSimple => (a, b),
            PairClass::SimpleComposite => (b, a),
            _ => return false,
        };
        let (Some(make_up), Some(species)) = (composite.composite().map(|c| c.make_up()), simple.species()) else {
            return false;
        };
        let energy = collision_energy(a, b);
        self.rules
            .iter()
            .any(|rule| rule.make_up == make_up && rule.partner == species && energy >= rule.threshold)
    }

    fn name(&self) -> &str {
        "CompoundFormation"
    }
}
