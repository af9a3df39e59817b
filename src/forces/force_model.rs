use crate::bodies::{Body, BodyFlags};
use crate::core::{BodyHandle, HandleStorage, Storage};
use crate::forces::{FrictionForce, GravityForce, SpringForce, ThrustForce};
use crate::math::Vector2;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// External inputs to the force models, pushed into the world before a step
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Environment {
    /// Gravitational acceleration, y up
    pub gravity: Vector2,

    /// Thrust as an acceleration; the applied force is `mass * thrust`
    pub thrust: Vector2,

    /// Friction coefficient for subjects that do not carry their own
    pub friction_coefficient: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            gravity: Vector2::new(0.0, -9.8),
            thrust: Vector2::zero(),
            friction_coefficient: 0.0,
        }
    }
}

impl Environment {
    pub fn with_gravity(gravity: Vector2) -> Self {
        Self { gravity, ..Self::default() }
    }

    /// No gravity, thrust or friction
    pub fn empty() -> Self {
        Self {
            gravity: Vector2::zero(),
            thrust: Vector2::zero(),
            friction_coefficient: 0.0,
        }
    }
}

/// Anything a force model can act on
pub trait ForceSubject {
    fn mass(&self) -> f64;

    fn position(&self) -> Vector2;

    fn velocity(&self) -> Vector2;

    fn charge(&self) -> f64 {
        0.0
    }

    fn affected_by_gravity(&self) -> bool {
        true
    }

    /// Magnitude of the normal force pressing the subject onto its support
    fn normal_force(&self, environment: &Environment) -> f64;

    /// Friction coefficient acting on the subject
    fn friction_coefficient(&self, environment: &Environment) -> f64 {
        environment.friction_coefficient
    }
}

/// A force that depends only on one subject and the environment
pub trait ForceModel: Send + Sync + std::fmt::Debug {
    /// Returns the type name of the model
    fn model_type(&self) -> &'static str;

    /// Instantaneous force on the subject
    fn compute_force(&self, subject: &dyn ForceSubject, environment: &Environment) -> Vector2;

    /// Whether the work done by this force is lost as heat
    fn is_dissipative(&self) -> bool {
        false
    }
}

/// A force between two interacting subjects
pub trait PairForce: Send + Sync + std::fmt::Debug {
    /// Returns the type name of the model
    fn model_type(&self) -> &'static str;

    /// Force exerted on `target` by `source`
    fn force_on(&self, target: &dyn ForceSubject, source: &dyn ForceSubject) -> Vector2;
}

impl ForceSubject for Body {
    fn mass(&self) -> f64 {
        self.get_mass()
    }

    fn position(&self) -> Vector2 {
        self.get_position()
    }

    fn velocity(&self) -> Vector2 {
        self.get_velocity()
    }

    fn charge(&self) -> f64 {
        self.get_charge()
    }

    fn affected_by_gravity(&self) -> bool {
        self.get_flags().contains(BodyFlags::AFFECTED_BY_GRAVITY)
    }

    /// Free bodies rest on a horizontal ground plane
    fn normal_force(&self, environment: &Environment) -> f64 {
        self.get_mass() * environment.gravity.length()
    }
}

/// Registry of every force acting in a world.
///
/// Models compose: the net force on a subject is the sum of every
/// single-subject model, every pairwise model against every other body, and
/// every spring attached to it.
#[derive(Debug, Default)]
pub struct ForceRegistry {
    models: Vec<Box<dyn ForceModel>>,

    pair_forces: Vec<Box<dyn PairForce>>,

    springs: Vec<SpringForce>,
}

impl ForceRegistry {
    /// Creates a new empty force registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Gravity, thrust and friction with the given friction gain
    pub fn with_defaults(friction_gain: f64) -> Self {
        let mut registry = Self::new();
        registry.add_model(Box::new(GravityForce::new()));
        registry.add_model(Box::new(ThrustForce::new()));
        registry.add_model(Box::new(FrictionForce::new(friction_gain)));
        registry
    }

    pub fn add_model(&mut self, model: Box<dyn ForceModel>) {
        self.models.push(model);
    }

    pub fn add_pair_force(&mut self, force: Box<dyn PairForce>) {
        self.pair_forces.push(force);
    }

    pub fn add_spring(&mut self, spring: SpringForce) {
        self.springs.push(spring);
    }

    /// Drops every spring attached to the body
    pub fn remove_springs_for(&mut self, body: BodyHandle) {
        self.springs.retain(|spring| !spring.involves(body));
    }

    pub fn len(&self) -> usize {
        self.models.len() + self.pair_forces.len() + self.springs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn model_types(&self) -> Vec<&'static str> {
        self.models
            .iter()
            .map(|m| m.model_type())
            .chain(self.pair_forces.iter().map(|p| p.model_type()))
            .collect()
    }

    /// Sum of the single-subject models
    pub fn net_force(&self, subject: &dyn ForceSubject, environment: &Environment) -> Vector2 {
        self.models
            .iter()
            .map(|model| model.compute_force(subject, environment))
            .sum()
    }

    /// Sum of the dissipative single-subject models (friction)
    pub fn dissipative_force(&self, subject: &dyn ForceSubject, environment: &Environment) -> Vector2 {
        self.models
            .iter()
            .filter(|model| model.is_dissipative())
            .map(|model| model.compute_force(subject, environment))
            .sum()
    }

    /// Sum of the pairwise models between two subjects, as felt by `target`
    pub fn pair_force(&self, target: &dyn ForceSubject, source: &dyn ForceSubject) -> Vector2 {
        self.pair_forces
            .iter()
            .map(|model| model.force_on(target, source))
            .sum()
    }

    /// Net force on every body, in handle order
    pub fn accumulate(&self, bodies: &HandleStorage<BodyHandle, Body>, environment: &Environment) -> Vec<(BodyHandle, Vector2)> {
        let entries: Vec<(BodyHandle, &Body)> = bodies.iter().collect();
        let mut forces: Vec<(BodyHandle, Vector2)> = entries
            .iter()
            .map(|(handle, body)| (*handle, self.net_force(*body, environment)))
            .collect();

        if !self.pair_forces.is_empty() {
            for i in 0..entries.len() {
                for j in (i + 1)..entries.len() {
                    let on_i = self.pair_force(entries[i].1, entries[j].1);
                    let on_j = self.pair_force(entries[j].1, entries[i].1);
                    forces[i].1 += on_i;
                    forces[j].1 += on_j;
                }
            }
        }

        for spring in &self.springs {
            let Some((on_a, on_b)) = spring.forces(bodies) else {
                continue;
            };
            if let Some(entry) = forces.iter_mut().find(|(h, _)| *h == spring.body_a()) {
                entry.1 += on_a;
            }
            if let (Some(body_b), Some(on_b)) = (spring.body_b(), on_b) {
                if let Some(entry) = forces.iter_mut().find(|(h, _)| *h == body_b) {
                    entry.1 += on_b;
                }
            }
        }

        forces
    }
}
