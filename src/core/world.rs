use std::collections::BTreeSet;

use crate::bodies::Body;
use crate::circuit::{Circuit, ConstantDensityPropagator, ParticleSet};
use crate::collision::{
    BroadPhase, BruteForceBroadPhase, CollisionDetector, CollisionResolver, CollisionSpec, ReactionCriteria, Resolution,
};
use crate::core::{
    BodyEvent, BodyHandle, CollisionEvent, CollisionOutcome, Command, CommandQueue, Diagnostics, EventQueue,
    HandleStorage, Observers, RiderHandle, SimulationConfig, Storage,
};
use crate::error::PhysicsError;
use crate::forces::{limit_friction, Environment, ForceRegistry};
use crate::integration::{BodyIntegrator, Integrator, SymplecticEulerIntegrator};
use crate::track::{EnergyFixOutcome, TrackParticle};
use crate::Result;

/// Whether the world is between steps or inside one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Idle,
    Stepping,
}

/// A track rider together with the integrator that advances it
struct Rider {
    particle: TrackParticle,
    integrator: Box<dyn Integrator>,
}

/// The main physics world that owns every simulated object and drives the step
pub struct PhysicsWorld {
    /// Free bodies, simple and composite
    bodies: HandleStorage<BodyHandle, Body>,

    /// Particles constrained to tracks
    riders: HandleStorage<RiderHandle, Rider>,

    /// Wire network the electrons move on
    circuit: Circuit,

    particles: ParticleSet,

    propagator: ConstantDensityPropagator,

    /// Force models applied to riders and free bodies
    forces: ForceRegistry,

    body_integrator: Box<dyn BodyIntegrator>,

    broad_phase: BruteForceBroadPhase,

    detector: CollisionDetector,

    resolver: CollisionResolver,

    environment: Environment,

    /// Configuration for the simulation
    config: SimulationConfig,

    /// Events raised during the last step
    events: EventQueue,

    /// Body events waiting to be dispatched at the end of the next step
    pending_body_events: Vec<BodyEvent>,

    observers: Observers,

    /// Structural changes applied at the start of the next step
    commands: CommandQueue,

    diagnostics: Diagnostics,

    state: StepState,

    /// The total elapsed simulation time
    time: f64,
}

impl PhysicsWorld {
    /// Creates a new physics world with default settings
    pub fn new() -> Self {
        Self::build(SimulationConfig::default())
    }

    /// Creates a new physics world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SimulationConfig) -> Self {
        Self {
            bodies: HandleStorage::new(),
            riders: HandleStorage::new(),
            circuit: Circuit::new(),
            particles: ParticleSet::new(),
            propagator: ConstantDensityPropagator::new(config.propagator.clone(), config.seed),
            forces: ForceRegistry::with_defaults(config.friction_gain),
            body_integrator: Box::new(SymplecticEulerIntegrator::new()),
            broad_phase: BruteForceBroadPhase::new(),
            detector: CollisionDetector::new(),
            resolver: CollisionResolver::new(Box::new(crate::collision::NoReactions), &config.collision),
            environment: Environment::with_gravity(config.gravity),
            config,
            events: EventQueue::new(),
            pending_body_events: Vec::new(),
            observers: Observers::new(),
            commands: CommandQueue::new(),
            diagnostics: Diagnostics::new(),
            state: StepState::Idle,
            time: 0.0,
        }
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f64 {
        self.time
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn get_environment(&self) -> &Environment {
        &self.environment
    }

    /// Sets gravity, thrust and friction for the following steps
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    /// Adds a free body and returns its handle
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let snapshot = body.clone();
        let handle = self.bodies.add(body);
        log::trace!("added {}", handle);
        self.pending_body_events.push(BodyEvent::added(handle, snapshot));
        handle
    }

    /// Removes a free body and any spring attached to it
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self
            .bodies
            .remove(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("{} not found", handle)))?;
        self.forces.remove_springs_for(handle);
        log::trace!("removed {}", handle);
        self.pending_body_events.push(BodyEvent::removed(handle, body.clone()));
        Ok(body)
    }

    /// Gets a reference to a free body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get_checked(handle)
    }

    /// Gets a mutable reference to a free body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_checked_mut(handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }

    /// Returns the number of free bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Adds a track rider advanced by the given integrator
    pub fn add_rider(&mut self, particle: TrackParticle, integrator: Box<dyn Integrator>) -> RiderHandle {
        let handle = self.riders.add(Rider { particle, integrator });
        log::trace!("added {}", handle);
        handle
    }

    pub fn remove_rider(&mut self, handle: RiderHandle) -> Result<TrackParticle> {
        self.riders
            .remove(handle)
            .map(|rider| rider.particle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("{} not found", handle)))
    }

    pub fn get_rider(&self, handle: RiderHandle) -> Result<&TrackParticle> {
        self.riders.get_checked(handle).map(|rider| &rider.particle)
    }

    pub fn get_rider_mut(&mut self, handle: RiderHandle) -> Result<&mut TrackParticle> {
        self.riders.get_checked_mut(handle).map(|rider| &mut rider.particle)
    }

    /// Name of the integrator that advances the rider
    pub fn rider_integrator(&self, handle: RiderHandle) -> Result<&str> {
        self.riders.get_checked(handle).map(|rider| rider.integrator.name())
    }

    /// Swaps the integrator of a rider
    pub fn set_rider_integrator(&mut self, handle: RiderHandle, integrator: Box<dyn Integrator>) -> Result<()> {
        self.riders.get_checked_mut(handle)?.integrator = integrator;
        Ok(())
    }

    pub fn rider_count(&self) -> usize {
        self.riders.len()
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    /// Electrons and circuit together, for setting up a network in one borrow
    pub fn circuit_and_particles_mut(&mut self) -> (&mut Circuit, &mut ParticleSet) {
        (&mut self.circuit, &mut self.particles)
    }

    pub fn propagator(&self) -> &ConstantDensityPropagator {
        &self.propagator
    }

    /// True when electron motion was slowed to keep steps short
    pub fn speed_limited(&self) -> bool {
        self.propagator.speed_limited()
    }

    pub fn forces(&self) -> &ForceRegistry {
        &self.forces
    }

    pub fn forces_mut(&mut self) -> &mut ForceRegistry {
        &mut self.forces
    }

    pub fn set_body_integrator(&mut self, integrator: Box<dyn BodyIntegrator>) {
        self.body_integrator = integrator;
    }

    pub fn set_reaction_criteria(&mut self, criteria: Box<dyn ReactionCriteria>) {
        self.resolver.set_criteria(criteria);
    }

    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    /// Queues a structural change for the start of the next step
    pub fn queue_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Returns the events raised during the last step
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Clears the world of all bodies, riders and electrons. The circuit
    /// topology and the observers are kept.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.riders.clear();
        self.particles.clear();
        self.events.clear();
        self.pending_body_events.clear();
        self.commands = CommandQueue::new();
        self.diagnostics.reset();
        self.time = 0.0;
    }

    /// Steps with the configured default time step
    pub fn step_default(&mut self) -> Result<()> {
        self.step(self.config.time_step)
    }

    /// Runs the physics simulation for the given time step
    pub fn step(&mut self, dt: f64) -> Result<()> {
        if dt <= 0.0 || !dt.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!("time step must be positive, got {}", dt)));
        }

        self.state = StepState::Stepping;
        self.events.clear();

        self.apply_commands();
        self.propagator.update_speed_scale(&self.circuit, dt);

        self.step_riders(dt);
        self.step_bodies(dt);
        for handle in self.particles.handles() {
            self.propagator
                .propagate(handle, &mut self.particles, &self.circuit, dt, &mut self.diagnostics);
        }
        for _ in 0..self.config.propagator.equalize_passes {
            self.propagator
                .equalize(&mut self.particles, &self.circuit, dt, &mut self.diagnostics);
        }

        self.detect_collisions();

        self.time += dt;
        self.diagnostics.steps += 1;
        self.dispatch();
        self.state = StepState::Idle;
        Ok(())
    }

    fn apply_commands(&mut self) {
        let commands: Vec<Command> = self.commands.drain().collect();
        for command in commands {
            let outcome = match command {
                Command::AddBody(body) => {
                    self.add_body(body);
                    Ok(())
                }
                Command::RemoveBody(handle) => self.remove_body(handle).map(|_| ()),
                Command::AddElectron { branch, distance } => {
                    self.particles.add_at(&self.circuit, branch, distance).map(|_| ())
                }
                Command::RemoveElectron(handle) => self
                    .particles
                    .remove(handle)
                    .map(|_| ())
                    .ok_or_else(|| PhysicsError::ResourceNotFound(format!("{} not found", handle))),
                Command::SetBranchCurrent { branch, current } => self.circuit.set_current(branch, current),
            };
            if let Err(error) = outcome {
                log::warn!("queued command failed: {}", error);
            }
        }
    }

    fn step_riders(&mut self, dt: f64) {
        for (handle, rider) in self.riders.iter_mut() {
            if !rider.particle.is_finite() {
                continue;
            }
            let backup = rider.particle.clone();
            let outcome = rider.particle.step(
                rider.integrator.as_ref(),
                &self.forces,
                &self.environment,
                self.config.track_substeps,
                &self.config.energy_fix,
                dt,
            );
            if let EnergyFixOutcome::Exhausted(residual) = outcome {
                self.diagnostics.record_energy_fix_exhausted(residual);
            }
            if !rider.particle.is_finite() {
                log::debug!("{} produced a non-finite state with {}, rolled back", handle, rider.integrator.name());
                rider.particle = backup;
                self.diagnostics.skipped_bodies += 1;
            }
        }
    }

    fn step_bodies(&mut self, dt: f64) {
        let forces = self.forces.accumulate(&self.bodies, &self.environment);
        for (handle, force) in forces {
            let Some(body) = self.bodies.get_mut(handle) else {
                continue;
            };
            if !body.is_finite() || !force.is_finite() {
                log::debug!("skipping {} with non-finite state or force", handle);
                self.diagnostics.skipped_bodies += 1;
                continue;
            }

            let friction = self.forces.dissipative_force(&*body, &self.environment);
            let force = limit_friction(body, force, friction, dt);
            let backup = body.clone();
            self.body_integrator.integrate(body, force, dt);
            if !body.is_finite() {
                log::debug!("{} produced a non-finite state with {}, rolled back", handle, self.body_integrator.name());
                *body = backup;
                self.diagnostics.skipped_bodies += 1;
            }
        }
    }

    /// Detects and resolves collisions between free bodies
    fn detect_collisions(&mut self) {
        let entries: Vec<(BodyHandle, &Body)> = self.bodies.iter().collect();
        self.broad_phase.update(&entries);
        let pairs = self.broad_phase.get_collision_pairs();

        let mut consumed: BTreeSet<BodyHandle> = BTreeSet::new();
        for pair in pairs {
            if consumed.contains(&pair.body_a) || consumed.contains(&pair.body_b) {
                continue;
            }
            let (Some(a), Some(b)) = (self.bodies.get(pair.body_a), self.bodies.get(pair.body_b)) else {
                continue;
            };

            let spec = match self.detector.detect(pair.body_a, a, pair.body_b, b) {
                Ok(Some(spec)) => spec,
                Ok(None) => continue,
                Err(error) => {
                    self.diagnostics.unsupported_pairs += 1;
                    log::warn!("skipping pair: {}", error);
                    continue;
                }
            };

            let mut body_a = a.clone();
            let mut body_b = b.clone();
            self.diagnostics.collisions += 1;

            match self.resolver.resolve(&spec, &mut body_a, &mut body_b, &mut self.diagnostics) {
                Ok(Resolution::Impulse(j)) => {
                    if let Some(slot) = self.bodies.get_mut(pair.body_a) {
                        *slot = body_a;
                    }
                    if let Some(slot) = self.bodies.get_mut(pair.body_b) {
                        *slot = body_b;
                    }
                    self.record_collision(&spec, CollisionOutcome::Impulse(j));
                }
                Ok(Resolution::Separating) => self.record_collision(&spec, CollisionOutcome::Separating),
                Ok(Resolution::Bonded(product)) => {
                    consumed.insert(pair.body_a);
                    consumed.insert(pair.body_b);
                    let merged = self.merge(pair.body_a, pair.body_b, product);
                    self.record_collision(&spec, CollisionOutcome::Bonded(merged));
                }
                Err(error) => {
                    log::debug!("collision of {} and {} not resolved: {}", pair.body_a, pair.body_b, error);
                }
            }
        }
    }

    /// Replaces two bonded bodies with their product
    fn merge(&mut self, a: BodyHandle, b: BodyHandle, product: Body) -> BodyHandle {
        for handle in [a, b] {
            if let Some(body) = self.bodies.remove(handle) {
                self.forces.remove_springs_for(handle);
                self.pending_body_events.push(BodyEvent::removed(handle, body));
            }
        }
        let snapshot = product.clone();
        let merged = self.bodies.add(product);
        self.diagnostics.reactions += 1;
        log::trace!("{} and {} merged into {}", a, b, merged);
        self.pending_body_events.push(BodyEvent::merged(merged, snapshot, vec![a, b]));
        merged
    }

    fn record_collision(&mut self, spec: &CollisionSpec, outcome: CollisionOutcome) {
        log::trace!("collision {} / {}: {:?}", spec.body_a, spec.body_b, outcome);
        self.events.add_collision_event(CollisionEvent {
            body_a: spec.body_a,
            body_b: spec.body_b,
            contact_point: spec.contact_point,
            line_of_action: spec.line_of_action,
            outcome,
        });
    }

    /// Hands buffered body events to the observers, then runs the step callbacks
    fn dispatch(&mut self) {
        let mut commands = std::mem::take(&mut self.commands);
        for event in std::mem::take(&mut self.pending_body_events) {
            self.observers.notify_body_event(&event, &mut commands);
            self.events.add_body_event(event);
        }

        let mut observers = std::mem::take(&mut self.observers);
        observers.notify_step(self, &mut commands);
        self.observers = observers;
        self.commands = commands;
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
