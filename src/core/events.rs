use crate::bodies::Body;
use crate::core::{BodyHandle, BranchHandle, ElectronHandle, PhysicsWorld};
use crate::math::Vector2;
use std::collections::VecDeque;

/// How a resolved collision ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionOutcome {
    /// The bodies bounced; carries the impulse magnitude along the line of action
    Impulse(f64),

    /// The bodies bonded into the given product
    Bonded(BodyHandle),

    /// The bodies were already separating, nothing was applied
    Separating,
}

/// A collision between two bodies resolved during a step
#[derive(Debug, Clone)]
pub struct CollisionEvent {
    pub body_a: BodyHandle,

    pub body_b: BodyHandle,

    /// Contact point in world space
    pub contact_point: Vector2,

    /// Vector from the centre of B's touching disk to the centre of A's
    pub line_of_action: Vector2,

    pub outcome: CollisionOutcome,
}

/// Types of body events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEventType {
    /// A body has been added to the world
    Added,

    /// A body has been removed from the world
    Removed,

    /// A body was produced by bonding the bodies listed in `sources`
    Merged,
}

/// An event related to a single body, carrying a snapshot of it
#[derive(Debug, Clone)]
pub struct BodyEvent {
    pub event_type: BodyEventType,

    pub body: BodyHandle,

    /// State of the body when the event was raised
    pub snapshot: Body,

    /// Bodies consumed to create this one (only for `Merged`)
    pub sources: Vec<BodyHandle>,
}

impl BodyEvent {
    pub fn added(body: BodyHandle, snapshot: Body) -> Self {
        Self { event_type: BodyEventType::Added, body, snapshot, sources: Vec::new() }
    }

    pub fn removed(body: BodyHandle, snapshot: Body) -> Self {
        Self { event_type: BodyEventType::Removed, body, snapshot, sources: Vec::new() }
    }

    pub fn merged(body: BodyHandle, snapshot: Body, sources: Vec<BodyHandle>) -> Self {
        Self { event_type: BodyEventType::Merged, body, snapshot, sources }
    }
}

/// A queue of events raised during the last step
#[derive(Debug, Default)]
pub struct EventQueue {
    collision_events: VecDeque<CollisionEvent>,

    body_events: VecDeque<BodyEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_collision_event(&mut self, event: CollisionEvent) {
        self.collision_events.push_back(event);
    }

    pub fn add_body_event(&mut self, event: BodyEvent) {
        self.body_events.push_back(event);
    }

    /// Gets the next collision event from the queue
    pub fn next_collision_event(&mut self) -> Option<CollisionEvent> {
        self.collision_events.pop_front()
    }

    /// Gets the next body event from the queue
    pub fn next_body_event(&mut self) -> Option<BodyEvent> {
        self.body_events.pop_front()
    }

    pub fn collision_events(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.collision_events.iter()
    }

    pub fn body_events(&self) -> impl Iterator<Item = &BodyEvent> {
        self.body_events.iter()
    }

    /// Gets all body events of a specific type
    pub fn body_events_of_type(&self, event_type: BodyEventType) -> Vec<&BodyEvent> {
        self.body_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Gets all collision events involving a specific body
    pub fn collision_events_for_body(&self, body: BodyHandle) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.body_a == body || e.body_b == body)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.collision_events.is_empty() && self.body_events.is_empty()
    }

    pub fn clear(&mut self) {
        self.collision_events.clear();
        self.body_events.clear();
    }
}

/// A structural change requested while the world was borrowed
#[derive(Debug, Clone)]
pub enum Command {
    AddBody(Body),
    RemoveBody(BodyHandle),
    AddElectron { branch: BranchHandle, distance: f64 },
    RemoveElectron(ElectronHandle),
    SetBranchCurrent { branch: BranchHandle, current: f64 },
}

/// Commands queued by observers, applied at the start of the next step
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn add_body(&mut self, body: Body) {
        self.push(Command::AddBody(body));
    }

    pub fn remove_body(&mut self, handle: BodyHandle) {
        self.push(Command::RemoveBody(handle));
    }

    pub fn add_electron(&mut self, branch: BranchHandle, distance: f64) {
        self.push(Command::AddElectron { branch, distance });
    }

    pub fn remove_electron(&mut self, handle: ElectronHandle) {
        self.push(Command::RemoveElectron(handle));
    }

    pub fn set_branch_current(&mut self, branch: BranchHandle, current: f64) {
        self.push(Command::SetBranchCurrent { branch, current });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Removes and returns every queued command in submission order
    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.commands.drain(..)
    }
}

/// Callback invoked once at the end of every step
pub type StepCallback = Box<dyn FnMut(&PhysicsWorld, &mut CommandQueue) + Send + Sync>;

/// Callback invoked for every body added, removed or merged during a step
pub type BodyEventCallback = Box<dyn FnMut(&BodyEvent, &mut CommandQueue) + Send + Sync>;

/// Typed observer lists, notified in registration order
#[derive(Default)]
pub struct Observers {
    step: Vec<StepCallback>,
    body: Vec<BodyEventCallback>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_step(&mut self, callback: StepCallback) {
        self.step.push(callback);
    }

    pub fn on_body_event(&mut self, callback: BodyEventCallback) {
        self.body.push(callback);
    }

    pub fn is_empty(&self) -> bool {
        self.step.is_empty() && self.body.is_empty()
    }

    pub(crate) fn notify_body_event(&mut self, event: &BodyEvent, commands: &mut CommandQueue) {
        for callback in self.body.iter_mut() {
            callback(event, commands);
        }
    }

    pub(crate) fn notify_step(&mut self, world: &PhysicsWorld, commands: &mut CommandQueue) {
        for callback in self.step.iter_mut() {
            callback(world, commands);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("step", &self.step.len())
            .field("body", &self.body.len())
            .finish()
    }
}
