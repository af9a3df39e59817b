use crate::core::{BranchHandle, HandleStorage, JunctionHandle, Storage};
use crate::error::PhysicsError;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A node joining branch ends
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Junction;

/// A wire segment between two junctions.
///
/// Positive current flows from the start junction to the end junction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Branch {
    start: JunctionHandle,
    end: JunctionHandle,
    length: f64,
    current: f64,
}

impl Branch {
    pub fn get_start(&self) -> JunctionHandle {
        self.start
    }

    pub fn get_end(&self) -> JunctionHandle {
        self.end
    }

    pub fn get_length(&self) -> f64 {
        self.length
    }

    pub fn get_current(&self) -> f64 {
        self.current
    }

    /// Whether `x` is a valid distance along this branch
    pub fn contains_scalar_location(&self, x: f64) -> bool {
        x >= 0.0 && x <= self.length
    }
}

/// Topology of the wire network plus the current in every branch
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    junctions: HandleStorage<JunctionHandle, Junction>,
    branches: HandleStorage<BranchHandle, Branch>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_junction(&mut self) -> JunctionHandle {
        self.junctions.add(Junction)
    }

    /// Adds a branch of the given length between two existing junctions
    pub fn add_branch(&mut self, start: JunctionHandle, end: JunctionHandle, length: f64) -> Result<BranchHandle> {
        if !self.junctions.contains(start) || !self.junctions.contains(end) {
            return Err(PhysicsError::ResourceNotFound(format!(
                "branch endpoints {} and {} must both exist",
                start, end
            )));
        }
        if length <= 0.0 || !length.is_finite() {
            return Err(PhysicsError::InvalidGeometry(format!("branch length must be positive, got {}", length)));
        }

        Ok(self.branches.add(Branch { start, end, length, current: 0.0 }))
    }

    pub fn branch(&self, handle: BranchHandle) -> Option<&Branch> {
        self.branches.get(handle)
    }

    pub fn branch_checked(&self, handle: BranchHandle) -> Result<&Branch> {
        self.branches.get_checked(handle)
    }

    pub fn branches(&self) -> impl Iterator<Item = (BranchHandle, &Branch)> {
        self.branches.iter()
    }

    pub fn num_branches(&self) -> usize {
        self.branches.len()
    }

    pub fn num_junctions(&self) -> usize {
        self.junctions.len()
    }

    /// Sets the current of a branch, as computed by an external circuit solver
    pub fn set_current(&mut self, handle: BranchHandle, current: f64) -> Result<()> {
        if !current.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!("current of {} must be finite", handle)));
        }
        self.branches.get_checked_mut(handle)?.current = current;
        Ok(())
    }

    /// Every branch with an end at the junction, in handle order
    pub fn adjacent_branches(&self, junction: JunctionHandle) -> Vec<BranchHandle> {
        self.branches
            .iter()
            .filter(|(_, branch)| branch.start == junction || branch.end == junction)
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Largest current magnitude over all branches
    pub fn max_current(&self) -> f64 {
        self.branches.values().fold(0.0, |max, branch| max.max(branch.current.abs()))
    }
}

/// A validated point on the wire network
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct CircuitLocation {
    branch: BranchHandle,
    x: f64,
}

impl CircuitLocation {
    /// Fails with `InvalidGeometry` when `x` is not within the branch
    pub fn new(circuit: &Circuit, branch: BranchHandle, x: f64) -> Result<Self> {
        let wire = circuit.branch_checked(branch)?;
        if !wire.contains_scalar_location(x) {
            return Err(PhysicsError::InvalidGeometry(format!(
                "no location {} on {} of length {}",
                x,
                branch,
                wire.get_length()
            )));
        }
        Ok(Self { branch, x })
    }

    pub fn get_branch(&self) -> BranchHandle {
        self.branch
    }

    pub fn get_x(&self) -> f64 {
        self.x
    }
}
