use crate::circuit::{Circuit, CircuitLocation};
use crate::core::{BranchHandle, ElectronHandle, HandleStorage, Storage};
use crate::error::PhysicsError;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A charge carrier riding along a wire branch
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Electron {
    branch: BranchHandle,
    distance: f64,
}

impl Electron {
    pub fn get_branch(&self) -> BranchHandle {
        self.branch
    }

    /// Distance from the branch's start junction
    pub fn get_distance(&self) -> f64 {
        self.distance
    }

    pub fn location(&self) -> (BranchHandle, f64) {
        (self.branch, self.distance)
    }
}

/// Every electron on the wire network, addressed by handle
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    electrons: HandleStorage<ElectronHandle, Electron>,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an electron at a validated location
    pub fn add(&mut self, location: CircuitLocation) -> ElectronHandle {
        let handle = self.electrons.add(Electron {
            branch: location.get_branch(),
            distance: location.get_x(),
        });
        log::trace!("added {} on {} at {}", handle, location.get_branch(), location.get_x());
        handle
    }

    /// Validates the location then adds an electron there
    pub fn add_at(&mut self, circuit: &Circuit, branch: BranchHandle, distance: f64) -> Result<ElectronHandle> {
        let location = CircuitLocation::new(circuit, branch, distance)?;
        Ok(self.add(location))
    }

    pub fn remove(&mut self, handle: ElectronHandle) -> Option<Electron> {
        self.electrons.remove(handle)
    }

    /// Removes every electron riding on the branch, returning how many were dropped
    pub fn remove_branch(&mut self, branch: BranchHandle) -> usize {
        let doomed: Vec<ElectronHandle> = self.in_branch(branch);
        for handle in &doomed {
            self.electrons.remove(*handle);
        }
        doomed.len()
    }

    pub fn get(&self, handle: ElectronHandle) -> Option<&Electron> {
        self.electrons.get(handle)
    }

    /// Moves an electron to a validated location
    pub fn set_location(&mut self, handle: ElectronHandle, location: CircuitLocation) -> Result<()> {
        let electron = self.electrons.get_checked_mut(handle)?;
        electron.branch = location.get_branch();
        electron.distance = location.get_x();
        Ok(())
    }

    /// Moves an electron along its current branch without revalidating
    pub(crate) fn set_distance(&mut self, handle: ElectronHandle, distance: f64) {
        if let Some(electron) = self.electrons.get_mut(handle) {
            electron.distance = distance;
        }
    }

    pub fn len(&self) -> usize {
        self.electrons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.electrons.is_empty()
    }

    pub fn clear(&mut self) {
        self.electrons.clear();
    }

    pub fn handles(&self) -> Vec<ElectronHandle> {
        self.electrons.handles()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElectronHandle, &Electron)> {
        self.electrons.iter()
    }

    /// Handles of the electrons riding on the branch
    pub fn in_branch(&self, branch: BranchHandle) -> Vec<ElectronHandle> {
        self.electrons
            .iter()
            .filter(|(_, electron)| electron.branch == branch)
            .map(|(handle, _)| handle)
            .collect()
    }

    pub fn count_in_branch(&self, branch: BranchHandle) -> usize {
        self.electrons.values().filter(|electron| electron.branch == branch).count()
    }

    /// Electrons per unit length of the branch
    pub fn density(&self, circuit: &Circuit, branch: BranchHandle) -> Result<f64> {
        let length = circuit.branch_checked(branch)?.get_length();
        Ok(self.count_in_branch(branch) as f64 / length)
    }

    /// The nearest electron further along the same branch
    pub fn upper_neighbor(&self, handle: ElectronHandle) -> Option<ElectronHandle> {
        let me = self.electrons.get(handle)?;
        self.electrons
            .iter()
            .filter(|(other, electron)| {
                *other != handle && electron.branch == me.branch && electron.distance > me.distance
            })
            .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))
            .map(|(other, _)| other)
    }

    /// The nearest electron closer to the start of the same branch
    pub fn lower_neighbor(&self, handle: ElectronHandle) -> Option<ElectronHandle> {
        let me = self.electrons.get(handle)?;
        self.electrons
            .iter()
            .filter(|(other, electron)| {
                *other != handle && electron.branch == me.branch && electron.distance < me.distance
            })
            .max_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))
            .map(|(other, _)| other)
    }

    /// Distance from `x` to the nearest electron on the branch, infinite on an empty branch
    pub fn distance_to_closest_electron(&self, branch: BranchHandle, x: f64) -> f64 {
        self.electrons
            .values()
            .filter(|electron| electron.branch == branch)
            .map(|electron| (electron.distance - x).abs())
            .fold(f64::INFINITY, f64::min)
    }

    /// Lays electrons evenly along the branch at roughly `spacing` apart,
    /// half a gap in from each end
    pub fn fill_branch(&mut self, circuit: &Circuit, branch: BranchHandle, spacing: f64) -> Result<Vec<ElectronHandle>> {
        if spacing <= 0.0 || !spacing.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!("electron spacing must be positive, got {}", spacing)));
        }
        let length = circuit.branch_checked(branch)?.get_length();
        let count = (length / spacing).round().max(1.0) as usize;
        let gap = length / count as f64;

        let mut added = Vec::with_capacity(count);
        for i in 0..count {
            let location = CircuitLocation::new(circuit, branch, (i as f64 + 0.5) * gap)?;
            added.push(self.add(location));
        }
        Ok(added)
    }
}
