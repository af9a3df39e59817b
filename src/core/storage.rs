use std::collections::BTreeMap;
use std::marker::PhantomData;
use crate::core::Handle;
use crate::error::PhysicsError;
use crate::Result;

/// Generic storage trait for simulation objects
pub trait Storage<T, H> {
    /// Creates a new empty storage
    fn new() -> Self;

    /// Adds an item to the storage and returns its handle
    fn add(&mut self, item: T) -> H;

    /// Gets a reference to an item by its handle
    fn get(&self, handle: H) -> Option<&T>;

    /// Gets a mutable reference to an item by its handle
    fn get_mut(&mut self, handle: H) -> Option<&mut T>;

    /// Removes an item from the storage
    fn remove(&mut self, handle: H) -> Option<T>;

    /// Returns the number of items in the storage
    fn len(&self) -> usize;

    /// Returns whether the storage is empty
    fn is_empty(&self) -> bool;

    /// Clears all items from the storage
    fn clear(&mut self);

    /// Returns all handles in ascending order
    fn handles(&self) -> Vec<H>;

    /// Returns an iterator over all items in handle order
    fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a T)> + 'a where T: 'a;

    /// Returns a mutable iterator over all items in handle order
    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (H, &'a mut T)> + 'a where T: 'a;
}

/// Ordered storage keyed by monotonically increasing handles.
///
/// Iteration follows insertion order, so every pass over the items is
/// reproducible from run to run. Handles are never reused.
#[derive(Debug, Clone)]
pub struct HandleStorage<H, T> {
    items: BTreeMap<u32, T>,
    next_id: u32,
    _handle: PhantomData<H>,
}

impl<H: Handle, T> Storage<T, H> for HandleStorage<H, T> {
    fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1, // Start at 1, so 0 can represent invalid handle
            _handle: PhantomData,
        }
    }

    fn add(&mut self, item: T) -> H {
        let handle = H::from_raw(self.next_id);
        self.next_id += 1;
        self.items.insert(handle.raw(), item);
        handle
    }

    fn get(&self, handle: H) -> Option<&T> {
        self.items.get(&handle.raw())
    }

    fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.items.get_mut(&handle.raw())
    }

    fn remove(&mut self, handle: H) -> Option<T> {
        self.items.remove(&handle.raw())
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn handles(&self) -> Vec<H> {
        self.items.keys().map(|id| H::from_raw(*id)).collect()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a T)> + 'a where T: 'a {
        self.items.iter().map(|(id, item)| (H::from_raw(*id), item))
    }

    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (H, &'a mut T)> + 'a where T: 'a {
        self.items.iter_mut().map(|(id, item)| (H::from_raw(*id), item))
    }
}

impl<H: Handle, T> Default for HandleStorage<H, T> {
    fn default() -> Self {
        <Self as Storage<T, H>>::new()
    }
}

impl<H: Handle, T> HandleStorage<H, T> {
    /// Returns whether an item with this handle exists
    pub fn contains(&self, handle: H) -> bool {
        self.items.contains_key(&handle.raw())
    }

    /// Gets an item by its handle, returning an error if not found
    pub fn get_checked(&self, handle: H) -> Result<&T> {
        self.items
            .get(&handle.raw())
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("{:?} not found", handle)))
    }

    /// Gets a mutable reference to an item by its handle, returning an error if not found
    pub fn get_checked_mut(&mut self, handle: H) -> Result<&mut T> {
        self.items
            .get_mut(&handle.raw())
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("{:?} not found", handle)))
    }

    /// Iterates over the stored values only
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }
}
