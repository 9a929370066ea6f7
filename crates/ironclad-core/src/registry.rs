//! Recyclable-handle object pool.
//!
//! Ids come from a monotonic counter; removed ids go into an ordered
//! free set and the smallest free id is always preferred over a fresh
//! one, giving deterministic reuse order. Single-threaded by design:
//! registries are owned and mutated only by the engine within a step.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreError, Result};

/// Opaque handle issued by a [`Registry`].
pub type RegistryId = u32;

#[derive(Debug, Default)]
pub struct Registry<T> {
    objects: BTreeMap<RegistryId, T>,
    next_id: RegistryId,
    free_ids: BTreeSet<RegistryId>,
    kind: &'static str,
}

impl<T> Registry<T> {
    /// Create an empty registry. `kind` names the entity class in
    /// `NotFound` errors.
    pub fn new(kind: &'static str) -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: 0,
            free_ids: BTreeSet::new(),
            kind,
        }
    }

    fn allocate_id(&mut self) -> RegistryId {
        if let Some(&id) = self.free_ids.iter().next() {
            self.free_ids.remove(&id);
            id
        } else {
            let id = self.next_id;
            self.next_id += 1;
            id
        }
    }

    /// Store `value` and return its id.
    pub fn insert(&mut self, value: T) -> RegistryId {
        let id = self.allocate_id();
        self.objects.insert(id, value);
        id
    }

    /// Construct the value from its own id and store it. Required for
    /// entities that embed their handle for reverse lookup from
    /// physics-side metadata.
    pub fn insert_with(&mut self, build: impl FnOnce(RegistryId) -> T) -> RegistryId {
        let id = self.allocate_id();
        self.objects.insert(id, build(id));
        id
    }

    /// Shared access to a live entry.
    pub fn get(&self, id: RegistryId) -> Result<&T> {
        self.objects.get(&id).ok_or(CoreError::NotFound {
            kind: self.kind,
            id,
        })
    }

    /// Mutable access to a live entry.
    pub fn get_mut(&mut self, id: RegistryId) -> Result<&mut T> {
        self.objects.get_mut(&id).ok_or(CoreError::NotFound {
            kind: self.kind,
            id,
        })
    }

    /// Remove a live entry, returning it and recycling its id.
    pub fn remove(&mut self, id: RegistryId) -> Result<T> {
        let value = self.objects.remove(&id).ok_or(CoreError::NotFound {
            kind: self.kind,
            id,
        })?;
        self.free_ids.insert(id);
        Ok(value)
    }

    /// Iterate live entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (RegistryId, &T)> {
        self.objects.iter().map(|(&id, v)| (id, v))
    }

    /// Iterate live entries mutably in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RegistryId, &mut T)> {
        self.objects.iter_mut().map(|(&id, v)| (id, v))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
