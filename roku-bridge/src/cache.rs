//! Accessory cache keyed by accessory id.
//!
//! Holds both accessories replayed by the host at startup and those created
//! during discovery. Pipelines for the same serial number serialize on a
//! per-serial lock so one device reached at two addresses ends up as one
//! accessory.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::accessory::Accessory;
use crate::identity::AccessoryId;

/// Concurrent map of known accessories.
#[derive(Debug, Default)]
pub struct AccessoryCache {
    accessories: DashMap<AccessoryId, Arc<Accessory>>,
    in_flight: DashMap<AccessoryId, Arc<Mutex<()>>>,
}

impl AccessoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the id for `serial` and look it up.
    pub fn resolve(&self, serial: &str) -> (AccessoryId, Option<Arc<Accessory>>) {
        let id = AccessoryId::from_serial(serial);
        (id, self.get(id))
    }

    pub fn get(&self, id: AccessoryId) -> Option<Arc<Accessory>> {
        self.accessories.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Insert `accessory` under `id`.
    ///
    /// The first instance stored under an id wins; returns `false` and leaves
    /// the cache untouched if the id is already taken.
    pub fn store(&self, id: AccessoryId, accessory: Arc<Accessory>) -> bool {
        match self.accessories.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(accessory);
                true
            }
        }
    }

    /// Store an accessory the host restored from its own persistence
    pub fn configure(&self, accessory: Arc<Accessory>) -> bool {
        accessory.mark_registered();
        let id = accessory.id();
        let stored = self.store(id, accessory);
        if !stored {
            tracing::warn!("Ignoring duplicate cached accessory {}", id);
        }
        stored
    }

    /// Wait for exclusive use of `serial`'s resolve-create-store sequence.
    ///
    /// The guard must be held across the whole sequence, awaits included.
    pub async fn lock_serial(&self, serial: &str) -> OwnedMutexGuard<()> {
        let id = AccessoryId::from_serial(serial);
        let lock = Arc::clone(
            self.in_flight
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        lock.lock_owned().await
    }

    pub fn remove(&self, id: AccessoryId) -> Option<Arc<Accessory>> {
        self.in_flight.remove(&id);
        self.accessories.remove(&id).map(|(_, accessory)| accessory)
    }

    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }

    /// Snapshot of all accessories, ordered by display name
    pub fn accessories(&self) -> Vec<Arc<Accessory>> {
        let mut all: Vec<_> = self
            .accessories
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        all.sort_by(|a, b| a.display_name().cmp(b.display_name()));
        all
    }
}
