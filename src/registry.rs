// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory store of known thermostats.
//!
//! The [`Registry`] keeps two partitions keyed by [`DeviceIdentity`]:
//!
//! - **installed** - devices the user confirmed; restored from host
//!   persistence at startup and refreshed by the poller
//! - **candidates** - devices found by the latest discovery pass and awaiting
//!   pairing confirmation
//!
//! An identity is never present in both partitions. Insertions are
//! deduplicated and candidate insertion refuses identities already installed.
//!
//! The registry itself is a plain data structure. Components share it through
//! [`SharedRegistry`], whose lock is only ever held for in-memory work and
//! never across network I/O.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::identity::DeviceIdentity;
use crate::state::DeviceRecord;

/// One of the two registry partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// User-confirmed devices.
    Installed,
    /// Discovered devices awaiting confirmation.
    Candidates,
}

/// Known devices, partitioned into installed and candidate sets.
///
/// # Examples
///
/// ```
/// use neostat_lib::registry::{Partition, Registry};
/// use neostat_lib::state::DeviceRecord;
///
/// let mut registry = Registry::new();
/// let record = DeviceRecord::new("Kitchen", "1");
/// let id = record.identity().clone();
///
/// assert!(registry.insert_candidate(record));
/// assert!(registry.promote(&id).is_some());
/// assert!(registry.lookup(&id, Partition::Installed).is_some());
/// assert!(registry.lookup(&id, Partition::Candidates).is_none());
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    installed: HashMap<DeviceIdentity, DeviceRecord>,
    candidates: HashMap<DeviceIdentity, DeviceRecord>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, partition: Partition) -> &HashMap<DeviceIdentity, DeviceRecord> {
        match partition {
            Partition::Installed => &self.installed,
            Partition::Candidates => &self.candidates,
        }
    }

    /// Looks up a device by identity in one partition.
    #[must_use]
    pub fn lookup(&self, id: &DeviceIdentity, partition: Partition) -> Option<&DeviceRecord> {
        self.partition(partition).get(id)
    }

    /// Looks up an installed device for mutation.
    pub fn lookup_installed_mut(&mut self, id: &DeviceIdentity) -> Option<&mut DeviceRecord> {
        self.installed.get_mut(id)
    }

    /// Returns `true` if the identity is installed.
    #[must_use]
    pub fn is_installed(&self, id: &DeviceIdentity) -> bool {
        self.installed.contains_key(id)
    }

    /// Adds a discovered device to the candidates.
    ///
    /// Returns `false` and leaves the registry untouched if the identity is
    /// already a candidate or already installed.
    pub fn insert_candidate(&mut self, record: DeviceRecord) -> bool {
        let id = record.identity();
        if self.installed.contains_key(id) || self.candidates.contains_key(id) {
            return false;
        }
        self.candidates.insert(id.clone(), record);
        true
    }

    /// Adds a device to the installed set.
    ///
    /// Returns `false` and leaves the registry untouched if the identity is
    /// already installed. A candidate with the same identity is dropped.
    pub fn insert_installed(&mut self, record: DeviceRecord) -> bool {
        let id = record.identity();
        if self.installed.contains_key(id) {
            return false;
        }
        self.candidates.remove(id);
        self.installed.insert(id.clone(), record);
        true
    }

    /// Removes an installed device.
    ///
    /// Removing an unknown identity is a no-op and returns `None`.
    pub fn remove_installed(&mut self, id: &DeviceIdentity) -> Option<DeviceRecord> {
        self.installed.remove(id)
    }

    /// Moves a candidate into the installed set.
    ///
    /// Returns `None` if the identity is not a candidate, for example because
    /// a newer discovery pass cleared the candidates in the meantime.
    pub fn promote(&mut self, id: &DeviceIdentity) -> Option<&DeviceRecord> {
        let record = self.candidates.remove(id)?;
        let installed = self.installed.entry(id.clone()).or_insert(record);
        Some(&*installed)
    }

    /// Drops every candidate.
    pub fn clear_candidates(&mut self) {
        self.candidates.clear();
    }

    /// Iterates over installed devices.
    pub fn installed(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.installed.values()
    }

    /// Iterates over candidate devices.
    pub fn candidates(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.candidates.values()
    }

    /// Returns the number of installed devices.
    #[must_use]
    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }
}

/// Shared handle to a [`Registry`].
///
/// Cloning the handle shares the same registry. All mutations go through
/// [`lock`](Self::lock), which serializes discovery, pairing, polling and
/// removal.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    /// Creates a handle to a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the registry.
    ///
    /// The guard must not be held across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock()
    }

    /// Returns a copy of an installed device.
    #[must_use]
    pub fn installed_record(&self, id: &DeviceIdentity) -> Option<DeviceRecord> {
        self.lock().lookup(id, Partition::Installed).cloned()
    }

    /// Returns the number of installed devices.
    #[must_use]
    pub fn installed_count(&self) -> usize {
        self.lock().installed_count()
    }
}
