// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pairing workflow.
//!
//! After a discovery pass has filled the candidate partition, a
//! [`PairingSession`] lets the host show the candidates to the user and
//! install the one they pick.

use serde::Serialize;

use crate::error::Error;
use crate::event::{DeviceEvent, EventBus};
use crate::identity::DeviceIdentity;
use crate::registry::SharedRegistry;

/// A pairing candidate as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSummary {
    /// Identity to pass back to [`PairingSession::confirm`].
    pub id: DeviceIdentity,
    /// Human-readable name (the station name).
    pub display_name: String,
}

/// Lists candidates and promotes a chosen one into the installed set.
#[derive(Debug, Clone)]
pub struct PairingSession {
    registry: SharedRegistry,
    events: EventBus,
}

impl PairingSession {
    /// Creates a pairing session over a registry.
    #[must_use]
    pub fn new(registry: SharedRegistry, events: EventBus) -> Self {
        Self { registry, events }
    }

    /// Returns the current candidates, sorted by display name.
    ///
    /// This is a read-only projection and may be called any number of times.
    #[must_use]
    pub fn list_candidates(&self) -> Vec<CandidateSummary> {
        let mut candidates: Vec<CandidateSummary> = self
            .registry
            .lock()
            .candidates()
            .map(|record| CandidateSummary {
                id: record.identity().clone(),
                display_name: record.station_name().to_string(),
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        candidates
    }

    /// Installs the candidate with the given identity.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if the identity is not a candidate,
    /// which happens when a newer discovery pass cleared the list. The
    /// installed set is left unchanged in that case.
    pub fn confirm(&self, id: &DeviceIdentity) -> Result<DeviceIdentity, Error> {
        let station = {
            let mut registry = self.registry.lock();
            registry
                .promote(id)
                .map(|record| record.station_name().to_string())
        };

        let Some(station) = station else {
            tracing::warn!(identity = %id, "Pairing confirmation for unknown candidate");
            return Err(Error::DeviceNotFound);
        };

        tracing::info!(identity = %id, %station, "Thermostat paired");
        self.events.publish(DeviceEvent::device_added(id.clone()));

        Ok(id.clone())
    }
}
