// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setpoint commands and refreshed reads.

use std::sync::Arc;

use crate::error::{CommandError, Error};
use crate::event::EventBus;
use crate::identity::DeviceIdentity;
use crate::network::ThermostatNetwork;
use crate::poller::{Poller, publish_and_apply};
use crate::registry::SharedRegistry;
use crate::state::{DeviceRecord, StateChange};
use crate::types::{TargetTemperature, TemperatureResolution};

/// Dispatches setpoint changes and serves refreshed readings.
#[derive(Debug)]
pub struct CommandGateway<N> {
    network: Arc<N>,
    registry: SharedRegistry,
    events: EventBus,
    poller: Poller<N>,
    resolution: TemperatureResolution,
}

impl<N> Clone for CommandGateway<N> {
    fn clone(&self) -> Self {
        Self {
            network: Arc::clone(&self.network),
            registry: self.registry.clone(),
            events: self.events.clone(),
            poller: self.poller.clone(),
            resolution: self.resolution,
        }
    }
}

impl<N: ThermostatNetwork> CommandGateway<N> {
    /// Creates a gateway.
    ///
    /// Reads go through `poller`, so they share its cycle gate with the
    /// background task.
    #[must_use]
    pub fn new(
        network: Arc<N>,
        registry: SharedRegistry,
        events: EventBus,
        poller: Poller<N>,
        resolution: TemperatureResolution,
    ) -> Self {
        Self {
            network,
            registry,
            events,
            poller,
            resolution,
        }
    }

    /// Returns the setpoint resolution applied to requests.
    #[must_use]
    pub fn resolution(&self) -> TemperatureResolution {
        self.resolution
    }

    /// Sets the target temperature of an installed thermostat.
    ///
    /// The request is clamped into `[5.0, 35.0]` and rounded to the
    /// configured resolution. On success the rounded value is returned and
    /// the cached setpoint is updated right away, without waiting for the
    /// next poll.
    ///
    /// # Errors
    ///
    /// - `Error::Value` if the request is absent, zero or not finite. The
    ///   network is not called.
    /// - `Error::DeviceNotFound` if the identity is not installed. The
    ///   network is not called.
    /// - `Error::Network` if the hub call fails. It is not retried.
    ///
    /// Every error carries the value that was attempted.
    pub async fn set_target_temperature(
        &self,
        id: &DeviceIdentity,
        requested: Option<f64>,
    ) -> Result<f64, CommandError> {
        let target = TargetTemperature::new(requested, self.resolution)
            .map_err(|e| CommandError::new(requested, e))?;
        let value = target.value();

        let station_name = self
            .registry
            .installed_record(id)
            .map(|record| record.station_name().to_string())
            .ok_or_else(|| CommandError::new(Some(value), Error::DeviceNotFound))?;

        tracing::debug!(identity = %id, station = %station_name, %target, "Setting target temperature");

        if let Err(e) = self
            .network
            .set_temperature(value, std::slice::from_ref(&station_name))
            .await
        {
            tracing::warn!(
                identity = %id,
                station = %station_name,
                attempted = value,
                error = %e,
                "Setting target temperature failed"
            );
            return Err(CommandError::new(Some(value), e));
        }

        // The device may have been removed while the command was in flight
        let mut registry = self.registry.lock();
        if let Some(record) = registry.lookup_installed_mut(id) {
            // Poll cycles already in flight read the hub before this write
            record.mark_setpoint_commanded();
            publish_and_apply(
                &self.events,
                record,
                StateChange::TargetTemperature(value),
            );
        }

        Ok(value)
    }

    /// Returns the setpoint after one fresh poll cycle.
    ///
    /// `Ok(None)` means the thermostat has not reported a setpoint yet.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if the identity is not installed. A
    /// failed refresh is logged and the cached value is served instead.
    pub async fn get_target_temperature(&self, id: &DeviceIdentity) -> Result<Option<f64>, Error> {
        Ok(self.refreshed(id).await?.target_temperature())
    }

    /// Returns the measured temperature after one fresh poll cycle.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if the identity is not installed. A
    /// failed refresh is logged and the cached value is served instead.
    pub async fn get_measured_temperature(
        &self,
        id: &DeviceIdentity,
    ) -> Result<Option<f64>, Error> {
        Ok(self.refreshed(id).await?.measured_temperature())
    }

    async fn refreshed(&self, id: &DeviceIdentity) -> Result<DeviceRecord, Error> {
        if let Err(e) = self.poller.refresh().await {
            tracing::warn!(identity = %id, error = %e, "Refresh before read failed, serving cached value");
        }

        self.registry.installed_record(id).ok_or(Error::DeviceNotFound)
    }
}
