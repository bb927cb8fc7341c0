// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Driver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::event::DEFAULT_CHANNEL_CAPACITY;
use crate::types::TemperatureResolution;

/// Default period between two poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Default bound on how long discovery waits for a hub to answer.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for a [`ThermostatDriver`](super::ThermostatDriver).
///
/// Every field has a default, so a host only needs to set what differs for
/// its thermostat class. The configuration can also be loaded from JSON;
/// missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use neostat_lib::driver::DriverConfig;
/// use neostat_lib::types::TemperatureResolution;
///
/// let config = DriverConfig::new()
///     .with_poll_interval(Duration::from_secs(30))
///     .with_resolution(TemperatureResolution::Half);
///
/// assert_eq!(config.poll_interval(), Duration::from_secs(30));
/// assert_eq!(config.discovery_timeout(), Duration::from_secs(15));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Period between two poll cycles.
    poll_interval: Duration,
    /// How long discovery waits for a hub announcement.
    discovery_timeout: Duration,
    /// Setpoint resolution of the thermostat class.
    resolution: TemperatureResolution,
    /// Capacity of the realtime event channel.
    event_capacity: usize,
}

impl DriverConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the period between two poll cycles.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the discovery timeout.
    #[must_use]
    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    /// Sets the setpoint resolution.
    #[must_use]
    pub fn with_resolution(mut self, resolution: TemperatureResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the realtime event channel capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Returns the period between two poll cycles.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the discovery timeout.
    #[must_use]
    pub fn discovery_timeout(&self) -> Duration {
        self.discovery_timeout
    }

    /// Returns the setpoint resolution.
    #[must_use]
    pub fn resolution(&self) -> TemperatureResolution {
        self.resolution
    }

    /// Returns the realtime event channel capacity.
    #[must_use]
    pub fn event_capacity(&self) -> usize {
        self.event_capacity.max(1)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            resolution: TemperatureResolution::default(),
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
