// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat network capability.
//!
//! The library does not speak the hub wire protocol itself. Instead it drives
//! any implementation of [`ThermostatNetwork`], which exposes the three
//! operations the synchronization engine needs: enumerate stations, fetch the
//! status of every station in one batch, and change a setpoint.
//!
//! Implementations are expected to serialize their own on-wire requests; the
//! library may call them concurrently from the poll task and from command
//! handlers.
//!
//! # Implementing a network
//!
//! ```
//! use neostat_lib::error::NetworkError;
//! use neostat_lib::network::{DiscoveryReport, HubAddress, StationStatus, ThermostatNetwork};
//!
//! struct SingleStation;
//!
//! impl ThermostatNetwork for SingleStation {
//!     async fn discover(&self) -> Result<DiscoveryReport, NetworkError> {
//!         Ok(DiscoveryReport::new(
//!             HubAddress::new("192.168.1.20", 4242),
//!             vec![StationStatus::new("Kitchen", "1")],
//!         ))
//!     }
//!
//!     async fn fetch_status(&self) -> Result<Vec<StationStatus>, NetworkError> {
//!         Ok(vec![StationStatus::new("Kitchen", "1").with_temperatures(21.0, 19.5)])
//!     }
//!
//!     async fn set_temperature(&self, _value: f64, _stations: &[String]) -> Result<(), NetworkError> {
//!         Ok(())
//!     }
//! }
//! ```

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::identity::DeviceIdentity;

/// Network address of a thermostat hub.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HubAddress {
    /// Hub host name or IP address.
    pub host: String,
    /// Hub TCP port.
    pub port: u16,
}

impl HubAddress {
    /// Creates a hub address.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for HubAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Live reading of one station, as reported by the hub.
///
/// A temperature that is `None` was not reported in this reading. It is
/// distinct from a reading of `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStatus {
    /// Station name; used to address commands.
    pub station_name: String,
    /// Device type reported by the hub.
    pub device_type: String,
    /// Current setpoint.
    pub target_temperature: Option<f64>,
    /// Current measured room temperature.
    pub measured_temperature: Option<f64>,
}

impl StationStatus {
    /// Creates a status with no temperatures reported.
    #[must_use]
    pub fn new(station_name: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            station_name: station_name.into(),
            device_type: device_type.into(),
            target_temperature: None,
            measured_temperature: None,
        }
    }

    /// Sets both reported temperatures.
    #[must_use]
    pub fn with_temperatures(mut self, target: f64, measured: f64) -> Self {
        self.target_temperature = Some(target);
        self.measured_temperature = Some(measured);
        self
    }

    /// Returns the identity of the station that produced this reading.
    #[must_use]
    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity::generate(&self.station_name, &self.device_type)
    }
}

/// Result of a completed discovery: the hub that answered and its stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// The hub that answered.
    pub hub: HubAddress,
    /// Stations reachable through the hub.
    pub stations: Vec<StationStatus>,
}

impl DiscoveryReport {
    /// Creates a discovery report.
    #[must_use]
    pub fn new(hub: HubAddress, stations: Vec<StationStatus>) -> Self {
        Self { hub, stations }
    }
}

/// Capability to reach thermostats on the network.
///
/// All futures must be `Send`, since the library runs them from a background
/// poll task.
pub trait ThermostatNetwork: Send + Sync + 'static {
    /// Enumerates the reachable stations.
    ///
    /// The library bounds this call with its own discovery timeout, so an
    /// implementation may wait for a hub announcement indefinitely.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if enumeration fails.
    fn discover(&self) -> impl Future<Output = Result<DiscoveryReport, NetworkError>> + Send;

    /// Fetches the live status of every station in one batched request.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the hub cannot be reached.
    fn fetch_status(&self) -> impl Future<Output = Result<Vec<StationStatus>, NetworkError>> + Send;

    /// Sets the setpoint of the named stations.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the hub cannot be reached or rejects the
    /// request.
    fn set_temperature(
        &self,
        value: f64,
        stations: &[String],
    ) -> impl Future<Output = Result<(), NetworkError>> + Send;
}
