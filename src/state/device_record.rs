// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached thermostat state.

use chrono::{DateTime, Utc};

use crate::identity::DeviceIdentity;
use crate::network::StationStatus;
use crate::types::round_to_tenth;

use super::StateChange;

/// Everything the library knows about one thermostat.
///
/// Temperatures start out as `None` ("not yet observed") for freshly
/// discovered or restored devices, so that nothing is displayed until the
/// first poll reports real readings.
///
/// # Examples
///
/// ```
/// use neostat_lib::network::StationStatus;
/// use neostat_lib::state::{DeviceRecord, StateChange};
///
/// let mut record = DeviceRecord::new("Kitchen", "1");
/// record.apply(&StateChange::measured_temperature(19.0));
///
/// let sample = StationStatus::new("Kitchen", "1").with_temperatures(21.0, 19.62);
/// let changes = record.changes_from(&sample);
/// assert_eq!(
///     changes,
///     vec![
///         StateChange::target_temperature(21.0),
///         StateChange::measured_temperature(19.6),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    identity: DeviceIdentity,
    station_name: String,
    device_type: String,
    target_temperature: Option<f64>,
    measured_temperature: Option<f64>,
    last_updated: Option<DateTime<Utc>>,
    setpoint_generation: u64,
}

impl DeviceRecord {
    /// Creates a record with no observed temperatures.
    #[must_use]
    pub fn new(station_name: impl Into<String>, device_type: impl Into<String>) -> Self {
        let station_name = station_name.into();
        let device_type = device_type.into();
        let identity = DeviceIdentity::generate(&station_name, &device_type);

        Self::with_identity(identity, station_name, device_type)
    }

    /// Creates a record for an identity restored from persistence.
    #[must_use]
    pub fn with_identity(
        identity: DeviceIdentity,
        station_name: impl Into<String>,
        device_type: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            station_name: station_name.into(),
            device_type: device_type.into(),
            target_temperature: None,
            measured_temperature: None,
            last_updated: None,
            setpoint_generation: 0,
        }
    }

    /// Creates a record from a station reading, ignoring its temperatures.
    #[must_use]
    pub fn from_station(status: &StationStatus) -> Self {
        Self::new(status.station_name.clone(), status.device_type.clone())
    }

    /// Returns the device identity.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Returns the station name commands are addressed to.
    #[must_use]
    pub fn station_name(&self) -> &str {
        &self.station_name
    }

    /// Returns the device type reported by the hub.
    #[must_use]
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Returns the cached setpoint, if observed.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.target_temperature
    }

    /// Returns the cached measured temperature, if observed.
    #[must_use]
    pub fn measured_temperature(&self) -> Option<f64> {
        self.measured_temperature
    }

    /// Returns when the record was last refreshed from the hub.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Returns how many times a command has written the setpoint.
    ///
    /// Poll cycles compare it before and after their fetch to detect
    /// readings taken before a command landed.
    #[must_use]
    pub fn setpoint_generation(&self) -> u64 {
        self.setpoint_generation
    }

    /// Records that a command just wrote the setpoint.
    pub fn mark_setpoint_commanded(&mut self) {
        self.setpoint_generation = self.setpoint_generation.wrapping_add(1);
    }

    /// Returns the value cached for the capability a change belongs to.
    #[must_use]
    pub fn current(&self, change: &StateChange) -> Option<f64> {
        match change {
            StateChange::TargetTemperature(_) => self.target_temperature,
            StateChange::MeasuredTemperature(_) => self.measured_temperature,
        }
    }

    /// Computes the changes a reading would cause, without applying them.
    ///
    /// Setpoints are compared exactly. Measured temperatures are compared,
    /// and reported, rounded to one decimal. Unreported fields never change.
    #[must_use]
    pub fn changes_from(&self, sample: &StationStatus) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if let Some(target) = sample.target_temperature
            && self.target_temperature != Some(target)
        {
            changes.push(StateChange::TargetTemperature(target));
        }

        if let Some(measured) = sample.measured_temperature {
            let measured = round_to_tenth(measured);
            if self.measured_temperature.map(round_to_tenth) != Some(measured) {
                changes.push(StateChange::MeasuredTemperature(measured));
            }
        }

        changes
    }

    /// Applies a state change.
    ///
    /// Returns `true` if the cached value actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        let slot = match change {
            StateChange::TargetTemperature(_) => &mut self.target_temperature,
            StateChange::MeasuredTemperature(_) => &mut self.measured_temperature,
        };

        let value = change.value();
        if *slot == Some(value) {
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Records the station name from the latest reading and stamps the
    /// refresh time.
    pub fn touch(&mut self, station_name: &str) {
        if self.station_name != station_name {
            tracing::debug!(
                identity = %self.identity,
                old = %self.station_name,
                new = %station_name,
                "Station renamed"
            );
            station_name.clone_into(&mut self.station_name);
        }
        self.last_updated = Some(Utc::now());
    }
}
