// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for hub `INFO` payloads.

use serde::Deserialize;

use crate::error::ParseError;
use crate::network::StationStatus;

/// Parsed hub `INFO` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HubInfo {
    /// Stations known to the hub.
    #[serde(default)]
    devices: Option<Vec<StationInfo>>,
}

impl HubInfo {
    /// Returns the stations in this payload.
    #[must_use]
    pub fn stations(&self) -> &[StationInfo] {
        self.devices.as_deref().unwrap_or_default()
    }

    /// Converts the payload into station readings.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if the payload has no `devices` list.
    pub fn into_stations(self) -> Result<Vec<StationStatus>, ParseError> {
        let devices = self
            .devices
            .ok_or_else(|| ParseError::MissingField("devices".to_string()))?;

        Ok(devices.into_iter().map(StationInfo::into_status).collect())
    }
}

/// One station entry of an `INFO` response.
///
/// Hubs report temperatures as strings (`"19.60"`) on most firmware and as
/// numbers on some. Both are accepted; anything else reads as "not reported".
#[derive(Debug, Clone, Deserialize)]
pub struct StationInfo {
    /// Station name.
    #[serde(rename = "device")]
    pub name: String,

    /// Device type code.
    #[serde(rename = "DEVICE_TYPE", default)]
    device_type: Option<Scalar>,

    /// Current setpoint.
    #[serde(rename = "CURRENT_SET_TEMPERATURE", default)]
    set_temperature: Option<Scalar>,

    /// Current measured temperature.
    #[serde(rename = "CURRENT_TEMPERATURE", default)]
    temperature: Option<Scalar>,
}

impl StationInfo {
    /// Returns the device type as text; empty if not reported.
    #[must_use]
    pub fn device_type(&self) -> String {
        self.device_type
            .as_ref()
            .map(Scalar::to_text)
            .unwrap_or_default()
    }

    /// Returns the reported setpoint.
    #[must_use]
    pub fn set_temperature(&self) -> Option<f64> {
        self.set_temperature.as_ref().and_then(Scalar::to_number)
    }

    /// Returns the reported measured temperature.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature.as_ref().and_then(Scalar::to_number)
    }

    /// Converts this entry into a station reading.
    #[must_use]
    pub fn into_status(self) -> StationStatus {
        let mut status = StationStatus::new(self.name.clone(), self.device_type());
        status.target_temperature = self.set_temperature();
        status.measured_temperature = self.temperature();
        status
    }
}

/// A JSON value the hub may send as either a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn to_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }

    fn to_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}
