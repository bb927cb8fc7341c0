// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are the discrete updates applied to a
//! [`DeviceRecord`](super::DeviceRecord), either from a poll cycle or from a
//! successful command. Each change names the host capability it belongs to,
//! which is what realtime observers key on.
//!
//! # Examples
//!
//! ```
//! use neostat_lib::state::StateChange;
//!
//! let change = StateChange::measured_temperature(19.6);
//! assert_eq!(change.capability(), "measure_temperature");
//! assert_eq!(change.value(), 19.6);
//! ```

use serde::{Deserialize, Serialize};

/// Capability name of the thermostat setpoint.
pub const TARGET_TEMPERATURE: &str = "target_temperature";

/// Capability name of the measured room temperature.
pub const MEASURE_TEMPERATURE: &str = "measure_temperature";

/// Represents a change in thermostat state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "capability", content = "value", rename_all = "snake_case")]
pub enum StateChange {
    /// The setpoint changed.
    TargetTemperature(f64),

    /// The measured temperature changed (already rounded to one decimal).
    #[serde(rename = "measure_temperature")]
    MeasuredTemperature(f64),
}

impl StateChange {
    /// Creates a setpoint change.
    #[must_use]
    pub fn target_temperature(value: f64) -> Self {
        Self::TargetTemperature(value)
    }

    /// Creates a measured temperature change.
    #[must_use]
    pub fn measured_temperature(value: f64) -> Self {
        Self::MeasuredTemperature(value)
    }

    /// Returns the host capability name this change belongs to.
    #[must_use]
    pub fn capability(&self) -> &'static str {
        match self {
            Self::TargetTemperature(_) => TARGET_TEMPERATURE,
            Self::MeasuredTemperature(_) => MEASURE_TEMPERATURE,
        }
    }

    /// Returns the new value.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Self::TargetTemperature(v) | Self::MeasuredTemperature(v) => *v,
        }
    }

    /// Returns `true` if this is a setpoint change.
    #[must_use]
    pub fn is_target(&self) -> bool {
        matches!(self, Self::TargetTemperature(_))
    }
}
