// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature values for thermostat control.
//!
//! This module provides the validated target temperature used by commands,
//! the per-device-class rounding resolution, and the fixed-precision rounding
//! used when comparing measured temperatures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Rounds a temperature to one decimal place.
///
/// Measured temperatures are compared at this precision so that floating
/// point jitter in hub readings does not raise change events.
///
/// # Examples
///
/// ```
/// use neostat_lib::types::round_to_tenth;
///
/// assert_eq!(round_to_tenth(19.64), 19.6);
/// assert_eq!(round_to_tenth(19.65001), 19.7);
/// ```
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Setpoint resolution supported by a thermostat class.
///
/// Different thermostat models accept setpoints at different granularity,
/// so the resolution is configured per driver rather than fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureResolution {
    /// Nearest 0.1 degree.
    #[default]
    Tenth,
    /// Nearest 0.5 degree.
    Half,
    /// Nearest whole degree.
    Whole,
}

impl TemperatureResolution {
    /// Returns the number of steps per degree.
    #[must_use]
    pub const fn steps_per_degree(self) -> f64 {
        match self {
            Self::Tenth => 10.0,
            Self::Half => 2.0,
            Self::Whole => 1.0,
        }
    }

    /// Returns the size of one step in degrees.
    #[must_use]
    pub fn step(self) -> f64 {
        1.0 / self.steps_per_degree()
    }

    /// Rounds a value to the nearest supported step.
    ///
    /// # Examples
    ///
    /// ```
    /// use neostat_lib::types::TemperatureResolution;
    ///
    /// assert_eq!(TemperatureResolution::Half.round(22.3), 22.5);
    /// assert_eq!(TemperatureResolution::Whole.round(22.3), 22.0);
    /// assert_eq!(TemperatureResolution::Tenth.round(22.34), 22.3);
    /// ```
    #[must_use]
    pub fn round(self, value: f64) -> f64 {
        let steps = self.steps_per_degree();
        (value * steps).round() / steps
    }
}

/// A validated thermostat setpoint in degrees Celsius.
///
/// A target temperature is always within [`MIN`](Self::MIN) and
/// [`MAX`](Self::MAX) and aligned to the resolution it was built with.
///
/// # Examples
///
/// ```
/// use neostat_lib::types::{TargetTemperature, TemperatureResolution};
///
/// let t = TargetTemperature::new(Some(3.0), TemperatureResolution::Tenth).unwrap();
/// assert_eq!(t.value(), 5.0);
///
/// let t = TargetTemperature::new(Some(22.3), TemperatureResolution::Half).unwrap();
/// assert_eq!(t.value(), 22.5);
///
/// // Absent and zero requests are rejected
/// assert!(TargetTemperature::new(None, TemperatureResolution::Tenth).is_err());
/// assert!(TargetTemperature::new(Some(0.0), TemperatureResolution::Tenth).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TargetTemperature(f64);

impl TargetTemperature {
    /// Lowest setpoint a thermostat accepts.
    pub const MIN: f64 = 5.0;

    /// Highest setpoint a thermostat accepts.
    pub const MAX: f64 = 35.0;

    /// Validates, clamps and rounds a requested setpoint.
    ///
    /// Clamping happens before rounding, so out-of-range requests land on
    /// exactly [`MIN`](Self::MIN) or [`MAX`](Self::MAX).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidTemperature` if the request is absent,
    /// zero, or not finite. The request is echoed back unchanged.
    pub fn new(
        requested: Option<f64>,
        resolution: TemperatureResolution,
    ) -> Result<Self, ValueError> {
        let value = match requested {
            Some(v) if v != 0.0 && v.is_finite() => v,
            other => return Err(ValueError::InvalidTemperature(other)),
        };

        Ok(Self(resolution.round(Self::clamp(value))))
    }

    /// Clamps a value into the accepted setpoint range.
    #[must_use]
    pub fn clamp(value: f64) -> f64 {
        value.clamp(Self::MIN, Self::MAX)
    }

    /// Returns the setpoint in degrees.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for TargetTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

impl From<TargetTemperature> for f64 {
    fn from(t: TargetTemperature) -> Self {
        t.0
    }
}
