// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for thermostat control.
//!
//! # Types
//!
//! - [`TargetTemperature`] - Validated setpoint, clamped to 5-35 °C
//! - [`TemperatureResolution`] - Setpoint granularity of a thermostat class

mod temperature;

pub use temperature::{TargetTemperature, TemperatureResolution, round_to_tenth};
