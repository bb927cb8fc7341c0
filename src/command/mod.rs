// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat commands.
//!
//! The [`CommandGateway`] validates user requests, dispatches them through
//! the [`ThermostatNetwork`](crate::network::ThermostatNetwork) and serves
//! freshly polled readings.
//!
//! # Setpoint pipeline
//!
//! | Step | Rule |
//! |------|------|
//! | Validate | absent, zero and non-finite requests are rejected |
//! | Clamp | into `[5.0, 35.0]` |
//! | Round | to the configured [`TemperatureResolution`](crate::types::TemperatureResolution) |
//! | Resolve | the identity must be installed |
//! | Dispatch | one `set_temperature` call addressed by station name |
//!
//! Failures after validation report the rounded value that was attempted.

mod gateway;

pub use gateway::CommandGateway;
