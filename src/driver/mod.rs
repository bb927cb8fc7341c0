// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat driver.
//!
//! [`ThermostatDriver`] is the entry point a host integrates with. It holds
//! the device registry and the background poller, and exposes the pairing,
//! command, removal and persistence operations.
//!
//! # Lifecycle
//!
//! 1. Build the driver with a [`ThermostatNetwork`](crate::network::ThermostatNetwork)
//!    implementation and a [`DriverConfig`].
//! 2. Call [`init`](ThermostatDriver::init) with the [`PersistedDevice`]
//!    entries saved by the previous run.
//! 3. Pair new devices with [`list_devices`](ThermostatDriver::list_devices)
//!    and [`add_device`](ThermostatDriver::add_device).
//! 4. Save [`installed_devices`](ThermostatDriver::installed_devices) when
//!    the installed set changes.

mod config;
mod persisted;
mod thermostat_driver;

pub use config::{DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_POLL_INTERVAL, DriverConfig};
pub use persisted::PersistedDevice;
pub use thermostat_driver::ThermostatDriver;
