// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `NeoStat` Lib - A Rust library to drive networked Neo thermostats.
//!
//! This library keeps a registry of thermostats reachable through a hub,
//! synchronizes their state by periodic polling, and exposes the operations a
//! home-automation host needs to pair, control and forget devices.
//!
//! # Supported Features
//!
//! - **Discovery**: Find the stations announced by a hub, with a bounded wait
//! - **Pairing**: List discovered candidates and confirm them
//! - **Polling**: Batched status refresh with change events
//! - **Control**: Clamped, resolution-aware setpoint commands
//! - **Persistence**: Stable device identities that survive restarts
//!
//! # Architecture
//!
//! The library does not implement the hub wire protocol. It drives any type
//! implementing [`ThermostatNetwork`](network::ThermostatNetwork), and
//! provides serde models in [`telemetry`] for decoding hub status payloads.
//!
//! | Component | Role |
//! |-----------|------|
//! | [`registry`] | Installed devices and pairing candidates |
//! | [`discovery`] | Populates candidates from a hub announcement |
//! | [`pairing`] | Lists and confirms candidates |
//! | [`poller`] | Refreshes installed devices and emits changes |
//! | [`command`] | Validates and dispatches setpoints |
//! | [`driver`] | Host-facing entry point wiring everything together |
//!
//! # Quick Start
//!
//! ```no_run
//! use neostat_lib::driver::{DriverConfig, PersistedDevice, ThermostatDriver};
//! use neostat_lib::network::ThermostatNetwork;
//! use neostat_lib::DeviceIdentity;
//!
//! async fn run(network: impl ThermostatNetwork, saved: Vec<PersistedDevice>) -> neostat_lib::Result<()> {
//!     let driver = ThermostatDriver::new(network, DriverConfig::default());
//!     driver.init(saved);
//!
//!     let kitchen = DeviceIdentity::generate("Kitchen", "1");
//!
//!     // Reads force one fresh poll cycle
//!     if let Some(measured) = driver.get_measured_temperature(&kitchen).await? {
//!         println!("Kitchen is at {measured:.1}°C");
//!     }
//!
//!     // Requests are clamped to 5-35 and rounded to the configured resolution
//!     match driver.set_target_temperature(&kitchen, Some(21.5)).await {
//!         Ok(applied) => println!("Setpoint is now {applied}"),
//!         Err(e) => eprintln!("Could not apply {:?}: {e}", e.attempted()),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Events
//!
//! ```no_run
//! # use neostat_lib::driver::ThermostatDriver;
//! # use neostat_lib::network::ThermostatNetwork;
//! use neostat_lib::event::DeviceEvent;
//!
//! # async fn watch(driver: &ThermostatDriver<impl ThermostatNetwork>) {
//! let mut events = driver.subscribe();
//! while let Ok(event) = events.recv().await {
//!     if let DeviceEvent::StateChanged { identity, change, .. } = event {
//!         println!("{identity}: {} = {}", change.capability(), change.value());
//!     }
//! }
//! # }
//! ```

pub mod command;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod event;
mod identity;
pub mod network;
pub mod pairing;
pub mod poller;
pub mod registry;
pub mod state;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test_support;

pub use command::CommandGateway;
pub use discovery::{DiscoveryOutcome, DiscoveryService};
pub use driver::{DriverConfig, PersistedDevice, ThermostatDriver};
pub use error::{CommandError, Error, NetworkError, ParseError, Result, ValueError};
pub use event::{DeviceEvent, EventBus};
pub use identity::DeviceIdentity;
pub use network::{DiscoveryReport, HubAddress, StationStatus, ThermostatNetwork};
pub use pairing::{CandidateSummary, PairingSession};
pub use poller::{PollReport, Poller, PollerHandle};
pub use registry::{Partition, Registry, SharedRegistry};
pub use state::{DeviceRecord, StateChange};
pub use types::{TargetTemperature, TemperatureResolution};
