// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for thermostat changes.
//!
//! This module provides a pub/sub event system for notifying the host about
//! device lifecycle changes and realtime state changes. The [`EventBus`] uses
//! tokio's broadcast channel so that several observers can follow the same
//! stream.
//!
//! # Examples
//!
//! ```
//! use neostat_lib::DeviceIdentity;
//! use neostat_lib::event::{DeviceEvent, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let identity = DeviceIdentity::generate("Kitchen", "1");
//! bus.publish(DeviceEvent::device_added(identity));
//! ```

mod device_event;
mod event_bus;

pub use device_event::DeviceEvent;
pub use event_bus::EventBus;
pub(crate) use event_bus::DEFAULT_CHANNEL_CAPACITY;
