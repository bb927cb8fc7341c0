// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat state types.
//!
//! [`DeviceRecord`] holds what the library knows about one thermostat, while
//! [`StateChange`] represents an individual update that can be applied to it.
//!
//! # Examples
//!
//! ```
//! use neostat_lib::state::{DeviceRecord, StateChange};
//!
//! let mut record = DeviceRecord::new("Kitchen", "1");
//! assert_eq!(record.target_temperature(), None);
//!
//! assert!(record.apply(&StateChange::target_temperature(21.0)));
//! assert_eq!(record.target_temperature(), Some(21.0));
//! ```

mod device_record;
mod state_change;

pub use device_record::DeviceRecord;
pub use state_change::{MEASURE_TEMPERATURE, StateChange, TARGET_TEMPERATURE};
