// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use serde::Serialize;

use crate::identity::DeviceIdentity;
use crate::state::StateChange;

/// Events emitted by the driver.
///
/// [`StateChanged`](Self::StateChanged) is the realtime notification the host
/// forwards to its UI. It is published before the cached value is
/// overwritten, and carries the previous value so observers see the
/// transition rather than only the new state.
///
/// # Examples
///
/// ```
/// use neostat_lib::DeviceIdentity;
/// use neostat_lib::event::DeviceEvent;
/// use neostat_lib::state::StateChange;
///
/// let identity = DeviceIdentity::generate("Kitchen", "1");
/// let event = DeviceEvent::state_changed(
///     identity,
///     StateChange::measured_temperature(19.6),
///     Some(19.0),
/// );
///
/// assert!(event.is_state_change());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// A candidate was confirmed and is now installed.
    DeviceAdded {
        /// The identity of the added device.
        identity: DeviceIdentity,
    },

    /// An installed device was removed.
    DeviceRemoved {
        /// The identity of the removed device.
        identity: DeviceIdentity,
    },

    /// A cached temperature changed.
    StateChanged {
        /// The identity of the device.
        identity: DeviceIdentity,
        /// The change, carrying the capability name and new value.
        change: StateChange,
        /// The value cached before the change; `None` if never observed.
        previous: Option<f64>,
    },
}

impl DeviceEvent {
    /// Returns the device identity associated with this event.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        match self {
            Self::DeviceAdded { identity }
            | Self::DeviceRemoved { identity }
            | Self::StateChanged { identity, .. } => identity,
        }
    }

    /// Returns `true` if this is a device lifecycle event (added/removed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::DeviceAdded { .. } | Self::DeviceRemoved { .. })
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Creates a device added event.
    #[must_use]
    pub fn device_added(identity: DeviceIdentity) -> Self {
        Self::DeviceAdded { identity }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(identity: DeviceIdentity) -> Self {
        Self::DeviceRemoved { identity }
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(
        identity: DeviceIdentity,
        change: StateChange,
        previous: Option<f64>,
    ) -> Self {
        Self::StateChanged {
            identity,
            change,
            previous,
        }
    }
}
