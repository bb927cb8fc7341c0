// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel carrying [`DeviceEvent`]s to the host.

use tokio::sync::broadcast;

use super::DeviceEvent;

/// Default channel capacity for the event bus.
pub(crate) const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fan-out of device events to every subscribed observer.
///
/// Cloning the bus shares the channel, so the poller, the pairing session
/// and the driver all publish into the same stream.
///
/// A subscriber that falls more than the capacity behind loses the oldest
/// events and receives `RecvError::Lagged`; the next poll cycle still
/// reports the current readings.
///
/// # Examples
///
/// ```
/// use neostat_lib::DeviceIdentity;
/// use neostat_lib::event::{DeviceEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// let hall = DeviceIdentity::generate("Hall", "1");
/// assert_eq!(bus.publish(DeviceEvent::device_removed(hall)), 1);
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a bus holding up to 256 undelivered events per subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus with the given capacity; zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Returns how many receivers are currently subscribed.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event and returns how many subscribers received it.
    ///
    /// Publishing with nobody listening is not an error; the event is
    /// dropped and `0` is returned.
    pub fn publish(&self, event: DeviceEvent) -> usize {
        match self.sender.send(event) {
            Ok(delivered) => delivered,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(identity = %event.identity(), "No event subscribers");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
