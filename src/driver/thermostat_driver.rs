// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing thermostat driver.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::command::CommandGateway;
use crate::discovery::DiscoveryService;
use crate::error::{CommandError, Error};
use crate::event::{DeviceEvent, EventBus};
use crate::identity::DeviceIdentity;
use crate::network::ThermostatNetwork;
use crate::pairing::{CandidateSummary, PairingSession};
use crate::poller::{Poller, PollerHandle};
use crate::registry::SharedRegistry;

use super::{DriverConfig, PersistedDevice};

/// Driver for a fleet of networked thermostats.
///
/// The driver owns the device registry and wires discovery, pairing,
/// polling and commands around one [`ThermostatNetwork`]. The host calls
/// [`init`](Self::init) once with the devices it persisted, then forwards
/// pairing, command and removal requests. Realtime changes are delivered
/// through [`subscribe`](Self::subscribe).
///
/// # Examples
///
/// ```no_run
/// # use neostat_lib::network::ThermostatNetwork;
/// use neostat_lib::driver::{DriverConfig, ThermostatDriver};
///
/// # async fn example(network: impl ThermostatNetwork) -> Result<(), Box<dyn std::error::Error>> {
/// let driver = ThermostatDriver::new(network, DriverConfig::default());
/// driver.init(Vec::new());
///
/// let mut events = driver.subscribe();
/// tokio::spawn(async move {
///     while let Ok(event) = events.recv().await {
///         println!("Event: {event:?}");
///     }
/// });
///
/// // Pairing flow
/// for candidate in driver.list_devices().await? {
///     driver.add_device(&candidate.id)?;
/// }
///
/// // Persist for the next start
/// let persisted = serde_json::to_string(&driver.installed_devices())?;
/// # let _ = persisted;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ThermostatDriver<N> {
    network: Arc<N>,
    registry: SharedRegistry,
    events: EventBus,
    config: DriverConfig,
    discovery: DiscoveryService<N>,
    pairing: PairingSession,
    poller: Poller<N>,
    commands: CommandGateway<N>,
    poll_task: Mutex<Option<PollerHandle>>,
}

impl<N: ThermostatNetwork> ThermostatDriver<N> {
    /// Creates a driver around a network implementation.
    ///
    /// Nothing runs until [`init`](Self::init) is called.
    #[must_use]
    pub fn new(network: N, config: DriverConfig) -> Self {
        let network = Arc::new(network);
        let registry = SharedRegistry::new();
        let events = EventBus::with_capacity(config.event_capacity());

        let discovery = DiscoveryService::new(
            Arc::clone(&network),
            registry.clone(),
            config.discovery_timeout(),
        );
        let pairing = PairingSession::new(registry.clone(), events.clone());
        let poller = Poller::new(
            Arc::clone(&network),
            registry.clone(),
            events.clone(),
            config.poll_interval(),
        );
        let commands = CommandGateway::new(
            Arc::clone(&network),
            registry.clone(),
            events.clone(),
            poller.clone(),
            config.resolution(),
        );

        Self {
            network,
            registry,
            events,
            config,
            discovery,
            pairing,
            poller,
            commands,
            poll_task: Mutex::new(None),
        }
    }

    /// Returns the network implementation.
    #[must_use]
    pub fn network(&self) -> &N {
        &self.network
    }

    /// Returns the driver configuration.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Returns the discovery service.
    #[must_use]
    pub fn discovery(&self) -> &DiscoveryService<N> {
        &self.discovery
    }

    /// Returns the pairing session.
    #[must_use]
    pub fn pairing(&self) -> &PairingSession {
        &self.pairing
    }

    /// Returns the poller.
    #[must_use]
    pub fn poller(&self) -> &Poller<N> {
        &self.poller
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Restores persisted devices and starts the background poller.
    ///
    /// Restored devices start with no readings; the first poll fills them
    /// in. Duplicate entries are ignored. Calling `init` again restores the
    /// new entries but never starts a second poller.
    ///
    /// Returns the number of devices restored by this call.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn init(&self, persisted: Vec<PersistedDevice>) -> usize {
        let mut restored = 0;
        {
            let mut registry = self.registry.lock();
            for entry in persisted {
                if registry.insert_installed(entry.to_record()) {
                    restored += 1;
                } else {
                    tracing::debug!(identity = %entry.id, "Ignoring duplicate persisted device");
                }
            }
        }

        let mut poll_task = self.poll_task.lock();
        if poll_task.is_none() {
            *poll_task = Some(self.poller.spawn());
        }

        tracing::info!(
            restored,
            installed = self.registry.installed_count(),
            "Thermostat driver initialized"
        );

        restored
    }

    /// Stops the background poller.
    ///
    /// The registry is kept; a later [`init`](Self::init) starts polling
    /// again.
    pub fn shutdown(&self) {
        if let Some(handle) = self.poll_task.lock().take() {
            handle.shutdown();
            tracing::debug!("Thermostat driver stopped");
        }
    }

    /// Returns `true` while the background poller is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.poll_task
            .lock()
            .as_ref()
            .is_some_and(PollerHandle::is_running)
    }

    // =========================================================================
    // Pairing
    // =========================================================================

    /// Runs discovery and lists the candidates found.
    ///
    /// An empty list is returned when no hub answers in time.
    ///
    /// # Errors
    ///
    /// Returns `Error::Network` if the network reports a discovery failure.
    pub async fn list_devices(&self) -> Result<Vec<CandidateSummary>, Error> {
        self.discovery.discover().await?;
        Ok(self.pairing.list_candidates())
    }

    /// Confirms a candidate and installs it.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if the identity is not a current
    /// candidate.
    pub fn add_device(&self, id: &DeviceIdentity) -> Result<DeviceIdentity, Error> {
        self.pairing.confirm(id)
    }

    /// Removes an installed device.
    ///
    /// Removing an unknown device is a no-op. Returns `true` if a device was
    /// removed.
    pub fn deleted(&self, id: &DeviceIdentity) -> bool {
        let removed = self.registry.lock().remove_installed(id);

        match removed {
            Some(record) => {
                tracing::info!(identity = %id, station = %record.station_name(), "Thermostat removed");
                self.events.publish(DeviceEvent::device_removed(id.clone()));
                true
            }
            None => false,
        }
    }

    /// Returns the installed devices in the form the host persists.
    ///
    /// Entries are sorted by station name.
    #[must_use]
    pub fn installed_devices(&self) -> Vec<PersistedDevice> {
        let mut devices: Vec<PersistedDevice> = self
            .registry
            .lock()
            .installed()
            .map(PersistedDevice::from)
            .collect();

        devices.sort_by(|a, b| {
            a.station_name
                .cmp(&b.station_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        devices
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Returns the setpoint of an installed thermostat after a fresh poll.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if the identity is not installed.
    pub async fn get_target_temperature(&self, id: &DeviceIdentity) -> Result<Option<f64>, Error> {
        self.commands.get_target_temperature(id).await
    }

    /// Returns the measured temperature of an installed thermostat after a
    /// fresh poll.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if the identity is not installed.
    pub async fn get_measured_temperature(
        &self,
        id: &DeviceIdentity,
    ) -> Result<Option<f64>, Error> {
        self.commands.get_measured_temperature(id).await
    }

    /// Sets the setpoint of an installed thermostat.
    ///
    /// Returns the value actually applied after clamping and rounding.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` carrying the attempted value if the request
    /// is invalid, the identity is unknown, or the hub call fails.
    pub async fn set_target_temperature(
        &self,
        id: &DeviceIdentity,
        requested: Option<f64>,
    ) -> Result<f64, CommandError> {
        self.commands.set_target_temperature(id, requested).await
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to device events.
    ///
    /// [`DeviceEvent::StateChanged`] is the realtime channel the host
    /// forwards to its UI.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }

    /// Returns the number of active event subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }
}
