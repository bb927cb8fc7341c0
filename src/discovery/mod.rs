// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat discovery.
//!
//! The [`DiscoveryService`] asks the thermostat network which stations are
//! reachable and sorts each one into the registry:
//!
//! - stations whose identity is already installed are reported as such and
//!   left alone
//! - every other station becomes a pairing candidate, with no temperatures
//!   until it is installed and polled
//!
//! A discovery pass is a new pairing attempt, so it starts by dropping the
//! candidates of any earlier pass. Duplicate announcements of the same
//! station within one pass produce a single candidate.
//!
//! # Timeout
//!
//! Hubs that never answer must not hang the caller. Discovery is bounded by
//! the configured timeout (15 seconds by default); when it elapses the pass
//! yields an empty outcome rather than an error.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;
use crate::identity::DeviceIdentity;
use crate::network::{DiscoveryReport, HubAddress, ThermostatNetwork};
use crate::registry::SharedRegistry;
use crate::state::DeviceRecord;

/// Result of one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    /// The hub that answered, if any.
    pub hub: Option<HubAddress>,
    /// Identities added to the candidates, in announcement order.
    pub candidates: Vec<DeviceIdentity>,
    /// Identities seen on the network that are already installed.
    pub already_installed: Vec<DeviceIdentity>,
    /// Whether the pass ended because no hub answered in time.
    pub timed_out: bool,
}

impl DiscoveryOutcome {
    fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }

    /// Returns `true` if no station at all was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty() && self.already_installed.is_empty()
    }
}

/// Enumerates reachable stations and fills the candidate partition.
#[derive(Debug)]
pub struct DiscoveryService<N> {
    network: Arc<N>,
    registry: SharedRegistry,
    timeout: Duration,
}

impl<N> Clone for DiscoveryService<N> {
    fn clone(&self) -> Self {
        Self {
            network: Arc::clone(&self.network),
            registry: self.registry.clone(),
            timeout: self.timeout,
        }
    }
}

impl<N: ThermostatNetwork> DiscoveryService<N> {
    /// Creates a discovery service.
    #[must_use]
    pub fn new(network: Arc<N>, registry: SharedRegistry, timeout: Duration) -> Self {
        Self {
            network,
            registry,
            timeout,
        }
    }

    /// Returns the discovery timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs one discovery pass.
    ///
    /// # Errors
    ///
    /// Returns `Error::Network` if the network reports a failure before the
    /// timeout. A timeout itself is not an error.
    pub async fn discover(&self) -> Result<DiscoveryOutcome, Error> {
        tracing::info!(
            timeout_secs = self.timeout.as_secs(),
            "Starting thermostat discovery"
        );

        self.registry.lock().clear_candidates();

        let report = match tokio::time::timeout(self.timeout, self.network.discover()).await {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Thermostat discovery failed");
                return Err(e.into());
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "No hub answered discovery in time"
                );
                return Ok(DiscoveryOutcome::timed_out());
            }
        };

        let outcome = self.classify(report);

        tracing::info!(
            hub = ?outcome.hub.as_ref().map(ToString::to_string),
            candidates = outcome.candidates.len(),
            already_installed = outcome.already_installed.len(),
            "Thermostat discovery completed"
        );

        Ok(outcome)
    }

    /// Sorts announced stations into installed and new candidates.
    fn classify(&self, report: DiscoveryReport) -> DiscoveryOutcome {
        let mut outcome = DiscoveryOutcome {
            hub: Some(report.hub),
            ..DiscoveryOutcome::default()
        };

        let mut registry = self.registry.lock();
        for station in &report.stations {
            let identity = station.identity();

            if registry.is_installed(&identity) {
                if !outcome.already_installed.contains(&identity) {
                    outcome.already_installed.push(identity);
                }
                continue;
            }

            if registry.insert_candidate(DeviceRecord::from_station(station)) {
                tracing::debug!(%identity, station = %station.station_name, "New candidate");
                outcome.candidates.push(identity);
            } else {
                tracing::debug!(%identity, "Duplicate announcement, skipping");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::StationStatus;
    use crate::registry::Partition;
    use crate::test_support::{DiscoveryMode, FakeNetwork};

    fn service(stations: Vec<StationStatus>) -> (DiscoveryService<FakeNetwork>, Arc<FakeNetwork>) {
        let network = Arc::new(FakeNetwork::new(stations));
        let service = DiscoveryService::new(
            Arc::clone(&network),
            SharedRegistry::new(),
            Duration::from_secs(15),
        );
        (service, network)
    }

    fn station(name: &str) -> StationStatus {
        StationStatus::new(name, "1").with_temperatures(21.0, 19.5)
    }

    #[tokio::test]
    async fn new_stations_become_candidates_without_readings() {
        let (service, _) = service(vec![station("Kitchen"), station("Hall")]);

        let outcome = service.discover().await.unwrap();
        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.hub, Some(HubAddress::new("192.168.1.20", 4242)));

        let registry = service.registry.lock();
        let record = registry
            .lookup(&DeviceIdentity::generate("Kitchen", "1"), Partition::Candidates)
            .unwrap();
        assert_eq!(record.target_temperature(), None);
        assert_eq!(record.measured_temperature(), None);
    }

    #[tokio::test]
    async fn duplicate_announcements_yield_one_candidate() {
        let (service, _) = service(vec![station("Kitchen"), station("Kitchen")]);

        let outcome = service.discover().await.unwrap();
        assert_eq!(outcome.candidates, vec![DeviceIdentity::generate("Kitchen", "1")]);
        assert_eq!(service.registry.lock().candidate_count(), 1);
    }

    #[tokio::test]
    async fn installed_stations_are_skipped() {
        let (service, _) = service(vec![station("Kitchen"), station("Hall")]);
        service
            .registry
            .lock()
            .insert_installed(DeviceRecord::new("Kitchen", "1"));

        let outcome = service.discover().await.unwrap();
        assert_eq!(outcome.candidates, vec![DeviceIdentity::generate("Hall", "1")]);
        assert_eq!(
            outcome.already_installed,
            vec![DeviceIdentity::generate("Kitchen", "1")]
        );

        let registry = service.registry.lock();
        assert!(
            registry
                .lookup(&DeviceIdentity::generate("Kitchen", "1"), Partition::Candidates)
                .is_none()
        );
    }

    #[tokio::test]
    async fn rerun_clears_stale_candidates() {
        let (service, network) = service(vec![station("Kitchen")]);
        service.discover().await.unwrap();

        network.set_stations(vec![station("Hall")]);
        service.discover().await.unwrap();

        let registry = service.registry.lock();
        assert_eq!(registry.candidate_count(), 1);
        assert!(
            registry
                .lookup(&DeviceIdentity::generate("Hall", "1"), Partition::Candidates)
                .is_some()
        );
    }

    #[tokio::test]
    async fn zero_stations_is_empty_not_error() {
        let (service, _) = service(Vec::new());

        let outcome = service.discover().await.unwrap();
        assert!(outcome.is_empty());
        assert!(!outcome.timed_out);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_hub_times_out_with_empty_outcome() {
        let (service, network) = service(vec![station("Kitchen")]);
        network.set_discovery_mode(DiscoveryMode::Hang);

        let started = tokio::time::Instant::now();
        let outcome = service.discover().await.unwrap();

        assert!(outcome.timed_out);
        assert!(outcome.is_empty());
        assert!(started.elapsed() >= Duration::from_secs(15));
        assert_eq!(service.registry.lock().candidate_count(), 0);
    }

    #[tokio::test]
    async fn network_failure_is_reported() {
        let (service, network) = service(vec![station("Kitchen")]);
        network.set_discovery_mode(DiscoveryMode::Fail);

        let err = service.discover().await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
