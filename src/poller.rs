// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic state polling.
//!
//! Thermostats do not push their state, so the [`Poller`] fetches the status
//! of every station in one batched request, compares each reading with the
//! cached record, and publishes a [`DeviceEvent::StateChanged`] for every
//! field that moved before overwriting the cached value.
//!
//! # Cycle rules
//!
//! - Cycles never overlap; the background task and on-demand
//!   [`refresh`](Poller::refresh) calls share one gate.
//! - Readings for stations that are not installed are skipped; the poller
//!   never creates records.
//! - Setpoints are compared exactly, measured temperatures at one decimal.
//! - A setpoint read before a command landed is stale and is not applied;
//!   the next cycle picks up whatever the hub reports then.
//! - The station name is refreshed on every reading, since commands are
//!   addressed by name.
//! - A cycle that cannot reach the network fails on its own; the background
//!   task logs it and tries again at the next tick.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Error;
use crate::event::{DeviceEvent, EventBus};
use crate::identity::DeviceIdentity;
use crate::network::{StationStatus, ThermostatNetwork};
use crate::registry::SharedRegistry;
use crate::state::{DeviceRecord, StateChange};

/// Shortest period the background task accepts.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Summary of one poll cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollReport {
    /// Number of readings returned by the network.
    pub samples: usize,
    /// Changes applied, in the order they were published.
    pub changes: Vec<(DeviceIdentity, StateChange)>,
    /// Readings that matched no installed device.
    pub skipped: usize,
}

/// Publishes a change and then applies it to the record.
///
/// Observers receive the previous value alongside the new one, so the event
/// has to go out before the cache is overwritten.
pub(crate) fn publish_and_apply(
    events: &EventBus,
    record: &mut DeviceRecord,
    change: StateChange,
) -> bool {
    let previous = record.current(&change);
    if previous == Some(change.value()) {
        return false;
    }

    events.publish(DeviceEvent::state_changed(
        record.identity().clone(),
        change,
        previous,
    ));
    record.apply(&change)
}

/// Refreshes installed devices from the thermostat network.
#[derive(Debug)]
pub struct Poller<N> {
    network: Arc<N>,
    registry: SharedRegistry,
    events: EventBus,
    interval: Duration,
    cycle_gate: Arc<AsyncMutex<()>>,
}

impl<N> Clone for Poller<N> {
    fn clone(&self) -> Self {
        Self {
            network: Arc::clone(&self.network),
            registry: self.registry.clone(),
            events: self.events.clone(),
            interval: self.interval,
            cycle_gate: Arc::clone(&self.cycle_gate),
        }
    }
}

impl<N: ThermostatNetwork> Poller<N> {
    /// Creates a poller.
    #[must_use]
    pub fn new(
        network: Arc<N>,
        registry: SharedRegistry,
        events: EventBus,
        interval: Duration,
    ) -> Self {
        Self {
            network,
            registry,
            events,
            interval,
            cycle_gate: Arc::new(AsyncMutex::new(())),
        }
    }

    /// Returns the period between two background cycles.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one poll cycle now.
    ///
    /// If a cycle is already in flight, this waits for it to finish and then
    /// runs its own, so the cache is never older than the call.
    ///
    /// # Errors
    ///
    /// Returns `Error::Network` if the batched fetch fails. The cache is left
    /// untouched in that case.
    pub async fn refresh(&self) -> Result<PollReport, Error> {
        let _cycle = self.cycle_gate.lock().await;

        if self.registry.installed_count() == 0 {
            tracing::trace!("No installed thermostats, skipping poll");
            return Ok(PollReport::default());
        }

        let generations = self.setpoint_generations();
        let samples = self.network.fetch_status().await?;
        let report = self.apply_samples(&samples, &generations);

        tracing::debug!(
            samples = report.samples,
            changes = report.changes.len(),
            skipped = report.skipped,
            "Poll cycle completed"
        );

        Ok(report)
    }

    /// Snapshots the setpoint generation of every installed record.
    fn setpoint_generations(&self) -> HashMap<DeviceIdentity, u64> {
        self.registry
            .lock()
            .installed()
            .map(|record| (record.identity().clone(), record.setpoint_generation()))
            .collect()
    }

    /// Diffs readings against the installed records and applies them.
    ///
    /// `generations` is the snapshot taken before the fetch. Records whose
    /// setpoint was commanded since then keep their cached setpoint.
    fn apply_samples(
        &self,
        samples: &[StationStatus],
        generations: &HashMap<DeviceIdentity, u64>,
    ) -> PollReport {
        let mut report = PollReport {
            samples: samples.len(),
            ..PollReport::default()
        };

        let mut registry = self.registry.lock();
        for sample in samples {
            let identity = sample.identity();
            let Some(record) = registry.lookup_installed_mut(&identity) else {
                report.skipped += 1;
                continue;
            };

            let commanded =
                generations.get(&identity).copied().unwrap_or(0) != record.setpoint_generation();

            for change in record.changes_from(sample) {
                if commanded && change.is_target() {
                    tracing::debug!(
                        %identity,
                        stale = change.value(),
                        "Setpoint commanded during poll, ignoring stale reading"
                    );
                    continue;
                }

                if publish_and_apply(&self.events, record, change) {
                    tracing::debug!(
                        %identity,
                        capability = change.capability(),
                        value = change.value(),
                        "Thermostat state changed"
                    );
                    report.changes.push((identity.clone(), change));
                }
            }

            record.touch(&sample.station_name);
        }

        report
    }

    /// Starts the background poll task.
    ///
    /// The first cycle runs immediately, then one per interval. Ticks are
    /// skipped while nothing is installed. The task runs until the returned
    /// handle is shut down or dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn spawn(&self) -> PollerHandle {
        let poller = self.clone();
        let period = self.interval.max(MIN_POLL_INTERVAL);

        let task = tokio::spawn(async move {
            tracing::debug!(period_secs = period.as_secs(), "Starting poll task");

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if poller.registry.installed_count() == 0 {
                    continue;
                }

                if let Err(e) = poller.refresh().await {
                    tracing::warn!(error = %e, "Poll cycle failed, retrying next tick");
                }
            }
        });

        PollerHandle { task }
    }
}

/// Handle to the background poll task.
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Returns `true` while the task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the background task.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeNetwork;

    struct Fixture {
        poller: Poller<FakeNetwork>,
        network: Arc<FakeNetwork>,
        registry: SharedRegistry,
        events: EventBus,
    }

    fn fixture(stations: Vec<StationStatus>) -> Fixture {
        let network = Arc::new(FakeNetwork::new(stations));
        let registry = SharedRegistry::new();
        let events = EventBus::new();
        let poller = Poller::new(
            Arc::clone(&network),
            registry.clone(),
            events.clone(),
            Duration::from_secs(15),
        );
        Fixture {
            poller,
            network,
            registry,
            events,
        }
    }

    fn kitchen(target: f64, measured: f64) -> StationStatus {
        StationStatus::new("Kitchen", "1").with_temperatures(target, measured)
    }

    fn install_kitchen(registry: &SharedRegistry, target: f64, measured: f64) -> DeviceIdentity {
        let mut record = DeviceRecord::new("Kitchen", "1");
        record.apply(&StateChange::TargetTemperature(target));
        record.apply(&StateChange::MeasuredTemperature(measured));
        let id = record.identity().clone();
        registry.lock().insert_installed(record);
        id
    }

    #[tokio::test]
    async fn measured_change_emits_one_event() {
        let f = fixture(vec![kitchen(21.0, 19.6)]);
        let id = install_kitchen(&f.registry, 21.0, 19.0);
        let mut events = f.events.subscribe();

        let report = f.poller.refresh().await.unwrap();

        assert_eq!(
            report.changes,
            vec![(id.clone(), StateChange::MeasuredTemperature(19.6))]
        );
        assert_eq!(
            events.try_recv().unwrap(),
            DeviceEvent::state_changed(
                id.clone(),
                StateChange::MeasuredTemperature(19.6),
                Some(19.0)
            )
        );
        assert!(events.try_recv().is_err());
        assert_eq!(
            f.registry.installed_record(&id).unwrap().measured_temperature(),
            Some(19.6)
        );
    }

    #[tokio::test]
    async fn unchanged_reading_emits_nothing() {
        let f = fixture(vec![kitchen(21.0, 19.0)]);
        install_kitchen(&f.registry, 21.0, 19.0);
        let mut events = f.events.subscribe();

        let report = f.poller.refresh().await.unwrap();

        assert!(report.changes.is_empty());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn jitter_below_precision_emits_nothing() {
        let f = fixture(vec![kitchen(21.0, 19.040_000_01)]);
        install_kitchen(&f.registry, 21.0, 19.0);

        let report = f.poller.refresh().await.unwrap();
        assert!(report.changes.is_empty());
    }

    #[tokio::test]
    async fn uninstalled_readings_are_skipped() {
        let f = fixture(vec![
            kitchen(21.0, 19.0),
            StationStatus::new("Hall", "1").with_temperatures(18.0, 17.5),
        ]);
        install_kitchen(&f.registry, 21.0, 19.0);

        let report = f.poller.refresh().await.unwrap();

        assert_eq!(report.samples, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(f.registry.installed_count(), 1);
    }

    #[tokio::test]
    async fn empty_registry_skips_fetch() {
        let f = fixture(vec![kitchen(21.0, 19.0)]);

        let report = f.poller.refresh().await.unwrap();

        assert_eq!(report, PollReport::default());
        assert_eq!(f.network.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn network_failure_leaves_cache_untouched() {
        let f = fixture(vec![kitchen(25.0, 24.0)]);
        let id = install_kitchen(&f.registry, 21.0, 19.0);
        f.network.fail_fetch(true);

        let err = f.poller.refresh().await.unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        let record = f.registry.installed_record(&id).unwrap();
        assert_eq!(record.target_temperature(), Some(21.0));
        assert_eq!(record.measured_temperature(), Some(19.0));
    }

    #[tokio::test(start_paused = true)]
    async fn background_task_survives_failed_cycles() {
        let f = fixture(vec![kitchen(21.0, 19.0)]);
        install_kitchen(&f.registry, 21.0, 19.0);
        f.network.fail_fetch(true);

        let handle = f.poller.spawn();

        // First tick fires immediately, then one every 15 seconds
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(f.network.fetch_calls(), 3);
        assert!(handle.is_running());

        f.network.fail_fetch(false);
        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(f.network.fetch_calls(), 4);

        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn background_task_idles_without_devices() {
        let f = fixture(vec![kitchen(21.0, 19.0)]);
        let _handle = f.poller.spawn();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(f.network.fetch_calls(), 0);
    }

    #[test]
    fn publish_and_apply_reports_previous_value() {
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let mut record = DeviceRecord::new("Kitchen", "1");

        assert!(publish_and_apply(
            &events,
            &mut record,
            StateChange::TargetTemperature(21.0)
        ));
        assert!(!publish_and_apply(
            &events,
            &mut record,
            StateChange::TargetTemperature(21.0)
        ));

        let event = rx.try_recv().unwrap();
        assert!(matches!(
            event,
            DeviceEvent::StateChanged { previous: None, .. }
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn reading_taken_before_a_command_keeps_the_commanded_setpoint() {
        let f = fixture(Vec::new());
        let id = install_kitchen(&f.registry, 21.0, 19.0);
        let generations = f.poller.setpoint_generations();

        {
            let mut registry = f.registry.lock();
            let record = registry.lookup_installed_mut(&id).unwrap();
            record.mark_setpoint_commanded();
            record.apply(&StateChange::TargetTemperature(23.0));
        }

        let report = f.poller.apply_samples(&[kitchen(21.0, 19.5)], &generations);

        assert_eq!(
            report.changes,
            vec![(id.clone(), StateChange::MeasuredTemperature(19.5))]
        );
        assert_eq!(f.registry.installed_record(&id).unwrap().target_temperature(), Some(23.0));

        // Later cycles take the hub's setpoint again
        let generations = f.poller.setpoint_generations();
        let report = f.poller.apply_samples(&[kitchen(21.0, 19.5)], &generations);
        assert_eq!(report.changes, vec![(id, StateChange::TargetTemperature(21.0))]);
    }
}
