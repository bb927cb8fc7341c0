// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory thermostat network used by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::NetworkError;
use crate::network::{DiscoveryReport, HubAddress, StationStatus, ThermostatNetwork};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DiscoveryMode {
    Answer,
    Hang,
    Fail,
}

#[derive(Debug)]
pub(crate) struct FakeNetwork {
    stations: Mutex<Vec<StationStatus>>,
    discovery_mode: Mutex<DiscoveryMode>,
    fetch_fails: AtomicBool,
    set_fails: AtomicBool,
    fetch_calls: AtomicUsize,
    set_calls: Mutex<Vec<(f64, Vec<String>)>>,
    fetch_hold: Mutex<Option<Arc<Notify>>>,
    fetch_started: Notify,
}

impl FakeNetwork {
    pub(crate) fn new(stations: Vec<StationStatus>) -> Self {
        Self {
            stations: Mutex::new(stations),
            discovery_mode: Mutex::new(DiscoveryMode::Answer),
            fetch_fails: AtomicBool::new(false),
            set_fails: AtomicBool::new(false),
            fetch_calls: AtomicUsize::new(0),
            set_calls: Mutex::new(Vec::new()),
            fetch_hold: Mutex::new(None),
            fetch_started: Notify::new(),
        }
    }

    /// Makes every later fetch read the stations, then wait on the returned
    /// `Notify` before answering.
    pub(crate) fn hold_fetches(&self) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *self.fetch_hold.lock() = Some(Arc::clone(&release));
        release
    }

    /// Waits until a held fetch has read the stations.
    pub(crate) async fn fetch_read(&self) {
        self.fetch_started.notified().await;
    }

    pub(crate) fn set_stations(&self, stations: Vec<StationStatus>) {
        *self.stations.lock() = stations;
    }

    pub(crate) fn set_discovery_mode(&self, mode: DiscoveryMode) {
        *self.discovery_mode.lock() = mode;
    }

    pub(crate) fn fail_fetch(&self, fail: bool) {
        self.fetch_fails.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_set(&self, fail: bool) {
        self.set_fails.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn set_calls(&self) -> Vec<(f64, Vec<String>)> {
        self.set_calls.lock().clone()
    }
}

impl ThermostatNetwork for FakeNetwork {
    async fn discover(&self) -> Result<DiscoveryReport, NetworkError> {
        let mode = *self.discovery_mode.lock();
        match mode {
            DiscoveryMode::Answer => Ok(DiscoveryReport::new(
                HubAddress::new("192.168.1.20", 4242),
                self.stations.lock().clone(),
            )),
            DiscoveryMode::Hang => std::future::pending().await,
            DiscoveryMode::Fail => Err(NetworkError::Unavailable("no route to hub".into())),
        }
    }

    async fn fetch_status(&self) -> Result<Vec<StationStatus>, NetworkError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fetch_fails.load(Ordering::SeqCst) {
            return Err(NetworkError::Unavailable("hub offline".into()));
        }

        let stations = self.stations.lock().clone();
        let hold = self.fetch_hold.lock().clone();
        if let Some(release) = hold {
            self.fetch_started.notify_one();
            release.notified().await;
        }
        Ok(stations)
    }

    async fn set_temperature(&self, value: f64, stations: &[String]) -> Result<(), NetworkError> {
        self.set_calls.lock().push((value, stations.to_vec()));
        if self.set_fails.load(Ordering::SeqCst) {
            return Err(NetworkError::Rejected("SET_TEMP failed".into()));
        }
        Ok(())
    }
}
