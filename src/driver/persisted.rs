// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-persisted device entries.

use serde::{Deserialize, Serialize};

use crate::identity::DeviceIdentity;
use crate::state::DeviceRecord;

/// An installed device as the host stores it between restarts.
///
/// The host owns persistence; the driver only consumes these entries in
/// [`init`](super::ThermostatDriver::init) and produces them from
/// [`installed_devices`](super::ThermostatDriver::installed_devices).
///
/// # Examples
///
/// ```
/// use neostat_lib::driver::PersistedDevice;
///
/// let json = r#"[{"id":"S2l0Y2hlbjE=","station_name":"Kitchen"}]"#;
/// let devices: Vec<PersistedDevice> = serde_json::from_str(json).unwrap();
///
/// assert_eq!(devices[0].station_name, "Kitchen");
/// assert_eq!(devices[0].device_type, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedDevice {
    /// Stable device identity.
    pub id: DeviceIdentity,
    /// Last known station name.
    pub station_name: String,
    /// Device type, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
}

impl PersistedDevice {
    /// Creates an entry for a station.
    #[must_use]
    pub fn new(station_name: impl Into<String>, device_type: impl Into<String>) -> Self {
        let station_name = station_name.into();
        let device_type = device_type.into();

        Self {
            id: DeviceIdentity::generate(&station_name, &device_type),
            station_name,
            device_type: Some(device_type),
        }
    }

    /// Builds the record restored into the installed partition.
    ///
    /// The persisted identity is kept as-is, and no temperatures are
    /// assumed until the first poll.
    #[must_use]
    pub fn to_record(&self) -> DeviceRecord {
        DeviceRecord::with_identity(
            self.id.clone(),
            self.station_name.clone(),
            self.device_type.clone().unwrap_or_default(),
        )
    }
}

impl From<&DeviceRecord> for PersistedDevice {
    fn from(record: &DeviceRecord) -> Self {
        Self {
            id: record.identity().clone(),
            station_name: record.station_name().to_string(),
            device_type: Some(record.device_type().to_string()).filter(|t| !t.is_empty()),
        }
    }
}
