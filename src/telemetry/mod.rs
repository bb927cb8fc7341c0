// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hub status payload parsing.
//!
//! Neo hubs answer an `INFO` request with a JSON document listing every
//! station and its current readings. Network implementations use this module
//! to turn that document into [`StationStatus`] values for
//! [`ThermostatNetwork::fetch_status`](crate::network::ThermostatNetwork::fetch_status)
//! and [`ThermostatNetwork::discover`](crate::network::ThermostatNetwork::discover).
//!
//! # Examples
//!
//! ```
//! use neostat_lib::telemetry::parse_hub_info;
//!
//! let payload = r#"{"devices":[
//!     {"device":"Kitchen","DEVICE_TYPE":1,
//!      "CURRENT_SET_TEMPERATURE":"21.0","CURRENT_TEMPERATURE":"19.60"}
//! ]}"#;
//!
//! let stations = parse_hub_info(payload).unwrap();
//! assert_eq!(stations[0].station_name, "Kitchen");
//! assert_eq!(stations[0].device_type, "1");
//! assert_eq!(stations[0].measured_temperature, Some(19.6));
//! ```

mod hub_info;

pub use hub_info::{HubInfo, StationInfo};

use crate::error::{ParseError, Result};
use crate::network::{DiscoveryReport, HubAddress, StationStatus};

/// Parses a hub `INFO` payload into station readings.
///
/// # Errors
///
/// Returns `Error::Parse` wrapping `ParseError::Json` if the payload is not
/// valid JSON, or `ParseError::MissingField` if it has no `devices` list.
pub fn parse_hub_info(payload: &str) -> Result<Vec<StationStatus>> {
    let info: HubInfo = serde_json::from_str(payload).map_err(ParseError::from)?;
    Ok(info.into_stations()?)
}

/// Parses the payload a hub sends when it announces itself during discovery.
///
/// # Errors
///
/// Same as [`parse_hub_info`].
pub fn parse_discovery(hub: HubAddress, payload: &str) -> Result<DiscoveryReport> {
    let stations = parse_hub_info(payload)?;
    tracing::debug!(%hub, count = stations.len(), "Parsed hub announcement");
    Ok(DiscoveryReport::new(hub, stations))
}
