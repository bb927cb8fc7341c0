// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stable thermostat identity.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Stable identifier for a thermostat.
///
/// The identity is derived from the two physical attributes a hub reports for
/// each station: its station name and its device type. The derivation is a
/// base64 encoding of the concatenated bytes, so the same station always maps
/// back to the same identity, including after a process restart. That is what
/// lets a rediscovered station be matched against a previously installed one.
///
/// # Examples
///
/// ```
/// use neostat_lib::DeviceIdentity;
///
/// let id = DeviceIdentity::generate("Kitchen", "1");
/// assert_eq!(id, DeviceIdentity::generate("Kitchen", "1"));
/// assert_eq!(id.decode().as_deref(), Some("Kitchen1"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    /// Derives the identity of a station from its name and device type.
    #[must_use]
    pub fn generate(station_name: &str, device_type: &str) -> Self {
        let mut raw = String::with_capacity(station_name.len() + device_type.len());
        raw.push_str(station_name);
        raw.push_str(device_type);
        Self(STANDARD.encode(raw.as_bytes()))
    }

    /// Wraps an identity token previously produced by [`generate`](Self::generate).
    ///
    /// Used when restoring identities from host persistence.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the opaque identity token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reverses the encoding, returning the concatenated station name and
    /// device type.
    ///
    /// Returns `None` if the token was not produced by this library.
    #[must_use]
    pub fn decode(&self) -> Option<String> {
        let bytes = STANDARD.decode(&self.0).ok()?;
        String::from_utf8(bytes).ok()
    }
}

impl fmt::Debug for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceIdentity({})", self.0)
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
