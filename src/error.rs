// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `NeoStat` library.
//!
//! This module provides the error hierarchy used across the library: command
//! value validation, thermostat network failures, hub payload parsing, and
//! registry lookups.
//!
//! None of these errors is fatal. A failed poll cycle is retried at the next
//! tick, a discovery that times out yields an empty result, and a failed
//! command is reported together with the value that was attempted
//! (see [`CommandError`]).

use std::time::Duration;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A command value was rejected before reaching the network.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The thermostat network could not serve the request.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// A hub payload could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// No device with the requested identity is known.
    #[error("device not found")]
    DeviceNotFound,
}

/// Errors related to command value validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// The requested temperature is absent, zero, or not a finite number.
    #[error("invalid target temperature: {0:?}")]
    InvalidTemperature(Option<f64>),
}

/// Errors reported by a thermostat network implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The hub could not be reached.
    #[error("thermostat network unavailable: {0}")]
    Unavailable(String),

    /// The hub did not answer in time.
    #[error("request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// The hub answered but refused the request.
    #[error("request rejected by hub: {0}")]
    Rejected(String),
}

/// Errors related to parsing hub payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),
}

/// A failed target temperature command.
///
/// Carries the value that was actually attempted: the requested value
/// unchanged when validation rejected it, or the clamped and rounded value
/// once validation passed.
#[derive(Debug, Error)]
#[error("failed to apply target temperature {attempted:?}: {kind}")]
pub struct CommandError {
    attempted: Option<f64>,
    #[source]
    kind: Error,
}

impl CommandError {
    /// Creates a command error for the given attempted value.
    #[must_use]
    pub fn new(attempted: Option<f64>, kind: impl Into<Error>) -> Self {
        Self {
            attempted,
            kind: kind.into(),
        }
    }

    /// Returns the value that was attempted.
    #[must_use]
    pub fn attempted(&self) -> Option<f64> {
        self.attempted
    }

    /// Returns the underlying error.
    #[must_use]
    pub fn kind(&self) -> &Error {
        &self.kind
    }

    /// Consumes the command error, returning the underlying error.
    #[must_use]
    pub fn into_kind(self) -> Error {
        self.kind
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
