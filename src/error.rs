// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `tcpbulb` library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation, gateway communication, XML response decoding, and
//! configuration.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the gateway.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The gateway configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No device with the given identifier was discovered on the gateway.
    #[error("device not found: {0}")]
    DeviceNotFound(String),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),
}

/// Errors produced by a gateway round trip.
///
/// This type is `Clone` because one fetch result is delivered to every caller
/// waiting on that fetch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The gateway refused the connection (wrong address or hub offline).
    #[error("connection refused by gateway")]
    ConnectionRefused,

    /// The gateway reset the connection mid-request.
    #[error("connection reset by gateway")]
    ConnectionReset,

    /// No response arrived within the request timeout.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The gateway rejected the token; the hub has to be synced again.
    #[error("gateway is not synced (token rejected)")]
    NotSynced,

    /// The gateway answered with an unexpected return code.
    #[error("gateway rejected command with rc {0}")]
    CommandRejected(u16),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] ParseError),

    /// Any other transport failure (DNS, TLS, HTTP status).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl GatewayError {
    /// Returns true for errors caused by the network rather than the gateway's answer.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::ConnectionRefused
                | Self::ConnectionReset
                | Self::Timeout(_)
                | Self::ConnectionFailed(_)
        )
    }
}

/// Errors related to decoding gateway XML responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The body is not well-formed XML or does not match the expected schema.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Parallel per-device arrays have different lengths.
    #[error("field {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// The field whose length is inconsistent.
        field: &'static str,
        /// Number of device identifiers at that position.
        expected: usize,
        /// Number of entries actually present.
        actual: usize,
    },
}

impl From<quick_xml::de::DeError> for ParseError {
    fn from(err: quick_xml::de::DeError) -> Self {
        Self::Xml(err.to_string())
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
