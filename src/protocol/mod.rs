// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer for talking to the gateway.
//!
//! A [`Transport`] performs exactly one request per call and never retries;
//! retry and caching policy live above it, in the
//! [`FetchCoordinator`](crate::fetch::FetchCoordinator).
//!
//! - [`HttpTransport`]: HTTPS POST to the gateway's `/gwr/gop.php` endpoint
//!   (requires the `http` feature)

#[cfg(feature = "http")]
mod http;
#[cfg(test)]
pub(crate) mod scripted;

#[cfg(feature = "http")]
pub use http::HttpTransport;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::command::Command;
use crate::error::GatewayError;
use crate::response::StatusResponse;

/// Raw response from a gateway command.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    /// The raw XML response body.
    body: String,
}

impl CommandResponse {
    /// Creates a new command response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the raw XML response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the response as a specific type.
    ///
    /// # Errors
    ///
    /// Returns error if the XML cannot be decoded into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, crate::error::ParseError> {
        quick_xml::de::from_str(&self.body).map_err(Into::into)
    }

    /// Checks the gateway return code carried by the body.
    ///
    /// Bodies that are not XML at all carry no return code and pass; callers
    /// that need structured data will fail when they decode it.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotSynced` for the token-rejected sentinel and
    /// `GatewayError::CommandRejected` for other failure codes.
    pub fn check_status(&self) -> Result<(), GatewayError> {
        self.parse::<StatusResponse>()
            .map_or(Ok(()), |status| status.check())
    }
}

/// Trait for transports that can deliver commands to the gateway.
///
/// Implementations must enforce `timeout` themselves and report it as
/// [`GatewayError::Timeout`].
pub trait Transport: Send + Sync + 'static {
    /// Sends a command and returns the gateway's answer.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the round trip fails or the gateway rejects
    /// the token.
    fn send_command<C: Command + Sync>(
        &self,
        command: &C,
        timeout: Duration,
    ) -> impl Future<Output = Result<CommandResponse, GatewayError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send_command<C: Command + Sync>(
        &self,
        command: &C,
        timeout: Duration,
    ) -> impl Future<Output = Result<CommandResponse, GatewayError>> + Send {
        (**self).send_command(command, timeout)
    }
}

/// Sends a command, bounding the wait even if the transport ignores `timeout`.
pub(crate) async fn send_with_timeout<T: Transport, C: Command + Sync>(
    transport: &T,
    command: &C,
    timeout: Duration,
) -> Result<CommandResponse, GatewayError> {
    tokio::time::timeout(timeout, transport.send_command(command, timeout))
        .await
        .unwrap_or_else(|_| Err(GatewayError::Timeout(timeout_millis(timeout))))
}

/// Converts a timeout to the millisecond count carried by `GatewayError::Timeout`.
pub(crate) fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}
