// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the gateway.

use std::io;
use std::time::Duration;

use reqwest::Client;

use crate::command::Command;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::protocol::{CommandResponse, Transport, timeout_millis};

/// HTTP transport posting commands to the gateway's `/gwr/gop.php` endpoint.
///
/// The gateway presents a self-signed certificate, so certificate
/// verification is disabled for this client.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use tcpbulb_lib::GatewayConfig;
/// use tcpbulb_lib::command::RoomGetCarouselCommand;
/// use tcpbulb_lib::protocol::{HttpTransport, Transport};
///
/// # async fn example() -> Result<(), tcpbulb_lib::GatewayError> {
/// let transport = HttpTransport::new(&GatewayConfig::new("192.168.1.20", "token"))?;
/// let response = transport
///     .send_command(&RoomGetCarouselCommand, Duration::from_millis(1500))
///     .await?;
/// println!("{}", response.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    token: String,
    client: Client,
}

impl HttpTransport {
    /// Creates a transport for the gateway described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        if config.host().is_empty() {
            return Err(GatewayError::InvalidAddress("host is required".to_string()));
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| GatewayError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint_url(),
            token: config.token().to_string(),
            client,
        })
    }

    /// Returns the URL commands are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
        timeout: Duration,
    ) -> Result<CommandResponse, GatewayError> {
        let body = command.to_form_body(&self.token);

        tracing::debug!(
            endpoint = %self.endpoint,
            cmd = command.name(),
            "Sending gateway command"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .timeout(timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| classify_error(&e, timeout))?;

        if !response.status().is_success() {
            return Err(GatewayError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(&e, timeout))?;

        tracing::trace!(body = %body, "Received gateway response");

        let response = CommandResponse::new(body);
        response.check_status()?;
        Ok(response)
    }
}

/// Maps a reqwest failure onto the gateway error taxonomy.
fn classify_error(err: &reqwest::Error, timeout: Duration) -> GatewayError {
    if err.is_timeout() {
        return GatewayError::Timeout(timeout_millis(timeout));
    }
    match io_error_kind(err) {
        Some(io::ErrorKind::ConnectionRefused) => GatewayError::ConnectionRefused,
        Some(io::ErrorKind::ConnectionReset) => GatewayError::ConnectionReset,
        Some(io::ErrorKind::TimedOut) => GatewayError::Timeout(timeout_millis(timeout)),
        _ => GatewayError::ConnectionFailed(err.to_string()),
    }
}

/// Finds the innermost I/O error kind in an error's source chain.
fn io_error_kind(err: &(dyn std::error::Error + 'static)) -> Option<io::ErrorKind> {
    let mut source = Some(err);
    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = current.source();
    }
    None
}
