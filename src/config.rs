// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gateway configuration.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

/// Configuration for one gateway client.
///
/// The gateway serves HTTPS with a self-signed certificate on port 443 by
/// default. The token comes from a previous pairing ("sync") with the hub.
///
/// # Examples
///
/// ```
/// use tcpbulb_lib::GatewayConfig;
/// use std::time::Duration;
///
/// let config = GatewayConfig::new("192.168.1.20", "e2de937chr0lhrlq")
///     .with_timeout(Duration::from_secs(3))
///     .with_cache_ttl(Duration::from_millis(100))
///     .with_device_name("216438039298518643", "Porch");
///
/// assert_eq!(config.endpoint_url(), "https://192.168.1.20/gwr/gop.php");
/// assert_eq!(config.device_names()["216438039298518643"], "Porch");
/// ```
///
/// The same configuration can be read from the JSON block a host framework
/// stores for the platform:
///
/// ```
/// use tcpbulb_lib::GatewayConfig;
///
/// let config = GatewayConfig::from_json(r#"{
///     "name": "TCP Lights",
///     "ip": "192.168.1.20",
///     "token": "e2de937chr0lhrlq",
///     "requestTimeout": 2000,
///     "roomCacheTTL": 100,
///     "deviceNames": { "7": "Desk" }
/// }"#).unwrap();
///
/// assert_eq!(config.request_timeout().as_millis(), 2000);
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    name: String,
    host: String,
    token: String,
    port: u16,
    use_https: bool,
    request_timeout: Duration,
    cache_ttl: Duration,
    device_names: HashMap<String, String>,
}

impl GatewayConfig {
    /// Default platform name.
    pub const DEFAULT_NAME: &'static str = "ConnectedByTcp";
    /// Default HTTP port.
    pub const DEFAULT_HTTP_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    /// Default request timeout; the gateway tends to drop slow requests.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1500);
    /// Default cache TTL; zero disables the carousel cache.
    pub const DEFAULT_CACHE_TTL: Duration = Duration::ZERO;
    /// Path of the gateway's command endpoint.
    pub const ENDPOINT_PATH: &'static str = "/gwr/gop.php";

    /// Creates a configuration for the gateway at `host`.
    #[must_use]
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            host: host.into(),
            token: token.into(),
            port: Self::DEFAULT_HTTPS_PORT,
            use_https: true,
            request_timeout: Self::DEFAULT_TIMEOUT,
            cache_ttl: Self::DEFAULT_CACHE_TTL,
            device_names: HashMap::new(),
        }
    }

    /// Parses the host-framework JSON configuration block.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the JSON is invalid or lacks `ip`/`token`.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: RawConfig =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        raw.try_into()
    }

    /// Sets the platform name used in logs.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Switches to plain HTTP.
    ///
    /// If the port hasn't been explicitly set, it will be changed to 80.
    #[must_use]
    pub fn with_http(mut self) -> Self {
        self.use_https = false;
        if self.port == Self::DEFAULT_HTTPS_PORT {
            self.port = Self::DEFAULT_HTTP_PORT;
        }
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets how long a carousel listing may be served from cache.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Assigns a display name to a device identifier.
    #[must_use]
    pub fn with_device_name(
        mut self,
        device_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.device_names.insert(device_id.into(), name.into());
        self
    }

    /// Returns the platform name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the gateway token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether HTTPS is used.
    #[must_use]
    pub fn use_https(&self) -> bool {
        self.use_https
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the carousel cache TTL.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Returns the configured display names, keyed by device identifier.
    #[must_use]
    pub fn device_names(&self) -> &HashMap<String, String> {
        &self.device_names
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        let port_suffix = if (self.use_https && self.port == Self::DEFAULT_HTTPS_PORT)
            || (!self.use_https && self.port == Self::DEFAULT_HTTP_PORT)
        {
            String::new()
        } else {
            format!(":{}", self.port)
        };
        format!("{scheme}://{}{port_suffix}", self.host)
    }

    /// Returns the full URL of the command endpoint.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url(), Self::ENDPOINT_PATH)
    }
}

/// JSON shape of the platform block, using the host framework's key names.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "ip")]
    host: Option<String>,
    token: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    request_timeout: Option<u64>,
    #[serde(rename = "roomCacheTTL", default)]
    room_cache_ttl: Option<u64>,
    #[serde(default)]
    device_names: HashMap<String, String>,
}

impl TryFrom<RawConfig> for GatewayConfig {
    type Error = Error;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let host = raw
            .host
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::Config("ip is required".to_string()))?;
        let token = raw.token.filter(|t| !t.is_empty()).ok_or_else(|| {
            Error::Config("token is required; sync the hub to obtain one".to_string())
        })?;

        let mut config = Self::new(host, token);
        if let Some(name) = raw.name {
            config.name = name;
        }
        if let Some(port) = raw.port {
            config.port = port;
        }
        // Zero means unset.
        if let Some(ms) = raw.request_timeout.filter(|ms| *ms > 0) {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = raw.room_cache_ttl {
            config.cache_ttl = Duration::from_millis(ms);
        }
        config.device_names = raw.device_names;
        Ok(config)
    }
}
