// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Write path: power and brightness commands.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::command::{Command, DeviceCommand};
use crate::error::GatewayError;
use crate::fetch::StatusCache;
use crate::protocol::{Transport, send_with_timeout};
use crate::types::{Level, PowerState};

/// Sends device commands and invalidates the status cache once they succeed.
///
/// Commands bypass the fetch coordinator entirely. A successful write makes
/// the cached listing stale, so the next status read goes to the gateway.
/// Failed commands leave the cache untouched and are not retried.
pub struct CommandDispatcher<T: Transport> {
    transport: Arc<T>,
    cache: Arc<Mutex<StatusCache>>,
    timeout: Duration,
}

impl<T: Transport> CommandDispatcher<T> {
    /// Creates a dispatcher sending through `transport` and invalidating `cache`.
    #[must_use]
    pub fn new(transport: Arc<T>, cache: Arc<Mutex<StatusCache>>, timeout: Duration) -> Self {
        Self {
            transport,
            cache,
            timeout,
        }
    }

    /// Turns a bulb on or off.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the command fails or the gateway rejects it.
    pub async fn send_power(&self, device_id: &str, state: PowerState) -> Result<(), GatewayError> {
        self.dispatch(&DeviceCommand::power(device_id, state)).await
    }

    /// Sets a bulb's brightness.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the command fails or the gateway rejects it.
    pub async fn send_brightness(&self, device_id: &str, level: Level) -> Result<(), GatewayError> {
        self.dispatch(&DeviceCommand::level(device_id, level)).await
    }

    async fn dispatch(&self, command: &DeviceCommand) -> Result<(), GatewayError> {
        let device_id = command.device_id();
        tracing::debug!(device_id, command = command.name(), "Sending device command");

        let result = send_with_timeout(&*self.transport, command, self.timeout)
            .await
            .and_then(|response| response.check_status());

        match result {
            Ok(()) => {
                self.cache.lock().invalidate();
                tracing::info!(device_id, "Device command accepted, cache invalidated");
                Ok(())
            }
            Err(GatewayError::NotSynced) => {
                tracing::warn!(device_id, "Gateway rejected token; sync the hub again");
                Err(GatewayError::NotSynced)
            }
            Err(err) => {
                tracing::warn!(device_id, error = %err, "Device command failed");
                Err(err)
            }
        }
    }
}

impl<T: Transport> fmt::Debug for CommandDispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
