// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level bulb abstraction.
//!
//! A [`Device`] is a thin, stateful projection of the last listing (or
//! confirmed command) seen for one bulb. Reads go through the shared
//! [`FetchCoordinator`], writes through the shared [`CommandDispatcher`];
//! devices of one gateway never talk to it on their own.
//!
//! ```no_run
//! use tcpbulb_lib::{Gateway, GatewayConfig, Level};
//!
//! # async fn example() -> tcpbulb_lib::Result<()> {
//! let gateway = Gateway::new(GatewayConfig::new("192.168.1.20", "token"))?;
//! let device = gateway.discover().await?.remove(0);
//!
//! if !device.get_power().await? {
//!     device.set_power(true).await?;
//! }
//! device.set_brightness(Level::new(60)?).await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::dispatcher::CommandDispatcher;
use crate::error::Error;
use crate::event::{EventBus, GatewayEvent};
use crate::fetch::FetchCoordinator;
use crate::protocol::Transport;
use crate::registry::{DeviceInfo, DeviceRegistry, Reconciled};
use crate::response::GatewayListing;
use crate::state::DeviceState;
use crate::types::{Level, PowerState};

/// Shared collaborators of every device on one gateway.
pub(crate) struct DeviceContext<T: Transport> {
    pub(crate) registry: Arc<DeviceRegistry>,
    pub(crate) coordinator: Arc<FetchCoordinator<T>>,
    pub(crate) dispatcher: Arc<CommandDispatcher<T>>,
    pub(crate) events: EventBus,
}

impl<T: Transport> Clone for DeviceContext<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            coordinator: Arc::clone(&self.coordinator),
            dispatcher: Arc::clone(&self.dispatcher),
            events: self.events.clone(),
        }
    }
}

/// A lightbulb paired with the gateway.
///
/// Clones share the same state.
pub struct Device<T: Transport> {
    info: Arc<DeviceInfo>,
    state: Arc<RwLock<DeviceState>>,
    context: DeviceContext<T>,
}

impl<T: Transport> Device<T> {
    pub(crate) fn new(info: DeviceInfo, state: DeviceState, context: DeviceContext<T>) -> Self {
        Self {
            info: Arc::new(info),
            state: Arc::new(RwLock::new(state)),
            context,
        }
    }

    /// Returns the gateway device identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.info.id()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// Returns the room holding the bulb.
    #[must_use]
    pub fn room_name(&self) -> &str {
        self.info.room_name()
    }

    /// Returns the identity information.
    #[must_use]
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Returns a snapshot of the last known state, without contacting the gateway.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        *self.state.read()
    }

    // ========== Power ==========

    /// Reads the current power state from the gateway.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gateway` if the listing cannot be fetched.
    pub async fn get_power(&self) -> Result<bool, Error> {
        Ok(self.refresh().await?.is_on())
    }

    /// Turns the bulb on or off.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gateway` if the command fails.
    pub async fn set_power(&self, power: impl Into<PowerState>) -> Result<(), Error> {
        let power = power.into();
        self.context.dispatcher.send_power(self.id(), power).await?;
        self.apply(|state| state.set_power(power));
        Ok(())
    }

    // ========== Brightness ==========

    /// Reads the current brightness from the gateway.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gateway` if the listing cannot be fetched.
    pub async fn get_brightness(&self) -> Result<Level, Error> {
        Ok(self.refresh().await?.level())
    }

    /// Sets the brightness.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gateway` if the command fails.
    pub async fn set_brightness(&self, level: Level) -> Result<(), Error> {
        self.context
            .dispatcher
            .send_brightness(self.id(), level)
            .await?;
        self.apply(|state| state.set_level(level));
        Ok(())
    }

    // ========== Helpers ==========

    /// Fetches the listing and reconciles this device against it.
    async fn refresh(&self) -> Result<DeviceState, Error> {
        let listing = self.context.coordinator.fetch().await?;
        Ok(self.reconcile(&listing))
    }

    /// Reconciles this device against `listing` and returns the resulting state.
    pub(crate) fn reconcile(&self, listing: &GatewayListing) -> DeviceState {
        let (outcome, snapshot) = {
            let mut state = self.state.write();
            let outcome = self
                .context
                .registry
                .reconcile(self.id(), &mut state, listing);
            (outcome, *state)
        };

        if outcome == Reconciled::Updated {
            self.publish_update(snapshot);
        }
        snapshot
    }

    /// Applies a change confirmed by the gateway to the local state.
    fn apply(&self, change: impl FnOnce(&mut DeviceState)) {
        let (before, after) = {
            let mut state = self.state.write();
            let before = *state;
            change(&mut state);
            (before, *state)
        };
        if before != after {
            self.publish_update(after);
        }
    }

    fn publish_update(&self, state: DeviceState) {
        tracing::debug!(device_id = self.id(), ?state, "Device state updated");
        self.context
            .events
            .publish(GatewayEvent::device_updated(self.id(), state));
    }
}

impl<T: Transport> Clone for Device<T> {
    fn clone(&self) -> Self {
        Self {
            info: Arc::clone(&self.info),
            state: Arc::clone(&self.state),
            context: self.context.clone(),
        }
    }
}

impl<T: Transport> fmt::Debug for Device<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("info", &*self.info)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}
