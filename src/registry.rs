// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device discovery and state reconciliation.
//!
//! The gateway has no dedicated discovery call: every bulb it knows shows up
//! in the carousel listing, so discovery and status reads share one source.

use std::collections::{HashMap, HashSet};

use crate::config::GatewayConfig;
use crate::response::{DeviceEntry, GatewayListing};
use crate::state::DeviceState;
use crate::types::Level;

/// Identity of a discovered bulb.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceInfo {
    id: String,
    name: String,
    room_name: String,
}

impl DeviceInfo {
    /// Creates device identity information.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        room_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            room_name: room_name.into(),
        }
    }

    /// Returns the gateway device identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the room name.
    #[must_use]
    pub fn room_name(&self) -> &str {
        &self.room_name
    }
}

/// A bulb found in a listing, with the state it was reported in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Identity.
    pub info: DeviceInfo,
    /// Initial state.
    pub state: DeviceState,
}

/// Outcome of [`DeviceRegistry::reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The state differed from the listing and was overwritten.
    Updated,
    /// The state already matched the listing.
    Unchanged,
    /// The device is absent from the listing; the state was left alone.
    Missing,
}

impl Reconciled {
    /// Returns true if the device was present in the listing.
    #[must_use]
    pub fn is_found(self) -> bool {
        !matches!(self, Self::Missing)
    }
}

/// Turns carousel listings into devices and keeps device state in line with them.
///
/// # Examples
///
/// ```
/// use tcpbulb_lib::registry::DeviceRegistry;
/// use tcpbulb_lib::response::GatewayListing;
///
/// let xml = "<gip><room><name>Hall</name>\
///            <device><did>7</did><state>1</state><level>40</level></device>\
///            </room></gip>";
/// let listing = GatewayListing::from_xml(xml).unwrap();
///
/// let registry = DeviceRegistry::new();
/// let devices = registry.discover(&listing);
///
/// assert_eq!(devices[0].info.name(), "Bulb 7");
/// assert!(devices[0].state.is_on());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    device_names: HashMap<String, String>,
}

impl DeviceRegistry {
    /// Creates a registry using generated display names only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry honoring the display names configured for the gateway.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            device_names: config.device_names().clone(),
        }
    }

    /// Returns the display name for a device identifier.
    #[must_use]
    pub fn display_name(&self, device_id: &str) -> String {
        self.device_names
            .get(device_id)
            .cloned()
            .unwrap_or_else(|| format!("Bulb {device_id}"))
    }

    /// Lists every device in `listing`, in gateway order.
    ///
    /// An identifier listed twice is only reported once, with its first entry.
    #[must_use]
    pub fn discover(&self, listing: &GatewayListing) -> Vec<DiscoveredDevice> {
        let mut seen = HashSet::new();
        let mut devices = Vec::with_capacity(listing.len());

        for entry in listing.devices() {
            if !seen.insert(entry.id()) {
                tracing::warn!(device_id = entry.id(), "Duplicate device in carousel, skipping");
                continue;
            }
            let name = self.display_name(entry.id());
            let info = DeviceInfo::new(entry.id(), name, entry.room_name());
            tracing::debug!(
                device_id = info.id(),
                name = info.name(),
                room = info.room_name(),
                "Discovered device"
            );
            devices.push(DiscoveredDevice {
                info,
                state: state_of(entry),
            });
        }

        tracing::info!(count = devices.len(), "Device discovery complete");
        devices
    }

    /// Overwrites `state` with the listing's entry for `device_id`.
    ///
    /// Applying the same listing twice leaves the state unchanged the second time.
    pub fn reconcile(
        &self,
        device_id: &str,
        state: &mut DeviceState,
        listing: &GatewayListing,
    ) -> Reconciled {
        let Some(entry) = listing.find(device_id) else {
            tracing::debug!(device_id, "Device not in carousel, keeping state");
            return Reconciled::Missing;
        };

        let reported = state_of(entry);
        if *state == reported {
            Reconciled::Unchanged
        } else {
            tracing::trace!(device_id, ?reported, "Reconciled device state");
            *state = reported;
            Reconciled::Updated
        }
    }
}

fn state_of(entry: &DeviceEntry) -> DeviceState {
    DeviceState::new(entry.state(), entry.level().unwrap_or(Level::MIN))
}
