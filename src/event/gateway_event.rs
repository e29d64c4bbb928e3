// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gateway event types.

use crate::state::DeviceState;

/// Events emitted by a [`Gateway`](crate::Gateway) and its devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    /// A bulb was found in the carousel during discovery.
    DeviceDiscovered {
        /// Gateway device identifier.
        device_id: String,
        /// Display name.
        name: String,
        /// Room holding the bulb.
        room_name: String,
    },

    /// A bulb's known state changed, after a status read or a confirmed command.
    DeviceUpdated {
        /// Gateway device identifier.
        device_id: String,
        /// The complete new state.
        state: DeviceState,
    },
}

impl GatewayEvent {
    /// Returns the device identifier associated with this event.
    #[must_use]
    pub fn device_id(&self) -> &str {
        match self {
            Self::DeviceDiscovered { device_id, .. } | Self::DeviceUpdated { device_id, .. } => {
                device_id
            }
        }
    }

    /// Returns `true` if this is a discovery event.
    #[must_use]
    pub fn is_discovery(&self) -> bool {
        matches!(self, Self::DeviceDiscovered { .. })
    }

    /// Creates an update event.
    #[must_use]
    pub fn device_updated(device_id: impl Into<String>, state: DeviceState) -> Self {
        Self::DeviceUpdated {
            device_id: device_id.into(),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;

    #[test]
    fn device_id_for_each_variant() {
        let discovered = GatewayEvent::DeviceDiscovered {
            device_id: "1".into(),
            name: "Bulb 1".into(),
            room_name: String::new(),
        };
        let updated = GatewayEvent::device_updated("2", DeviceState::default());

        assert_eq!(discovered.device_id(), "1");
        assert!(discovered.is_discovery());
        assert_eq!(updated.device_id(), "2");
        assert!(!updated.is_discovery());
    }

    #[test]
    fn updated_carries_state() {
        let state = DeviceState::new(1, Level::MAX);
        let event = GatewayEvent::device_updated("3", state);
        assert!(matches!(event, GatewayEvent::DeviceUpdated { state: s, .. } if s == state));
    }
}
