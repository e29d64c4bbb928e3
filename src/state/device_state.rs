// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use crate::types::{Level, PowerState};

/// Power and brightness of a bulb as last reported.
///
/// `state` keeps the gateway's raw value: 0 is off, anything greater is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DeviceState {
    state: u32,
    level: Level,
}

impl DeviceState {
    /// Creates a state from a raw gateway `state` and a level.
    #[must_use]
    pub fn new(state: u32, level: Level) -> Self {
        Self { state, level }
    }

    /// Returns the raw gateway state value.
    #[must_use]
    pub fn raw_state(&self) -> u32 {
        self.state
    }

    /// Returns the power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        PowerState::from_raw(self.state)
    }

    /// Returns true if the bulb is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state > 0
    }

    /// Returns the brightness level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Records a power state confirmed by the gateway.
    pub fn set_power(&mut self, power: PowerState) {
        self.state = u32::from(power.wire_value());
    }

    /// Records a brightness level confirmed by the gateway.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }
}
