// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of a lightbulb.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Requested or reported power state of a bulb.
///
/// On the wire the gateway uses `1` for on and `0` for off. Reported
/// states greater than zero all mean "on".
///
/// # Examples
///
/// ```
/// use tcpbulb_lib::types::PowerState;
///
/// assert_eq!(PowerState::On.wire_value(), 1);
/// assert_eq!(PowerState::from_raw(0), PowerState::Off);
/// assert_eq!(PowerState::from_raw(3), PowerState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Bulb is off.
    Off,
    /// Bulb is on.
    On,
}

impl PowerState {
    /// Interprets a raw `state` value from a carousel listing.
    #[must_use]
    pub const fn from_raw(state: u32) -> Self {
        if state > 0 { Self::On } else { Self::Off }
    }

    /// Returns the value sent in a `DeviceSendCommand` payload.
    #[must_use]
    pub const fn wire_value(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Returns true if the state is [`PowerState::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns the display representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
