// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device control commands.

use crate::command::Command;
use crate::types::{Level, PowerState};

/// Command changing the power state or brightness of a single bulb.
///
/// # Examples
///
/// ```
/// use tcpbulb_lib::command::{Command, DeviceCommand};
/// use tcpbulb_lib::types::Level;
///
/// let cmd = DeviceCommand::level("7", Level::new(40).unwrap());
/// assert_eq!(
///     cmd.to_xml("t"),
///     "<gip><version>1</version><token>t</token>\
///      <did>7</did><value>40</value><type>level</type></gip>"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Switch the bulb on or off.
    Power {
        /// Gateway device identifier.
        device_id: String,
        /// The desired power state.
        state: PowerState,
    },
    /// Set the brightness level.
    Level {
        /// Gateway device identifier.
        device_id: String,
        /// The desired level.
        level: Level,
    },
}

impl DeviceCommand {
    /// Creates a power command.
    #[must_use]
    pub fn power(device_id: impl Into<String>, state: PowerState) -> Self {
        Self::Power {
            device_id: device_id.into(),
            state,
        }
    }

    /// Creates a brightness command.
    #[must_use]
    pub fn level(device_id: impl Into<String>, level: Level) -> Self {
        Self::Level {
            device_id: device_id.into(),
            level,
        }
    }

    /// Returns the targeted device identifier.
    #[must_use]
    pub fn device_id(&self) -> &str {
        match self {
            Self::Power { device_id, .. } | Self::Level { device_id, .. } => device_id,
        }
    }
}

impl Command for DeviceCommand {
    fn name(&self) -> &'static str {
        "DeviceSendCommand"
    }

    fn payload_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Power { device_id, state } => vec![
                ("did", device_id.clone()),
                ("value", state.wire_value().to_string()),
            ],
            Self::Level { device_id, level } => vec![
                ("did", device_id.clone()),
                ("value", level.value().to_string()),
                ("type", "level".to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_payload_has_no_type() {
        let cmd = DeviceCommand::power("216438039298518643", PowerState::On);
        assert_eq!(
            cmd.payload_fields(),
            vec![
                ("did", "216438039298518643".to_string()),
                ("value", "1".to_string()),
            ]
        );
    }

    #[test]
    fn level_payload_marks_type() {
        let cmd = DeviceCommand::level("5", Level::new(0).unwrap());
        assert_eq!(
            cmd.payload_fields(),
            vec![
                ("did", "5".to_string()),
                ("value", "0".to_string()),
                ("type", "level".to_string()),
            ]
        );
        assert_eq!(cmd.device_id(), "5");
    }
}
