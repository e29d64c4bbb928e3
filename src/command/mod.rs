// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gateway command definitions.
//!
//! Every gateway request is an HTTP POST whose form body carries three fields:
//!
//! | Field | Content |
//! |-------|---------|
//! | `cmd` | Command name, e.g. `RoomGetCarousel` |
//! | `data` | URL-encoded XML payload wrapped in `<gip>` |
//! | `fmt` | Always `xml` |
//!
//! The XML payload always starts with `<version>1</version><token>T</token>`;
//! a command only contributes the fields that follow.
//!
//! # Examples
//!
//! ```
//! use tcpbulb_lib::command::{Command, DeviceCommand};
//! use tcpbulb_lib::types::PowerState;
//!
//! let cmd = DeviceCommand::power("7", PowerState::On);
//! assert_eq!(cmd.name(), "DeviceSendCommand");
//! assert_eq!(
//!     cmd.to_xml("abc"),
//!     "<gip><version>1</version><token>abc</token><did>7</did><value>1</value></gip>"
//! );
//! ```

mod carousel;
mod device;

pub use carousel::RoomGetCarouselCommand;
pub use device::DeviceCommand;

use quick_xml::escape::escape;

/// A command that can be sent to the gateway.
pub trait Command {
    /// Returns the command name sent in the `cmd` form field.
    fn name(&self) -> &'static str;

    /// Returns the XML elements that follow the token, in order.
    fn payload_fields(&self) -> Vec<(&'static str, String)>;

    /// Returns the full `<gip>` XML document for this command.
    fn to_xml(&self, token: &str) -> String {
        let mut xml = format!("<gip><version>1</version><token>{}</token>", escape(token));
        for (tag, value) in self.payload_fields() {
            xml.push_str(&format!("<{tag}>{}</{tag}>", escape(value.as_str())));
        }
        xml.push_str("</gip>");
        xml
    }

    /// Returns the form-encoded request body.
    fn to_form_body(&self, token: &str) -> String {
        format!(
            "cmd={}&data={}&fmt=xml",
            self.name(),
            urlencoding::encode(&self.to_xml(token))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Level, PowerState};

    #[test]
    fn form_body_encodes_xml_payload() {
        let cmd = DeviceCommand::power("42", PowerState::Off);
        assert_eq!(
            cmd.to_form_body("tok"),
            "cmd=DeviceSendCommand&data=%3Cgip%3E%3Cversion%3E1%3C%2Fversion%3E\
             %3Ctoken%3Etok%3C%2Ftoken%3E%3Cdid%3E42%3C%2Fdid%3E%3Cvalue%3E0\
             %3C%2Fvalue%3E%3C%2Fgip%3E&fmt=xml"
        );
    }

    #[test]
    fn token_is_escaped() {
        let cmd = DeviceCommand::level("1", Level::MAX);
        assert!(cmd.to_xml("a<b").contains("<token>a&lt;b</token>"));
    }
}
