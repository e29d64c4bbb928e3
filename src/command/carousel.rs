// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room carousel query.

use crate::command::Command;

/// Fields requested from the gateway for every device in the listing.
const CAROUSEL_FIELDS: &str = "name\ncontrol\npower\nproduct\nclass\nrealtype\nstatus";

/// Command returning the full status listing of all rooms and devices.
///
/// # Examples
///
/// ```
/// use tcpbulb_lib::command::{Command, RoomGetCarouselCommand};
///
/// let cmd = RoomGetCarouselCommand;
/// assert_eq!(cmd.name(), "RoomGetCarousel");
/// let xml = cmd.to_xml("t");
/// assert!(xml.contains("<fields>name\ncontrol\npower\n"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomGetCarouselCommand;

impl Command for RoomGetCarouselCommand {
    fn name(&self) -> &'static str {
        "RoomGetCarousel"
    }

    fn payload_fields(&self) -> Vec<(&'static str, String)> {
        vec![("fields", CAROUSEL_FIELDS.to_string())]
    }
}
