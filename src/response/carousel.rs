// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Carousel (`RoomGetCarousel`) response parsing.
//!
//! The gateway groups devices per room. Each `<device>` element carries
//! parallel lists: the n-th `<did>` belongs with the n-th `<state>` and, when
//! present, the n-th `<level>`:
//!
//! ```xml
//! <gip>
//!   <version>1</version>
//!   <rc>200</rc>
//!   <room>
//!     <rid>0</rid>
//!     <name>Kitchen</name>
//!     <device>
//!       <did>216438039298518643</did>
//!       <state>1</state>
//!       <level>80</level>
//!     </device>
//!   </room>
//! </gip>
//! ```
//!
//! Decoding flattens those lists into one [`DeviceEntry`] per identifier and
//! rejects documents whose lists disagree in length.

use serde::Deserialize;

use crate::error::{GatewayError, ParseError};
use crate::protocol::CommandResponse;
use crate::types::Level;

#[derive(Debug, Deserialize)]
struct CarouselDocument {
    #[serde(rename = "room", default)]
    rooms: Vec<RoomRecord>,
}

#[derive(Debug, Deserialize)]
struct RoomRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "device", default)]
    devices: Vec<DeviceRecord>,
}

#[derive(Debug, Deserialize)]
struct DeviceRecord {
    #[serde(rename = "did", default)]
    ids: Vec<String>,
    #[serde(rename = "state", default)]
    states: Vec<u32>,
    #[serde(rename = "level", default)]
    levels: Vec<u32>,
}

impl DeviceRecord {
    fn into_entries(self, room_name: &str) -> Result<Vec<DeviceEntry>, ParseError> {
        let expected = self.ids.len();
        if self.states.len() != expected {
            return Err(ParseError::LengthMismatch {
                field: "state",
                expected,
                actual: self.states.len(),
            });
        }
        if !self.levels.is_empty() && self.levels.len() != expected {
            return Err(ParseError::LengthMismatch {
                field: "level",
                expected,
                actual: self.levels.len(),
            });
        }

        let mut levels = self.levels.into_iter().map(Level::clamped);
        Ok(self
            .ids
            .into_iter()
            .zip(self.states)
            .map(|(id, state)| DeviceEntry {
                id,
                room_name: room_name.to_string(),
                state,
                level: levels.next(),
            })
            .collect())
    }
}

/// A snapshot of every room and device known to the gateway.
///
/// # Examples
///
/// ```
/// use tcpbulb_lib::response::GatewayListing;
///
/// let xml = "<gip><version>1</version><rc>200</rc>\
///            <room><name>Hall</name><device><did>7</did><state>0</state></device></room>\
///            </gip>";
/// let listing = GatewayListing::from_xml(xml).unwrap();
///
/// let entry = listing.find("7").unwrap();
/// assert_eq!(entry.room_name(), "Hall");
/// assert_eq!(entry.level(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayListing {
    rooms: Vec<Room>,
}

impl GatewayListing {
    /// Creates a listing from already decoded rooms.
    #[must_use]
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// Decodes a carousel XML document.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the XML is invalid or the per-device lists
    /// have inconsistent lengths.
    pub fn from_xml(xml: &str) -> Result<Self, ParseError> {
        let document: CarouselDocument = quick_xml::de::from_str(xml)?;
        let rooms = document
            .rooms
            .into_iter()
            .map(|room| {
                let name = room.name.unwrap_or_default();
                let mut devices = Vec::new();
                for record in room.devices {
                    devices.extend(record.into_entries(&name)?);
                }
                Ok(Room { name, devices })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;
        Ok(Self { rooms })
    }

    /// Decodes a listing from a gateway response, honoring its return code.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotSynced` or `GatewayError::CommandRejected`
    /// when the return code says so, and `GatewayError::MalformedResponse`
    /// when the body cannot be decoded.
    pub fn from_response(response: &CommandResponse) -> Result<Self, GatewayError> {
        response.check_status()?;
        Ok(Self::from_xml(response.body())?)
    }

    /// Returns the rooms in gateway order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Iterates over all device entries, room by room.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceEntry> {
        self.rooms.iter().flat_map(|room| room.devices.iter())
    }

    /// Finds the entry carrying the given device identifier.
    #[must_use]
    pub fn find(&self, device_id: &str) -> Option<&DeviceEntry> {
        self.devices().find(|entry| entry.id == device_id)
    }

    /// Returns the total number of device entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.iter().map(|room| room.devices.len()).sum()
    }

    /// Returns true if the listing holds no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A room as reported by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Room {
    name: String,
    devices: Vec<DeviceEntry>,
}

impl Room {
    /// Creates a room holding the given entries.
    #[must_use]
    pub fn new(name: impl Into<String>, devices: Vec<DeviceEntry>) -> Self {
        Self {
            name: name.into(),
            devices,
        }
    }

    /// Returns the room name (empty when the gateway sent none).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device entries of this room.
    #[must_use]
    pub fn devices(&self) -> &[DeviceEntry] {
        &self.devices
    }
}

/// Live status of one device at the time of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    id: String,
    room_name: String,
    state: u32,
    level: Option<Level>,
}

impl DeviceEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        room_name: impl Into<String>,
        state: u32,
        level: Option<Level>,
    ) -> Self {
        Self {
            id: id.into(),
            room_name: room_name.into(),
            state,
            level,
        }
    }

    /// Returns the gateway device identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the name of the room holding the device.
    #[must_use]
    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    /// Returns the raw state (0 = off, greater than 0 = on).
    #[must_use]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Returns the brightness level, if the gateway reported one.
    #[must_use]
    pub fn level(&self) -> Option<Level> {
        self.level
    }
}
