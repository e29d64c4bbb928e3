// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for bulb discovery and state changes.
//!
//! The [`EventBus`] wraps a tokio broadcast channel so any number of
//! subscribers (typically a host framework's accessory layer) see each
//! [`GatewayEvent`].
//!
//! # Examples
//!
//! ```
//! use tcpbulb_lib::event::{EventBus, GatewayEvent};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(GatewayEvent::DeviceDiscovered {
//!     device_id: "7".to_string(),
//!     name: "Bulb 7".to_string(),
//!     room_name: "Hall".to_string(),
//! });
//! ```

mod event_bus;
mod gateway_event;

pub use event_bus::EventBus;
pub use gateway_event::GatewayEvent;
