// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `tcpbulb` Lib - A Rust library to control Connected by TCP lightbulbs.
//!
//! This library talks to the TCP Connected gateway over its local HTTP/XML
//! control endpoint to discover bulbs and read or change their power and
//! brightness.
//!
//! # Supported Features
//!
//! - **Discovery**: every bulb paired with the gateway, grouped by room
//! - **Power control**: read and set on/off
//! - **Brightness control**: read and set a 0-100 level
//! - **Request coalescing**: concurrent status reads share one gateway request
//! - **Status caching**: optional TTL cache, invalidated after every write
//! - **Events**: broadcast notifications for discovered and updated bulbs
//!
//! # Quick Start
//!
//! ```no_run
//! use tcpbulb_lib::{Gateway, GatewayConfig, Level};
//!
//! #[tokio::main]
//! async fn main() -> tcpbulb_lib::Result<()> {
//!     let config = GatewayConfig::new("192.168.1.20", "e2de937chr0lhrlq")
//!         .with_cache_ttl(std::time::Duration::from_millis(100));
//!     let gateway = Gateway::new(config)?;
//!
//!     for device in gateway.discover().await? {
//!         device.set_power(true).await?;
//!         device.set_brightness(Level::new(75)?).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Gateway Behavior
//!
//! The gateway silently drops requests that arrive while it is still
//! answering a previous one, and every status read returns the full listing
//! of all bulbs. Reads are therefore funneled through a single-flight
//! [`FetchCoordinator`](fetch::FetchCoordinator); writes go straight to the
//! gateway and mark the cached listing stale.

pub mod command;
pub mod config;
mod device;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod fetch;
mod gateway;
pub mod protocol;
pub mod registry;
pub mod response;
pub mod state;
pub mod types;

pub use command::{Command, DeviceCommand, RoomGetCarouselCommand};
pub use config::GatewayConfig;
pub use device::Device;
pub use error::{Error, GatewayError, ParseError, Result, ValueError};
pub use event::{EventBus, GatewayEvent};
pub use gateway::Gateway;
#[cfg(feature = "http")]
pub use protocol::HttpTransport;
pub use protocol::{CommandResponse, Transport};
pub use response::{DeviceEntry, GatewayListing, Room};
pub use state::DeviceState;
pub use types::{Level, PowerState};
