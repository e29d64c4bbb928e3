// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached, coalesced access to the gateway's carousel listing.
//!
//! - [`StatusCache`] holds the last listing and decides whether it is fresh.
//! - [`FetchCoordinator`] guarantees at most one outstanding `RoomGetCarousel`
//!   request per gateway, consulting the cache first and falling back to it
//!   when a request times out.
//!
//! Both pieces are owned by one [`Gateway`](crate::Gateway) and shared with its
//! devices and command dispatcher.

mod cache;
mod coordinator;

pub use cache::StatusCache;
pub use coordinator::{FetchCoordinator, FetchResult};
