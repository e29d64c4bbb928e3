// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for gateway XML responses.
//!
//! Every response is a `<gip>` document. Command acknowledgements only carry a
//! return code; the carousel listing carries the full room/device tree.

mod carousel;
mod status;

pub use carousel::{DeviceEntry, GatewayListing, Room};
pub use status::StatusResponse;
