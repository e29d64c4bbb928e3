// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for bulb control.
//!
//! - [`PowerState`] - On/Off state, with the gateway's `1`/`0` wire encoding
//! - [`Level`] - Brightness level (0-100%)

mod level;
mod power;

pub use level::Level;
pub use power::PowerState;
