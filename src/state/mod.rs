// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live bulb state.
//!
//! [`DeviceState`] is the in-memory projection of the last carousel entry
//! (or successful command) seen for a bulb.
//!
//! # Examples
//!
//! ```
//! use tcpbulb_lib::state::DeviceState;
//! use tcpbulb_lib::types::{Level, PowerState};
//!
//! let mut state = DeviceState::new(0, Level::MIN);
//! state.set_power(PowerState::On);
//!
//! assert!(state.is_on());
//! ```

mod device_state;

pub use device_state::DeviceState;
