// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness level type.
//!
//! The gateway reports and accepts brightness as a percentage in 0-100.
//! This module keeps that range enforced at construction time.

use std::fmt;

use crate::error::ValueError;

/// Brightness level as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use tcpbulb_lib::types::Level;
///
/// let level = Level::new(75).unwrap();
/// assert_eq!(level.value(), 75);
///
/// assert_eq!(Level::MIN.value(), 0);
/// assert_eq!(Level::MAX.value(), 100);
///
/// assert!(Level::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(u8);

impl Level {
    /// Minimum level (0%).
    pub const MIN: Self = Self(0);

    /// Maximum level (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new brightness level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a level from a raw gateway value, clamping to the valid range.
    ///
    /// ```
    /// use tcpbulb_lib::types::Level;
    ///
    /// assert_eq!(Level::clamped(40).value(), 40);
    /// assert_eq!(Level::clamped(400).value(), 100);
    /// ```
    #[must_use]
    pub fn clamped(value: u32) -> Self {
        // Safe: min(100) always fits in u8
        #[allow(clippy::cast_possible_truncation)]
        Self(value.min(100) as u8)
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Level {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_valid_values() {
        for v in 0..=100 {
            assert_eq!(Level::new(v).unwrap().value(), v);
        }
    }

    #[test]
    fn level_invalid_value() {
        assert_eq!(
            Level::new(101),
            Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: 101
            })
        );
    }

    #[test]
    fn level_clamped() {
        assert_eq!(Level::clamped(0).value(), 0);
        assert_eq!(Level::clamped(100).value(), 100);
        assert_eq!(Level::clamped(u32::MAX).value(), 100);
    }

    #[test]
    fn level_defaults_to_zero() {
        assert_eq!(Level::default(), Level::MIN);
    }

    #[test]
    fn level_display() {
        assert_eq!(Level::new(30).unwrap().to_string(), "30%");
    }
}
