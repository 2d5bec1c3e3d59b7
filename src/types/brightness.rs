// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type.

use std::fmt;

use super::color::clamp;

/// Brightness level as a percentage (1-100).
///
/// Yeelight bulbs do not accept 0 for `set_bright`; turning the light off is a
/// separate power command. Values are clamped on construction.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::Brightness;
///
/// assert_eq!(Brightness::new(75).value(), 75);
/// assert_eq!(Brightness::new(0).value(), 1);
/// assert_eq!(Brightness::new(150).value(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    /// Dimmest setting.
    pub const MIN: Self = Self(1);

    /// Full brightness.
    pub const MAX: Self = Self(100);

    /// Creates a brightness, clamping to 1-100.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(clamp(value, 1, 100))
    }

    /// Returns the brightness percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_clamps() {
        assert_eq!(Brightness::new(0).value(), 1);
        assert_eq!(Brightness::new(50).value(), 50);
        assert_eq!(Brightness::new(255).value(), 100);
    }

    #[test]
    fn brightness_display() {
        assert_eq!(Brightness::new(75).to_string(), "75%");
    }

    #[test]
    fn brightness_ordering() {
        assert!(Brightness::MIN < Brightness::MAX);
    }
}
