// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power-related types.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Power state of the light, as sent in `set_power` and reported in the
/// `power` property.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "on");
/// assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// The light is off.
    Off,
    /// The light is on.
    On,
}

impl PowerState {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns the opposite state.
    #[must_use]
    pub const fn toggled(&self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "0" | "false" => Ok(Self::Off),
            "on" | "1" | "true" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

/// The mode the light enters when it is turned on.
///
/// `Last` keeps whatever mode the light was in; it is the default and is
/// never sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerMode {
    /// Restore the previous mode.
    #[default]
    Last,
    /// Normal white light.
    Normal,
    /// RGB mode.
    Rgb,
    /// HSV mode.
    Hsv,
    /// Color flow mode.
    ColorFlow,
    /// Night light (moonlight) mode, on ceiling lights.
    Moonlight,
}

impl PowerMode {
    /// Returns the numeric code appended to `set_power`.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Last => 0,
            Self::Normal => 1,
            Self::Rgb => 2,
            Self::Hsv => 3,
            Self::ColorFlow => 4,
            Self::Moonlight => 5,
        }
    }
}

impl TryFrom<u8> for PowerMode {
    type Error = ValueError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Last),
            1 => Ok(Self::Normal),
            2 => Ok(Self::Rgb),
            3 => Ok(Self::Hsv),
            4 => Ok(Self::ColorFlow),
            5 => Ok(Self::Moonlight),
            other => Err(ValueError::InvalidPowerMode(other)),
        }
    }
}
