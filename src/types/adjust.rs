// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Argument types for `set_adjust` and the cron commands.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Direction of a `set_adjust` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjustAction {
    /// Step the property up.
    Increase,
    /// Step the property down.
    Decrease,
    /// Step up, wrapping around to the minimum. The only valid action for
    /// [`AdjustProperty::Color`].
    Circle,
}

impl AdjustAction {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Circle => "circle",
        }
    }
}

impl FromStr for AdjustAction {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            "circle" => Ok(Self::Circle),
            other => Err(ValueError::InvalidAdjust(other.to_string())),
        }
    }
}

impl fmt::Display for AdjustAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Property targeted by a `set_adjust` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjustProperty {
    /// Brightness.
    Bright,
    /// Color temperature.
    Ct,
    /// Color.
    Color,
}

impl AdjustProperty {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bright => "bright",
            Self::Ct => "ct",
            Self::Color => "color",
        }
    }
}

impl FromStr for AdjustProperty {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bright" => Ok(Self::Bright),
            "ct" => Ok(Self::Ct),
            "color" => Ok(Self::Color),
            other => Err(ValueError::InvalidAdjust(other.to_string())),
        }
    }
}

impl fmt::Display for AdjustProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type of a scheduled (cron) job. The bulb only supports a delayed power off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CronType {
    /// Turn the light off after a delay in minutes.
    #[default]
    Off,
}

impl CronType {
    /// Returns the numeric code used by the bulb.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Off => 0,
        }
    }
}
