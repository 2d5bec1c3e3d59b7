// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transition effect type.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// How the bulb moves to a new state.
///
/// With `Sudden` the bulb ignores the duration parameter.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::Effect;
///
/// assert_eq!(Effect::default(), Effect::Smooth);
/// assert_eq!("sudden".parse::<Effect>().unwrap(), Effect::Sudden);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Effect {
    /// Gradual change over the given duration.
    #[default]
    Smooth,
    /// Immediate change.
    Sudden,
}

impl Effect {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Sudden => "sudden",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Effect {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smooth" => Ok(Self::Smooth),
            "sudden" => Ok(Self::Sudden),
            _ => Err(ValueError::InvalidEffect(s.to_string())),
        }
    }
}
