// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property names, values and changes.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ValueError;

/// A named property of the bulb that can be queried with `get_prop`.
///
/// # Examples
///
/// ```
/// use yeelight_lib::state::Property;
///
/// assert_eq!(Property::Bright.as_str(), "bright");
/// assert_eq!("color_mode".parse::<Property>().unwrap(), Property::ColorMode);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// `on` or `off`.
    Power,
    /// Brightness percentage.
    Bright,
    /// Color temperature in Kelvin.
    Ct,
    /// Packed RGB color.
    Rgb,
    /// Hue.
    Hue,
    /// Saturation.
    Sat,
    /// 1 = RGB, 2 = color temperature, 3 = HSV.
    ColorMode,
    /// 1 while a flow is running.
    Flowing,
    /// Minutes left before a scheduled power off.
    DelayOff,
    /// 1 while music mode is on.
    MusicOn,
    /// User-assigned name.
    Name,
    /// Night light brightness.
    NightLightBright,
    /// 1 while in night light mode.
    ActiveMode,
    /// Parameters of the running flow.
    FlowParams,
    /// Background light power.
    BgPower,
    /// Background light brightness.
    BgBright,
    /// Background light color temperature.
    BgCt,
    /// Background light RGB color.
    BgRgb,
    /// Background light hue.
    BgHue,
    /// Background light saturation.
    BgSat,
}

impl Property {
    /// Properties fetched by a plain [`Bulb::get_properties`](crate::Bulb::get_properties).
    pub const DEFAULT_QUERY: &'static [Self] = &[
        Self::Power,
        Self::Bright,
        Self::Ct,
        Self::Rgb,
        Self::Hue,
        Self::Sat,
        Self::ColorMode,
        Self::Flowing,
        Self::DelayOff,
        Self::MusicOn,
        Self::Name,
        Self::NightLightBright,
        Self::ActiveMode,
        Self::BgPower,
    ];

    /// Returns the property key used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Bright => "bright",
            Self::Ct => "ct",
            Self::Rgb => "rgb",
            Self::Hue => "hue",
            Self::Sat => "sat",
            Self::ColorMode => "color_mode",
            Self::Flowing => "flowing",
            Self::DelayOff => "delayoff",
            Self::MusicOn => "music_on",
            Self::Name => "name",
            Self::NightLightBright => "nl_br",
            Self::ActiveMode => "active_mode",
            Self::FlowParams => "flow_params",
            Self::BgPower => "bg_power",
            Self::BgBright => "bg_bright",
            Self::BgCt => "bg_ct",
            Self::BgRgb => "bg_rgb",
            Self::BgHue => "bg_hue",
            Self::BgSat => "bg_sat",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let property = match s {
            "power" => Self::Power,
            "bright" => Self::Bright,
            "ct" => Self::Ct,
            "rgb" => Self::Rgb,
            "hue" => Self::Hue,
            "sat" => Self::Sat,
            "color_mode" => Self::ColorMode,
            "flowing" => Self::Flowing,
            "delayoff" => Self::DelayOff,
            "music_on" => Self::MusicOn,
            "name" => Self::Name,
            "nl_br" => Self::NightLightBright,
            "active_mode" => Self::ActiveMode,
            "flow_params" => Self::FlowParams,
            "bg_power" => Self::BgPower,
            "bg_bright" => Self::BgBright,
            "bg_ct" => Self::BgCt,
            "bg_rgb" => Self::BgRgb,
            "bg_hue" => Self::BgHue,
            "bg_sat" => Self::BgSat,
            other => return Err(ValueError::InvalidProperty(other.to_string())),
        };
        Ok(property)
    }
}

/// A cached property value.
///
/// A property that was never seen is simply absent from the cache. A property
/// the bulb reported as empty (for example `rgb` while in color temperature
/// mode) is kept as [`PropertyValue::Inapplicable`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// The bulb reported the property as empty or null.
    Inapplicable,
    /// A reported or predicted value.
    Known(Value),
}

impl PropertyValue {
    /// Normalizes a raw value from the bulb: `null` and `""` become
    /// [`PropertyValue::Inapplicable`].
    #[must_use]
    pub fn from_device(value: Value) -> Self {
        match value {
            Value::Null => Self::Inapplicable,
            Value::String(s) if s.is_empty() => Self::Inapplicable,
            other => Self::Known(other),
        }
    }

    /// Returns `true` for [`PropertyValue::Inapplicable`].
    #[must_use]
    pub fn is_inapplicable(&self) -> bool {
        matches!(self, Self::Inapplicable)
    }

    /// Returns the raw value, if known.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Known(value) => Some(value),
            Self::Inapplicable => None,
        }
    }

    /// Returns the value as a string slice, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Returns the value as an integer.
    ///
    /// `get_prop` reports numbers as strings while notifications use JSON
    /// numbers; both are accepted.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self.as_value()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inapplicable => f.write_str("n/a"),
            Self::Known(Value::String(s)) => f.write_str(s),
            Self::Known(other) => write!(f, "{other}"),
        }
    }
}

/// Where a cached value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertySource {
    /// Returned by an explicit `get_prop` query.
    Queried,
    /// Pushed by the bulb in a `props` notification.
    Notified,
    /// Inferred locally from a command sent in music mode.
    Predicted,
}

/// A property whose cached value changed.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    /// The property key.
    pub name: String,
    /// The new value.
    pub value: PropertyValue,
    /// What caused the change.
    pub source: PropertySource,
}
