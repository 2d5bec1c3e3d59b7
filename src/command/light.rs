// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light control commands.
//!
//! Color, temperature and brightness commands only take effect while the
//! light is on, so they report [`Command::requires_power`].

use serde_json::Value;

use crate::command::{Command, CommandOptions};
use crate::flow::{MIN_DURATION_MS, Transition, build_expression};
use crate::types::{
    AdjustAction, AdjustProperty, Brightness, ColorTemperature, Effect, HsvColor, RgbColor, clamp,
};

/// Command to set a white color temperature.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yeelight_lib::command::{Command, CommandOptions, ColorTemperatureCommand};
/// use yeelight_lib::types::ColorTemperature;
///
/// let cmd = ColorTemperatureCommand(ColorTemperature::new(8400));
/// assert_eq!(cmd.method(), "set_ct_abx");
/// assert_eq!(cmd.params(&CommandOptions::default()), vec![json!(6500)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTemperatureCommand(pub ColorTemperature);

impl Command for ColorTemperatureCommand {
    fn method(&self) -> &'static str {
        "set_ct_abx"
    }

    fn params(&self, _options: &CommandOptions) -> Vec<Value> {
        vec![Value::from(self.0.kelvin())]
    }

    fn requires_power(&self) -> bool {
        true
    }
}

/// Command to set an RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbCommand(pub RgbColor);

impl Command for RgbCommand {
    fn method(&self) -> &'static str {
        "set_rgb"
    }

    fn params(&self, _options: &CommandOptions) -> Vec<Value> {
        vec![Value::from(self.0.packed())]
    }

    fn requires_power(&self) -> bool {
        true
    }
}

/// Command to set a hue/saturation color, optionally with a brightness.
///
/// Without a value this is a plain `set_hsv`, which keeps the current
/// brightness. With a value it becomes a one-step flow to the equivalent RGB
/// color at that brightness, because `set_hsv` has no brightness parameter.
/// The flow step lasts the option duration, or 50 ms for a sudden effect.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yeelight_lib::command::{Command, CommandOptions, HsvCommand};
/// use yeelight_lib::types::{Effect, HsvColor};
///
/// let plain = HsvCommand::new(HsvColor::new(200, 100));
/// assert_eq!(plain.method(), "set_hsv");
///
/// let with_value = HsvCommand::new(HsvColor::new(200, 100)).with_value(10);
/// let options = CommandOptions::default().with_effect(Effect::Sudden);
/// assert_eq!(with_value.method(), "start_cf");
/// assert_eq!(
///     with_value.params(&options),
///     vec![json!(1), json!(1), json!("50, 1, 43263, 10")]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvCommand {
    color: HsvColor,
    value: Option<u8>,
}

impl HsvCommand {
    /// Creates a command that keeps the current brightness.
    #[must_use]
    pub const fn new(color: HsvColor) -> Self {
        Self { color, value: None }
    }

    /// Also sets the brightness (clamped to 0-100).
    #[must_use]
    pub fn with_value(mut self, value: u8) -> Self {
        self.value = Some(clamp(value, 0, 100));
        self
    }

    /// Returns the color.
    #[must_use]
    pub const fn color(&self) -> HsvColor {
        self.color
    }

    /// Returns the brightness, if one is set.
    #[must_use]
    pub const fn value(&self) -> Option<u8> {
        self.value
    }
}

impl Command for HsvCommand {
    fn method(&self) -> &'static str {
        if self.value.is_some() {
            "start_cf"
        } else {
            "set_hsv"
        }
    }

    fn params(&self, options: &CommandOptions) -> Vec<Value> {
        let Some(value) = self.value else {
            return vec![
                Value::from(self.color.hue()),
                Value::from(self.color.saturation()),
            ];
        };

        let duration = match options.effect() {
            Effect::Sudden => MIN_DURATION_MS,
            Effect::Smooth => options.duration(),
        };
        let step = Transition::hsv(self.color.hue(), self.color.saturation())
            .with_duration(duration)
            .with_brightness(value);

        vec![
            Value::from(1),
            Value::from(1),
            Value::from(build_expression(&[step])),
        ]
    }

    fn requires_power(&self) -> bool {
        true
    }
}

/// Command to set the brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessCommand(pub Brightness);

impl Command for BrightnessCommand {
    fn method(&self) -> &'static str {
        "set_bright"
    }

    fn params(&self, _options: &CommandOptions) -> Vec<Value> {
        vec![Value::from(self.0.value())]
    }

    fn requires_power(&self) -> bool {
        true
    }
}

/// Command to nudge a property without knowing its current value.
///
/// The bulb only supports [`AdjustAction::Circle`] for
/// [`AdjustProperty::Color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustCommand {
    /// Direction of the change.
    pub action: AdjustAction,
    /// Property to change.
    pub property: AdjustProperty,
}

impl Command for AdjustCommand {
    fn method(&self) -> &'static str {
        "set_adjust"
    }

    fn params(&self, _options: &CommandOptions) -> Vec<Value> {
        vec![
            Value::from(self.action.as_str()),
            Value::from(self.property.as_str()),
        ]
    }
}
