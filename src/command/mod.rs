// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb command definitions.
//!
//! Each command is a typed value that knows its method name and base
//! parameters. Turning it into a wire request is a two-stage, I/O-free
//! process:
//!
//! 1. [`Command::params`] produces the base parameters
//! 2. [`decorate`] appends the transition effect and duration for the methods
//!    that change what the light shows, plus the power mode for `set_power`
//!
//! # Available Commands
//!
//! | Command Type | Method(s) |
//! |-------------|---------|
//! | [`PowerCommand`] | `set_power`, `toggle` |
//! | [`ColorTemperatureCommand`] | `set_ct_abx` |
//! | [`RgbCommand`] | `set_rgb` |
//! | [`HsvCommand`] | `set_hsv`, or `start_cf` when a value is given |
//! | [`BrightnessCommand`] | `set_bright` |
//! | [`AdjustCommand`] | `set_adjust` |
//! | [`FlowCommand`] | `start_cf`, `stop_cf` |
//! | [`SystemCommand`] | `set_default`, `set_name` |
//! | [`CronCommand`] | `cron_add`, `cron_get`, `cron_del` |
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use yeelight_lib::command::{CommandOptions, Request, RgbCommand};
//! use yeelight_lib::types::RgbColor;
//!
//! let cmd = RgbCommand(RgbColor::new(255, 255, 0));
//! let request = Request::build(&cmd, &CommandOptions::default());
//!
//! assert_eq!(request.method, "set_rgb");
//! assert_eq!(request.params, vec![json!(16_776_960), json!("smooth"), json!(300)]);
//! ```

mod flow;
mod light;
mod power;
mod system;

pub use flow::FlowCommand;
pub use light::{
    AdjustCommand, BrightnessCommand, ColorTemperatureCommand, HsvCommand, RgbCommand,
};
pub use power::PowerCommand;
pub use system::{CronCommand, SystemCommand};

use serde_json::Value;

use crate::error::Result;
use crate::flow::DEFAULT_DURATION_MS;
use crate::types::{Effect, PowerMode};

/// Methods that take the `[effect, duration]` suffix.
pub const EFFECT_METHODS: &[&str] = &[
    "set_ct_abx",
    "set_rgb",
    "set_hsv",
    "set_bright",
    "set_power",
    "toggle",
];

/// Per-call transition settings.
///
/// # Examples
///
/// ```
/// use yeelight_lib::command::CommandOptions;
/// use yeelight_lib::types::Effect;
///
/// let options = CommandOptions::default()
///     .with_effect(Effect::Sudden)
///     .with_duration(1000);
/// assert_eq!(options.effect(), Effect::Sudden);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    effect: Effect,
    duration: u32,
    power_mode: PowerMode,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            effect: Effect::Smooth,
            duration: DEFAULT_DURATION_MS,
            power_mode: PowerMode::Last,
        }
    }
}

impl CommandOptions {
    /// Sets the transition effect.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    /// Sets the transition duration in milliseconds.
    #[must_use]
    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the mode used when turning the light on.
    #[must_use]
    pub fn with_power_mode(mut self, power_mode: PowerMode) -> Self {
        self.power_mode = power_mode;
        self
    }

    /// Returns the transition effect.
    #[must_use]
    pub const fn effect(&self) -> Effect {
        self.effect
    }

    /// Returns the transition duration in milliseconds.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Returns the power mode.
    #[must_use]
    pub const fn power_mode(&self) -> PowerMode {
        self.power_mode
    }
}

/// A command that can be sent to a bulb.
pub trait Command {
    /// Returns the method name.
    fn method(&self) -> &'static str;

    /// Returns the parameters before decoration.
    ///
    /// Most commands ignore `options`; it is passed for the ones whose
    /// encoding depends on the effect or duration.
    fn params(&self, options: &CommandOptions) -> Vec<Value>;

    /// Returns `true` if the light must be on for the command to take effect.
    fn requires_power(&self) -> bool {
        false
    }

    /// Checks arguments that cannot be enforced by construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the command must not be sent.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A method name with its final parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Method name.
    pub method: &'static str,
    /// Parameters, including any decoration.
    pub params: Vec<Value>,
}

impl Request {
    /// Builds and decorates the request for a command.
    #[must_use]
    pub fn build<C: Command + ?Sized>(command: &C, options: &CommandOptions) -> Self {
        let method = command.method();
        let params = decorate(method, command.params(options), options);
        Self { method, params }
    }
}

/// Appends the effect decoration to `params` if `method` takes it.
///
/// For `set_power` with `"on"` and a power mode other than
/// [`PowerMode::Last`], the mode code is appended after the duration.
#[must_use]
pub fn decorate(method: &str, mut params: Vec<Value>, options: &CommandOptions) -> Vec<Value> {
    if !EFFECT_METHODS.contains(&method) {
        return params;
    }

    params.push(Value::from(options.effect.as_str()));
    params.push(Value::from(options.duration));

    let turning_on = method == "set_power" && params.first().and_then(Value::as_str) == Some("on");
    if turning_on && options.power_mode != PowerMode::Last {
        params.push(Value::from(options.power_mode.code()));
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decorates_state_methods_only() {
        let options = CommandOptions::default();
        assert_eq!(
            decorate("toggle", Vec::new(), &options),
            vec![json!("smooth"), json!(300)]
        );
        assert_eq!(
            decorate("set_name", vec![json!("desk")], &options),
            vec![json!("desk")]
        );
        assert!(decorate("stop_cf", Vec::new(), &options).is_empty());
    }

    #[test]
    fn power_mode_appended_only_when_turning_on() {
        let options = CommandOptions::default().with_power_mode(PowerMode::Moonlight);
        assert_eq!(
            decorate("set_power", vec![json!("on")], &options),
            vec![json!("on"), json!("smooth"), json!(300), json!(5)]
        );
        assert_eq!(
            decorate("set_power", vec![json!("off")], &options),
            vec![json!("off"), json!("smooth"), json!(300)]
        );

        let last = CommandOptions::default();
        assert_eq!(decorate("set_power", vec![json!("on")], &last).len(), 3);
    }

    #[test]
    fn options_override_defaults() {
        let options = CommandOptions::default()
            .with_effect(Effect::Sudden)
            .with_duration(1000);
        assert_eq!(
            decorate("set_bright", vec![json!(10)], &options),
            vec![json!(10), json!("sudden"), json!(1000)]
        );
    }
}
