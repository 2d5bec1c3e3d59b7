// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power control commands.

use serde_json::Value;

use crate::command::{Command, CommandOptions};
use crate::types::PowerState;

/// Command to switch the light on or off.
///
/// Turning on uses the [`PowerMode`](crate::types::PowerMode) from the
/// [`CommandOptions`] it is sent with.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yeelight_lib::command::{Command, CommandOptions, PowerCommand};
///
/// let cmd = PowerCommand::On;
/// assert_eq!(cmd.method(), "set_power");
/// assert_eq!(cmd.params(&CommandOptions::default()), vec![json!("on")]);
///
/// assert_eq!(PowerCommand::Toggle.method(), "toggle");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Turn the light on.
    On,
    /// Turn the light off.
    Off,
    /// Flip the power state.
    Toggle,
}

impl PowerCommand {
    /// Creates the command that sets `state`.
    #[must_use]
    pub const fn set(state: PowerState) -> Self {
        match state {
            PowerState::On => Self::On,
            PowerState::Off => Self::Off,
        }
    }
}

impl Command for PowerCommand {
    fn method(&self) -> &'static str {
        match self {
            Self::On | Self::Off => "set_power",
            Self::Toggle => "toggle",
        }
    }

    fn params(&self, _options: &CommandOptions) -> Vec<Value> {
        match self {
            Self::On => vec![Value::from(PowerState::On.as_str())],
            Self::Off => vec![Value::from(PowerState::Off.as_str())],
            Self::Toggle => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Request;
    use crate::types::PowerMode;
    use serde_json::json;

    #[test]
    fn power_requests() {
        let options = CommandOptions::default();
        assert_eq!(
            Request::build(&PowerCommand::Off, &options).params,
            vec![json!("off"), json!("smooth"), json!(300)]
        );
        assert_eq!(
            Request::build(&PowerCommand::Toggle, &options).params,
            vec![json!("smooth"), json!(300)]
        );
    }

    #[test]
    fn turn_on_in_mode() {
        let options = CommandOptions::default().with_power_mode(PowerMode::Rgb);
        assert_eq!(
            Request::build(&PowerCommand::set(PowerState::On), &options).params,
            vec![json!("on"), json!("smooth"), json!(300), json!(2)]
        );
    }

    #[test]
    fn power_does_not_require_power() {
        assert!(!PowerCommand::On.requires_power());
        assert!(!PowerCommand::Toggle.requires_power());
    }
}
