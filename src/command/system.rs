// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Settings and timer commands.

use serde_json::Value;

use crate::command::{Command, CommandOptions};
use crate::types::CronType;

/// Command to change bulb settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemCommand {
    /// Save the current state as the power-on default.
    SetDefault,
    /// Set the name the bulb reports.
    SetName(String),
}

impl Command for SystemCommand {
    fn method(&self) -> &'static str {
        match self {
            Self::SetDefault => "set_default",
            Self::SetName(_) => "set_name",
        }
    }

    fn params(&self, _options: &CommandOptions) -> Vec<Value> {
        match self {
            Self::SetDefault => Vec::new(),
            Self::SetName(name) => vec![Value::from(name.as_str())],
        }
    }
}

/// Command to manage the bulb's timers.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yeelight_lib::command::{Command, CommandOptions, CronCommand};
/// use yeelight_lib::types::CronType;
///
/// let cmd = CronCommand::Add { kind: CronType::Off, minutes: 10 };
/// assert_eq!(cmd.method(), "cron_add");
/// assert_eq!(cmd.params(&CommandOptions::default()), vec![json!(0), json!(10)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CronCommand {
    /// Schedule a timer.
    Add {
        /// Timer kind.
        kind: CronType,
        /// Minutes until it fires.
        minutes: u32,
    },
    /// Read a timer.
    Get(CronType),
    /// Cancel a timer.
    Delete(CronType),
}

impl Command for CronCommand {
    fn method(&self) -> &'static str {
        match self {
            Self::Add { .. } => "cron_add",
            Self::Get(_) => "cron_get",
            Self::Delete(_) => "cron_del",
        }
    }

    fn params(&self, _options: &CommandOptions) -> Vec<Value> {
        match self {
            Self::Add { kind, minutes } => vec![Value::from(kind.code()), Value::from(*minutes)],
            Self::Get(kind) | Self::Delete(kind) => vec![Value::from(kind.code())],
        }
    }
}
