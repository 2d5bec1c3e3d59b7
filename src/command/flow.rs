// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color flow commands.

use serde_json::Value;

use crate::command::{Command, CommandOptions};
use crate::error::Result;
use crate::flow::Flow;

/// Command to start or stop a color flow.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yeelight_lib::command::{Command, CommandOptions, FlowCommand};
/// use yeelight_lib::flow::{Flow, FlowAction, Transition};
///
/// let flow = Flow::new(2, FlowAction::Off, vec![Transition::temperature(2700)]);
/// let cmd = FlowCommand::Start(flow);
///
/// assert_eq!(cmd.method(), "start_cf");
/// assert_eq!(
///     cmd.params(&CommandOptions::default()),
///     vec![json!(2), json!(2), json!("300, 2, 2700, 100")]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowCommand {
    /// Start a flow.
    Start(Flow),
    /// Stop the running flow.
    Stop,
}

impl Command for FlowCommand {
    fn method(&self) -> &'static str {
        match self {
            Self::Start(_) => "start_cf",
            Self::Stop => "stop_cf",
        }
    }

    fn params(&self, _options: &CommandOptions) -> Vec<Value> {
        match self {
            Self::Start(flow) => vec![
                Value::from(flow.total_count()),
                Value::from(flow.action().code()),
                Value::from(flow.expression()),
            ],
            Self::Stop => Vec::new(),
        }
    }

    fn requires_power(&self) -> bool {
        matches!(self, Self::Start(_))
    }

    fn validate(&self) -> Result<()> {
        if let Self::Start(flow) = self {
            flow.validate()?;
        }
        Ok(())
    }
}
