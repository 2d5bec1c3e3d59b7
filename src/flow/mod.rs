// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color flows: sequences of timed transitions run by the bulb itself.
//!
//! A [`Flow`] is sent as one `start_cf` command with three parameters: the
//! total number of steps to run (`count * transitions`, 0 for forever), the
//! [`FlowAction`] to take when it ends, and the flow expression, which is every
//! transition's `[duration, mode, value, brightness]` tuple joined with `", "`.
//!
//! # Examples
//!
//! ```
//! use yeelight_lib::flow::{Flow, FlowAction, Transition};
//!
//! let flow = Flow::builder()
//!     .count(3)
//!     .action(FlowAction::Recover)
//!     .transition(Transition::rgb(255, 0, 0).with_duration(500))
//!     .transition(Transition::sleep(400))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(flow.total_count(), 6);
//! assert_eq!(flow.expression(), "500, 1, 16711680, 100, 400, 7, 1, 2");
//! ```

pub mod presets;
mod transition;

pub use transition::{
    DEFAULT_DURATION_MS, MAX_BRIGHTNESS, MIN_DURATION_MS, Transition, TransitionKind,
};

use std::fmt;

use crate::error::{DeviceError, ValueError};

/// Number of transitions the bulb is documented to handle in one flow.
///
/// Longer flows are sent anyway but often fail on the device.
pub const MAX_RECOMMENDED_TRANSITIONS: usize = 9;

/// What the bulb does after a flow ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowAction {
    /// Go back to the state before the flow.
    #[default]
    Recover,
    /// Stay at the last step.
    Stay,
    /// Turn the light off.
    Off,
}

impl FlowAction {
    /// Returns the numeric code used in `start_cf`.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Recover => 0,
            Self::Stay => 1,
            Self::Off => 2,
        }
    }
}

impl TryFrom<u8> for FlowAction {
    type Error = ValueError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Recover),
            1 => Ok(Self::Stay),
            2 => Ok(Self::Off),
            other => Err(ValueError::InvalidFlowAction(other)),
        }
    }
}

/// Joins the wire tuples of `transitions`, in order, with `", "`.
///
/// # Examples
///
/// ```
/// use yeelight_lib::flow::{Transition, build_expression};
///
/// let expr = build_expression(&[Transition::rgb(255, 255, 0), Transition::sleep(400)]);
/// assert_eq!(expr, "300, 1, 16776960, 100, 400, 7, 1, 2");
/// ```
#[must_use]
pub fn build_expression(transitions: &[Transition]) -> String {
    transitions
        .iter()
        .flat_map(Transition::to_wire)
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A complete flow: transitions, a repeat count and a final action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Flow {
    count: u32,
    action: FlowAction,
    transitions: Vec<Transition>,
}

impl Flow {
    /// Creates a flow. A `count` of 0 repeats forever.
    #[must_use]
    pub fn new(count: u32, action: FlowAction, transitions: Vec<Transition>) -> Self {
        Self {
            count,
            action,
            transitions,
        }
    }

    /// Creates a new flow builder.
    #[must_use]
    pub fn builder() -> FlowBuilder {
        FlowBuilder::default()
    }

    /// Returns how many times the transitions are run (0 = forever).
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Returns the action taken after the flow ends.
    #[must_use]
    pub const fn action(&self) -> FlowAction {
        self.action
    }

    /// Returns the transitions.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns the number of transitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if the flow has no transitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Returns the step count sent to the bulb: `count * transitions`.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        let steps = u32::try_from(self.transitions.len()).unwrap_or(u32::MAX);
        self.count.saturating_mul(steps)
    }

    /// Returns the flow expression.
    #[must_use]
    pub fn expression(&self) -> String {
        build_expression(&self.transitions)
    }

    /// Checks that the flow can be sent.
    ///
    /// More than [`MAX_RECOMMENDED_TRANSITIONS`] steps is only logged.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidFlow` if the flow has no transitions.
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.transitions.is_empty() {
            return Err(DeviceError::InvalidFlow(
                "flow has no transitions".to_string(),
            ));
        }
        if self.transitions.len() > MAX_RECOMMENDED_TRANSITIONS {
            tracing::warn!(
                transitions = self.transitions.len(),
                max = MAX_RECOMMENDED_TRANSITIONS,
                "Flow is longer than the bulb supports and will likely fail"
            );
        }
        Ok(())
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Flow(count={}, action={:?}, transitions={})",
            self.count,
            self.action,
            self.transitions.len()
        )
    }
}

/// Builder for [`Flow`].
#[derive(Debug, Clone, Default)]
pub struct FlowBuilder {
    count: u32,
    action: FlowAction,
    transitions: Vec<Transition>,
}

impl FlowBuilder {
    /// Sets how many times the transitions run (0 = forever, the default).
    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Sets the action taken when the flow ends.
    #[must_use]
    pub fn action(mut self, action: FlowAction) -> Self {
        self.action = action;
        self
    }

    /// Appends a transition.
    #[must_use]
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Appends several transitions.
    #[must_use]
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Returns the number of transitions added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if no transitions were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Builds the flow.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidFlow` if no transitions were added.
    pub fn build(self) -> Result<Flow, DeviceError> {
        let flow = Flow::new(self.count, self.action, self.transitions);
        flow.validate()?;
        Ok(flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_joins_each_tuple_in_order() {
        let rgb = Transition::rgb(255, 255, 0).with_duration(300);
        let sleep = Transition::sleep(400);
        let expected = rgb
            .to_wire()
            .iter()
            .chain(sleep.to_wire().iter())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        assert_eq!(build_expression(&[rgb, sleep]), expected);
        assert_eq!(expected, "300, 1, 16776960, 100, 400, 7, 1, 2");
    }

    #[test]
    fn empty_expression() {
        assert_eq!(build_expression(&[]), "");
    }

    #[test]
    fn total_count_multiplies_by_transitions() {
        let flow = Flow::new(
            3,
            FlowAction::Stay,
            vec![Transition::temperature(1700), Transition::temperature(6500)],
        );
        assert_eq!(flow.total_count(), 6);

        let forever = Flow::new(0, FlowAction::Stay, vec![Transition::sleep(100)]);
        assert_eq!(forever.total_count(), 0);
    }

    #[test]
    fn builder_rejects_empty_flow() {
        let result = Flow::builder().count(1).build();
        assert!(matches!(result, Err(DeviceError::InvalidFlow(_))));
    }

    #[test]
    fn long_flows_are_accepted() {
        let flow = Flow::builder()
            .transitions((0..12).map(|i| Transition::hsv(i * 30, 100)))
            .build()
            .unwrap();
        assert_eq!(flow.len(), 12);
    }

    #[test]
    fn action_codes() {
        assert_eq!(FlowAction::Recover.code(), 0);
        assert_eq!(FlowAction::Stay.code(), 1);
        assert_eq!(FlowAction::Off.code(), 2);
        assert_eq!(FlowAction::try_from(2), Ok(FlowAction::Off));
        assert!(FlowAction::try_from(3).is_err());
    }
}
