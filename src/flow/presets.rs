// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ready-made transition lists.
//!
//! ```
//! use yeelight_lib::flow::{Flow, FlowAction, presets};
//!
//! let flow = Flow::new(0, FlowAction::Recover, presets::disco(120));
//! assert_eq!(flow.len(), 8);
//! ```

use super::Transition;

/// Color changes to the beat.
#[must_use]
pub fn disco(bpm: u32) -> Vec<Transition> {
    let duration = 60_000 / bpm.max(1);
    [0, 90, 180, 270]
        .into_iter()
        .flat_map(|hue| {
            [
                Transition::hsv(hue, 100)
                    .with_duration(duration)
                    .with_brightness(100),
                Transition::hsv(hue, 100)
                    .with_duration(duration)
                    .with_brightness(1),
            ]
        })
        .collect()
}

/// Slowly changing color temperature.
#[must_use]
pub fn temp() -> Vec<Transition> {
    vec![
        Transition::temperature(1700).with_duration(40_000),
        Transition::temperature(6500).with_duration(40_000),
    ]
}

/// Rapid flashing on and off.
#[must_use]
pub fn strobe() -> Vec<Transition> {
    vec![
        Transition::hsv(0, 0).with_duration(50).with_brightness(100),
        Transition::hsv(0, 0).with_duration(50).with_brightness(1),
    ]
}

/// Pulses a single color once, for notifications.
#[must_use]
pub fn pulse(red: u8, green: u8, blue: u8, duration: u32) -> Vec<Transition> {
    vec![
        Transition::rgb(red, green, blue).with_duration(duration),
        Transition::rgb(red, green, blue)
            .with_duration(duration)
            .with_brightness(1),
    ]
}
