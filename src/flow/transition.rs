// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single flow steps and their wire encoding.

use crate::types::{ColorTemperature, HsvColor, RgbColor};

/// Shortest duration the bulb accepts for a flow step, in milliseconds.
pub const MIN_DURATION_MS: u32 = 50;

/// Duration used when none is given, in milliseconds.
pub const DEFAULT_DURATION_MS: u32 = 300;

/// Highest brightness a flow step can carry.
pub const MAX_BRIGHTNESS: u8 = 100;

/// What a transition moves the light to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// An RGB color.
    Rgb(RgbColor),
    /// A hue/saturation color, sent to the bulb as RGB.
    Hsv(HsvColor),
    /// A white color temperature.
    Temperature(ColorTemperature),
    /// Hold the current state.
    Sleep,
}

impl TransitionKind {
    /// Returns the mode code of this step kind.
    #[must_use]
    pub const fn mode_code(&self) -> u8 {
        match self {
            Self::Rgb(_) | Self::Hsv(_) => 1,
            Self::Temperature(_) => 2,
            Self::Sleep => 7,
        }
    }
}

/// One step of a [`Flow`](super::Flow).
///
/// Each step encodes to the tuple `[duration, mode, value, brightness]`, with
/// the duration floored at 50 ms and the brightness capped at 100.
///
/// # Examples
///
/// ```
/// use yeelight_lib::flow::Transition;
///
/// let step = Transition::rgb(255, 255, 0).with_duration(10);
/// assert_eq!(step.to_wire(), [50, 1, 16_776_960, 100]);
///
/// let pause = Transition::sleep(400);
/// assert_eq!(pause.to_wire(), [400, 7, 1, 2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    kind: TransitionKind,
    duration: u32,
    brightness: u8,
}

impl Transition {
    /// Brightness carried by sleep steps; the bulb ignores it.
    const SLEEP_BRIGHTNESS: u8 = 2;

    /// Creates a step to an RGB color at full brightness over 300 ms.
    #[must_use]
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(TransitionKind::Rgb(RgbColor::new(red, green, blue)))
    }

    /// Creates a step to a hue/saturation color at full brightness over 300 ms.
    ///
    /// Hue is clamped to 0-359 and saturation to 0-100.
    #[must_use]
    pub fn hsv(hue: u16, saturation: u8) -> Self {
        Self::new(TransitionKind::Hsv(HsvColor::new(hue, saturation)))
    }

    /// Creates a step to a color temperature at full brightness over 300 ms.
    ///
    /// The temperature is clamped to 1700-6500 K.
    #[must_use]
    pub fn temperature(kelvin: u16) -> Self {
        Self::new(TransitionKind::Temperature(ColorTemperature::new(kelvin)))
    }

    /// Creates a pause of `duration` milliseconds.
    #[must_use]
    pub fn sleep(duration: u32) -> Self {
        Self {
            kind: TransitionKind::Sleep,
            duration,
            brightness: Self::SLEEP_BRIGHTNESS,
        }
    }

    fn new(kind: TransitionKind) -> Self {
        Self {
            kind,
            duration: DEFAULT_DURATION_MS,
            brightness: MAX_BRIGHTNESS,
        }
    }

    /// Sets the step duration in milliseconds.
    #[must_use]
    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the brightness to reach at the end of the step.
    ///
    /// Has no effect on sleep steps.
    #[must_use]
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        if self.kind != TransitionKind::Sleep {
            self.brightness = brightness;
        }
        self
    }

    /// Returns what this step moves to.
    #[must_use]
    pub const fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Returns the requested duration, before the 50 ms floor.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Returns the requested brightness, before the cap.
    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Returns the value field: a packed RGB integer, Kelvin, or `1` for sleep.
    #[must_use]
    pub fn value(&self) -> u32 {
        match self.kind {
            TransitionKind::Rgb(color) => color.packed(),
            TransitionKind::Hsv(color) => color.to_packed_rgb(),
            TransitionKind::Temperature(ct) => u32::from(ct.kelvin()),
            TransitionKind::Sleep => 1,
        }
    }

    /// Encodes the step as `[duration, mode, value, brightness]`.
    #[must_use]
    pub fn to_wire(&self) -> [u32; 4] {
        [
            self.duration.max(MIN_DURATION_MS),
            u32::from(self.kind.mode_code()),
            self.value(),
            u32::from(self.brightness.min(MAX_BRIGHTNESS)),
        ]
    }
}
