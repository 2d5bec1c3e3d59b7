// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for bulb control.
//!
//! Out-of-range numbers are clamped rather than rejected, matching what the
//! bulb expects; enumerations parse from their wire strings.
//!
//! # Types
//!
//! - [`RgbColor`], [`HsvColor`], [`ColorTemperature`] - Colors
//! - [`Brightness`] - Brightness level (1-100%)
//! - [`PowerState`], [`PowerMode`] - Power control
//! - [`Effect`] - Smooth or sudden transitions
//! - [`AdjustAction`], [`AdjustProperty`], [`CronType`] - Less common commands

mod adjust;
mod brightness;
mod color;
mod effect;
mod power;

pub use adjust::{AdjustAction, AdjustProperty, CronType};
pub use brightness::Brightness;
pub use color::{ColorMode, ColorTemperature, HsvColor, RgbColor, clamp, hsv_to_packed_rgb};
pub use effect::Effect;
pub use power::{PowerMode, PowerState};
