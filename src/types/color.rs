// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color types and conversions.
//!
//! Yeelight bulbs take colors either as a packed 24-bit RGB integer
//! (`red * 65536 + green * 256 + blue`), as hue/saturation, or as a color
//! temperature in Kelvin. Everything here is pure arithmetic; out-of-range
//! inputs are pinned to the nearest valid value rather than rejected.

use std::fmt;

use crate::error::ValueError;

/// Pins `value` to the inclusive range `[min, max]`.
///
/// Unlike [`Ord::clamp`] this never panics; if `min > max` the result is `min`.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::clamp;
///
/// assert_eq!(clamp(400, 0, 359), 359);
/// assert_eq!(clamp(-5, 0, 100), 0);
/// assert_eq!(clamp(42, 0, 100), 42);
/// ```
#[must_use]
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Converts a hue/saturation pair at full value to a packed RGB integer.
///
/// The hue is clamped to 0-359 and scaled by 359 (not 360), the saturation is
/// clamped to 0-100. Channels are rounded half-to-even, so results are stable
/// for a given input.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::hsv_to_packed_rgb;
///
/// assert_eq!(hsv_to_packed_rgb(200, 100), 43263);
/// assert_eq!(hsv_to_packed_rgb(0, 0), 0xFF_FF_FF);
/// ```
#[must_use]
pub fn hsv_to_packed_rgb(hue: u16, saturation: u8) -> u32 {
    let h = f64::from(clamp(hue, 0, 359)) / 359.0;
    let s = f64::from(clamp(saturation, 0, 100)) / 100.0;
    let (r, g, b) = hsv_to_rgb(h, s, 1.0);
    RgbColor::new(channel(r), channel(g), channel(b)).packed()
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    // h is in [0, 1], so the sector is in [0, 6]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sector = sector as u8;
    match sector % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(component: f64) -> u8 {
    clamp((component * 255.0).round_ties_even(), 0.0, 255.0) as u8
}

/// An RGB color. Each channel is 0-255 by construction.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::RgbColor;
///
/// let yellow = RgbColor::new(255, 255, 0);
/// assert_eq!(yellow.packed(), 16_776_960);
/// assert_eq!(RgbColor::from_packed(16_776_960), yellow);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Unpacks a 24-bit RGB integer. Bits above 24 are ignored.
    #[must_use]
    pub const fn from_packed(value: u32) -> Self {
        let [_, red, green, blue] = value.to_be_bytes();
        Self { red, green, blue }
    }

    /// Returns the red channel.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green channel.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue channel.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the color as `red * 65536 + green * 256 + blue`.
    #[must_use]
    pub fn packed(&self) -> u32 {
        u32::from(self.red) << 16 | u32::from(self.green) << 8 | u32::from(self.blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// Hue (0-359) and saturation (0-100).
///
/// Values are clamped on construction.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::HsvColor;
///
/// let color = HsvColor::new(400, 120);
/// assert_eq!(color.hue(), 359);
/// assert_eq!(color.saturation(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HsvColor {
    hue: u16,
    saturation: u8,
}

impl HsvColor {
    /// Maximum hue.
    pub const MAX_HUE: u16 = 359;

    /// Maximum saturation.
    pub const MAX_SATURATION: u8 = 100;

    /// Creates a color, clamping hue and saturation to their ranges.
    #[must_use]
    pub fn new(hue: u16, saturation: u8) -> Self {
        Self {
            hue: clamp(hue, 0, Self::MAX_HUE),
            saturation: clamp(saturation, 0, Self::MAX_SATURATION),
        }
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn hue(&self) -> u16 {
        self.hue
    }

    /// Returns the saturation percentage.
    #[must_use]
    pub const fn saturation(&self) -> u8 {
        self.saturation
    }

    /// Returns the packed RGB integer of this color at full value.
    #[must_use]
    pub fn to_packed_rgb(&self) -> u32 {
        hsv_to_packed_rgb(self.hue, self.saturation)
    }
}

/// Color temperature in Kelvin (1700-6500).
///
/// Values are clamped on construction. Individual models support narrower
/// ranges, see [`ModelSpecs`](crate::ModelSpecs).
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::ColorTemperature;
///
/// assert_eq!(ColorTemperature::new(1400).kelvin(), 1700);
/// assert_eq!(ColorTemperature::new(8400).kelvin(), 6500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorTemperature(u16);

impl ColorTemperature {
    /// Lowest temperature the protocol accepts.
    pub const MIN: u16 = 1700;

    /// Highest temperature the protocol accepts.
    pub const MAX: u16 = 6500;

    /// Warm white.
    pub const WARM: Self = Self(2700);

    /// Neutral white.
    pub const NEUTRAL: Self = Self(4000);

    /// Cool daylight.
    pub const COOL: Self = Self(6500);

    /// Creates a color temperature, clamping to 1700-6500 K.
    #[must_use]
    pub fn new(kelvin: u16) -> Self {
        Self(clamp(kelvin, Self::MIN, Self::MAX))
    }

    /// Returns the temperature in Kelvin.
    #[must_use]
    pub const fn kelvin(&self) -> u16 {
        self.0
    }
}

impl Default for ColorTemperature {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for ColorTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.0)
    }
}

/// The color mode reported in the `color_mode` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// RGB color.
    Rgb,
    /// White with a color temperature.
    Temperature,
    /// Hue and saturation.
    Hsv,
}

impl ColorMode {
    /// Returns the numeric code used by the bulb.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Rgb => 1,
            Self::Temperature => 2,
            Self::Hsv => 3,
        }
    }
}

impl TryFrom<u8> for ColorMode {
    type Error = ValueError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Rgb),
            2 => Ok(Self::Temperature),
            3 => Ok(Self::Hsv),
            other => Err(ValueError::InvalidColorMode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_pins_both_ends() {
        assert_eq!(clamp(10, 50, 100), 50);
        assert_eq!(clamp(150, 50, 100), 100);
        assert_eq!(clamp(75, 50, 100), 75);
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
    }

    #[test]
    fn hsv_conversion_matches_reference_values() {
        // hue 200 at full saturation is a sky blue: (0, 168, 255)
        assert_eq!(hsv_to_packed_rgb(200, 100), 43263);
        assert_eq!(hsv_to_packed_rgb(0, 100), 0xFF_00_00);
        assert_eq!(hsv_to_packed_rgb(0, 0), 0xFF_FF_FF);
        assert_eq!(hsv_to_packed_rgb(359, 100), 0xFF_00_00);
    }

    #[test]
    fn hsv_conversion_clamps_inputs() {
        assert_eq!(hsv_to_packed_rgb(1000, 100), hsv_to_packed_rgb(359, 100));
        assert_eq!(hsv_to_packed_rgb(90, 250), hsv_to_packed_rgb(90, 100));
    }

    #[test]
    fn hsv_conversion_stays_within_24_bits_and_is_stable() {
        for hue in (0..=359).step_by(7) {
            for saturation in (0..=100).step_by(9) {
                let first = hsv_to_packed_rgb(hue, saturation);
                assert!(first <= 0xFF_FF_FF);
                assert_eq!(first, hsv_to_packed_rgb(hue, saturation));
            }
        }
    }

    #[test]
    fn rgb_pack_and_unpack() {
        let color = RgbColor::new(255, 255, 0);
        assert_eq!(color.packed(), 16_776_960);
        assert_eq!(RgbColor::new(1, 2, 3).packed(), 65536 + 2 * 256 + 3);
        assert_eq!(RgbColor::from_packed(0xAB_12_34_56), RgbColor::new(0x12, 0x34, 0x56));
        assert_eq!(RgbColor::from_packed(color.packed()), color);
        assert_eq!(color.to_string(), "#FFFF00");
    }

    #[test]
    fn hsv_color_clamps() {
        let color = HsvColor::new(360, 101);
        assert_eq!(color.hue(), 359);
        assert_eq!(color.saturation(), 100);
        assert_eq!(HsvColor::new(200, 100).to_packed_rgb(), 43263);
    }

    #[test]
    fn color_temperature_clamps() {
        assert_eq!(ColorTemperature::new(1400).kelvin(), 1700);
        assert_eq!(ColorTemperature::new(8400).kelvin(), 6500);
        assert_eq!(ColorTemperature::new(3000).kelvin(), 3000);
        assert_eq!(ColorTemperature::WARM.to_string(), "2700K");
    }

    #[test]
    fn color_mode_codes() {
        assert_eq!(ColorMode::try_from(2), Ok(ColorMode::Temperature));
        assert_eq!(ColorMode::Hsv.code(), 3);
        assert_eq!(
            ColorMode::try_from(9),
            Err(ValueError::InvalidColorMode(9))
        );
    }
}
