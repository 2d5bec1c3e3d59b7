// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-model hardware limits.
//!
//! Models differ in the color temperature range they accept and in whether
//! they have a night light. Specs are looked up by the model string a bulb
//! advertises during discovery. When the model is not known, the detected
//! [`BulbType`] picks a representative model instead.

use crate::state::BulbType;

/// Color temperature range and night light support of a bulb model.
///
/// # Examples
///
/// ```
/// use yeelight_lib::ModelSpecs;
///
/// let specs = ModelSpecs::for_model("ceiling3").unwrap();
/// assert_eq!(specs.min_temperature, 2700);
/// assert_eq!(specs.max_temperature, 6000);
/// assert!(specs.night_light);
///
/// assert!(ModelSpecs::for_model("lamp9000").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpecs {
    /// Lowest color temperature in Kelvin.
    pub min_temperature: u16,

    /// Highest color temperature in Kelvin.
    pub max_temperature: u16,

    /// Has a separate night light mode.
    pub night_light: bool,
}

impl ModelSpecs {
    const fn new(min_temperature: u16, max_temperature: u16, night_light: bool) -> Self {
        Self {
            min_temperature,
            max_temperature,
            night_light,
        }
    }

    /// Returns the specs of a known model.
    #[must_use]
    pub fn for_model(model: &str) -> Option<Self> {
        let specs = match model {
            "mono" | "mono1" => Self::new(2700, 2700, false),
            "color" | "color1" | "color2" | "strip1" | "bslamp1" => Self::new(1700, 6500, false),
            "ceiling1" | "ceiling2" | "ceiling4" => Self::new(2700, 6500, true),
            "ceiling3" => Self::new(2700, 6000, true),
            _ => return None,
        };
        Some(specs)
    }

    /// Returns the specs of a known model, falling back to a representative
    /// model for the detected bulb type.
    #[must_use]
    pub fn resolve(model: Option<&str>, bulb_type: BulbType) -> Self {
        if let Some(specs) = model.and_then(Self::for_model) {
            return specs;
        }
        let fallback = match bulb_type {
            BulbType::White => "mono",
            BulbType::WhiteTemp => "ceiling1",
            BulbType::Color | BulbType::WhiteTempMood | BulbType::Unknown => "color",
        };
        tracing::trace!(?model, fallback, "Using fallback model specs");
        Self::for_model(fallback).unwrap_or_default()
    }

    /// Returns `true` if the model can change its color temperature.
    #[must_use]
    pub const fn has_adjustable_temperature(&self) -> bool {
        self.min_temperature < self.max_temperature
    }
}

impl Default for ModelSpecs {
    fn default() -> Self {
        Self::new(1700, 6500, false)
    }
}
