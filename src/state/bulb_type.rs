// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb classification from reported properties.

use super::{PropertyCache, PropertyValue};

/// The kind of bulb, inferred from which color properties it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BulbType {
    /// Properties have not been fetched yet.
    #[default]
    Unknown,
    /// Monochrome white bulb.
    White,
    /// Full color bulb.
    Color,
    /// White bulb with adjustable color temperature.
    WhiteTemp,
    /// White bulb with adjustable color temperature and a background
    /// (mood) light.
    WhiteTempMood,
}

impl BulbType {
    pub(crate) fn detect(cache: &PropertyCache) -> Self {
        let (Some(rgb), Some(ct)) = (cache.get("rgb"), cache.get("ct")) else {
            return Self::Unknown;
        };

        if rgb.is_inapplicable() && !ct.is_inapplicable() {
            let has_background = cache
                .get("bg_power")
                .is_some_and(|bg| !bg.is_inapplicable());
            return if has_background {
                Self::WhiteTempMood
            } else {
                Self::WhiteTemp
            };
        }

        let all_inapplicable = ["ct", "rgb", "hue", "sat"]
            .iter()
            .all(|name| cache.get(name).is_some_and(PropertyValue::is_inapplicable));
        if all_inapplicable {
            Self::White
        } else {
            Self::Color
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn cache_with(pairs: &[(&str, Value)]) -> PropertyCache {
        let names: Vec<String> = pairs.iter().map(|(n, _)| (*n).to_string()).collect();
        let values = pairs.iter().map(|(_, v)| v.clone()).collect();
        let mut cache = PropertyCache::new();
        cache.replace_from_query(&names, values);
        cache
    }

    #[test]
    fn unknown_before_query() {
        assert_eq!(PropertyCache::new().bulb_type(), BulbType::Unknown);
        assert_eq!(cache_with(&[("power", json!("on"))]).bulb_type(), BulbType::Unknown);
    }

    #[test]
    fn color_bulb() {
        let cache = cache_with(&[
            ("ct", json!("4000")),
            ("rgb", json!("255")),
            ("hue", json!("0")),
            ("sat", json!("100")),
        ]);
        assert_eq!(cache.bulb_type(), BulbType::Color);
    }

    #[test]
    fn white_bulb() {
        let cache = cache_with(&[
            ("ct", json!("")),
            ("rgb", json!("")),
            ("hue", json!("")),
            ("sat", json!("")),
        ]);
        assert_eq!(cache.bulb_type(), BulbType::White);
    }

    #[test]
    fn white_temperature_bulbs() {
        let plain = cache_with(&[("ct", json!("2700")), ("rgb", json!(""))]);
        assert_eq!(plain.bulb_type(), BulbType::WhiteTemp);

        let mood = cache_with(&[
            ("ct", json!("2700")),
            ("rgb", json!("")),
            ("bg_power", json!("off")),
        ]);
        assert_eq!(mood.bulb_type(), BulbType::WhiteTempMood);
    }
}
