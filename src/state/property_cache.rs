// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last known bulb properties.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::types::{ColorMode, ColorTemperature, HsvColor, PowerState, RgbColor};

use super::{BulbType, PropertyChange, PropertySource, PropertyValue};

/// Methods whose parameters are mirrored into the cache while in music mode,
/// with the property each leading parameter sets.
const PREDICTED_PROPERTIES: &[(&str, &[&str])] = &[
    ("set_ct_abx", &["ct"]),
    ("set_rgb", &["rgb"]),
    ("set_hsv", &["hue", "sat"]),
    ("set_bright", &["bright"]),
    ("set_power", &["power"]),
];

/// A cached value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedProperty {
    /// The value.
    pub value: PropertyValue,
    /// Its provenance.
    pub source: PropertySource,
}

/// The last properties seen for a bulb.
///
/// The cache changes through exactly three entry points, one per
/// [`PropertySource`]:
///
/// - [`replace_from_query`](Self::replace_from_query) overwrites everything
///   with the result of `get_prop`
/// - [`merge_notification`](Self::merge_notification) updates only the keys a
///   `props` notification carries
/// - [`predict`](Self::predict) mirrors commands sent in music mode, where the
///   bulb neither answers nor notifies
///
/// Each returns the properties whose value actually changed.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yeelight_lib::state::PropertyCache;
///
/// let mut cache = PropertyCache::new();
/// assert!(!cache.is_powered_on());
///
/// let names = vec!["power".to_string(), "bright".to_string()];
/// cache.replace_from_query(&names, vec![json!("on"), json!("80")]);
/// assert!(cache.is_powered_on());
/// assert_eq!(cache.brightness(), Some(80));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyCache {
    entries: BTreeMap<String, CachedProperty>,
}

impl PropertyCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the property has been seen, even as inapplicable.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns a cached value. `None` means the property was never seen.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.get(name).map(|entry| &entry.value)
    }

    /// Returns a cached value with its provenance.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&CachedProperty> {
        self.entries.get(name)
    }

    /// Iterates over all cached properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CachedProperty)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    // ========== Mutation ==========

    /// Replaces the whole cache with a `get_prop` result.
    ///
    /// `values` is positionally aligned with `names`; extra entries on either
    /// side are ignored. Empty values are stored as inapplicable.
    pub fn replace_from_query(&mut self, names: &[String], values: Vec<Value>) -> Vec<PropertyChange> {
        let previous = std::mem::take(&mut self.entries);
        let mut changes = Vec::new();

        for (name, raw) in names.iter().zip(values) {
            let value = PropertyValue::from_device(raw);
            if previous.get(name).map(|entry| &entry.value) != Some(&value) {
                changes.push(PropertyChange {
                    name: name.clone(),
                    value: value.clone(),
                    source: PropertySource::Queried,
                });
            }
            self.entries.insert(
                name.clone(),
                CachedProperty {
                    value,
                    source: PropertySource::Queried,
                },
            );
        }

        changes
    }

    /// Merges the `params` of a `props` notification, leaving other keys alone.
    pub fn merge_notification(&mut self, params: &Map<String, Value>) -> Vec<PropertyChange> {
        params
            .iter()
            .filter_map(|(name, raw)| {
                self.set(
                    name,
                    PropertyValue::from_device(raw.clone()),
                    PropertySource::Notified,
                )
            })
            .collect()
    }

    /// Mirrors a command sent in music mode into the cache.
    ///
    /// `toggle` flips the cached power (an unknown power becomes `off`);
    /// other state-changing methods copy their leading parameters. Any other
    /// method leaves the cache untouched.
    pub fn predict(&mut self, method: &str, params: &[Value]) -> Vec<PropertyChange> {
        if method == "toggle" {
            let next = if self.power() == Some(PowerState::Off) {
                PowerState::On
            } else {
                PowerState::Off
            };
            return self
                .set(
                    "power",
                    PropertyValue::Known(Value::from(next.as_str())),
                    PropertySource::Predicted,
                )
                .into_iter()
                .collect();
        }

        let Some((_, names)) = PREDICTED_PROPERTIES.iter().find(|(m, _)| *m == method) else {
            return Vec::new();
        };

        let changes: Vec<PropertyChange> = names
            .iter()
            .zip(params)
            .filter_map(|(name, value)| {
                self.set(
                    name,
                    PropertyValue::Known(value.clone()),
                    PropertySource::Predicted,
                )
            })
            .collect();

        if !changes.is_empty() {
            tracing::debug!(method, count = changes.len(), "Music mode cache update");
        }
        changes
    }

    fn set(&mut self, name: &str, value: PropertyValue, source: PropertySource) -> Option<PropertyChange> {
        let changed = self.get(name) != Some(&value);
        self.entries.insert(
            name.to_string(),
            CachedProperty {
                value: value.clone(),
                source,
            },
        );
        changed.then(|| PropertyChange {
            name: name.to_string(),
            value,
            source,
        })
    }

    // ========== Typed accessors ==========

    /// Returns `true` only if the cached power is exactly `on`.
    ///
    /// An unknown power state counts as not on.
    #[must_use]
    pub fn is_powered_on(&self) -> bool {
        self.get("power").and_then(PropertyValue::as_str) == Some("on")
    }

    /// Returns the cached power state.
    #[must_use]
    pub fn power(&self) -> Option<PowerState> {
        self.get("power")?.as_str()?.parse().ok()
    }

    /// Returns the cached brightness.
    #[must_use]
    pub fn brightness(&self) -> Option<u8> {
        self.get_u8("bright")
    }

    /// Returns the brightness the light is actually showing.
    ///
    /// This is 0 when the light is off, the night light brightness when in
    /// night light mode, and the regular brightness otherwise.
    #[must_use]
    pub fn current_brightness(&self) -> Option<u8> {
        if self.power() == Some(PowerState::Off) {
            return Some(0);
        }
        let night_light = self
            .get("active_mode")
            .and_then(PropertyValue::as_u64)
            .is_some_and(|mode| mode == 1);
        if night_light {
            self.get_u8("nl_br")
        } else {
            self.brightness()
        }
    }

    /// Returns the cached color temperature.
    #[must_use]
    pub fn color_temperature(&self) -> Option<ColorTemperature> {
        let kelvin = u16::try_from(self.get("ct")?.as_u64()?).ok()?;
        Some(ColorTemperature::new(kelvin))
    }

    /// Returns the cached RGB color.
    #[must_use]
    pub fn rgb(&self) -> Option<RgbColor> {
        let packed = u32::try_from(self.get("rgb")?.as_u64()?).ok()?;
        Some(RgbColor::from_packed(packed))
    }

    /// Returns the cached hue and saturation.
    #[must_use]
    pub fn hsv(&self) -> Option<HsvColor> {
        let hue = u16::try_from(self.get("hue")?.as_u64()?).ok()?;
        let saturation = self.get_u8("sat")?;
        Some(HsvColor::new(hue, saturation))
    }

    /// Returns the cached color mode.
    #[must_use]
    pub fn color_mode(&self) -> Option<ColorMode> {
        ColorMode::try_from(self.get_u8("color_mode")?).ok()
    }

    /// Returns whether a flow is running, if known.
    #[must_use]
    pub fn is_flowing(&self) -> Option<bool> {
        self.get("flowing")?.as_u64().map(|v| v == 1)
    }

    /// Returns whether the bulb reports music mode, if known.
    #[must_use]
    pub fn music_on(&self) -> Option<bool> {
        self.get("music_on")?.as_u64().map(|v| v == 1)
    }

    /// Returns the cached name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name")?.as_str()
    }

    /// Classifies the bulb from the properties it reports.
    #[must_use]
    pub fn bulb_type(&self) -> BulbType {
        BulbType::detect(self)
    }

    fn get_u8(&self, name: &str) -> Option<u8> {
        u8::try_from(self.get(name)?.as_u64()?).ok()
    }
}
