// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb state tracking.
//!
//! The bulb keeps no session state for us, so the library caches the last
//! property values it has seen in a [`PropertyCache`]. Values arrive from
//! explicit queries, from `props` notifications the bulb pushes between
//! responses, and, in music mode, from the commands themselves.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use yeelight_lib::state::{PropertyCache, PropertySource};
//!
//! let mut cache = PropertyCache::new();
//! let changes = cache.merge_notification(json!({"power": "on"}).as_object().unwrap());
//!
//! assert_eq!(changes[0].source, PropertySource::Notified);
//! assert!(cache.is_powered_on());
//! ```

mod bulb_type;
mod property;
mod property_cache;

pub use bulb_type::BulbType;
pub use property::{Property, PropertyChange, PropertySource, PropertyValue};
pub use property_cache::{CachedProperty, PropertyCache};
