// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for property subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::{PropertyChange, PropertyValue};
use crate::types::PowerState;

/// Unique identifier for a subscription.
///
/// Returned when registering a callback and used to unsubscribe later. IDs
/// are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type PropertyCallback = Arc<dyn Fn(&PropertyChange) + Send + Sync>;

type PowerCallback = Arc<dyn Fn(PowerState) + Send + Sync>;

type BrightnessCallback = Arc<dyn Fn(u8) + Send + Sync>;

type MusicModeCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Registry for property change callbacks.
///
/// Uses `parking_lot::RwLock` so callbacks can be registered from any task
/// while the owning session dispatches changes. Callbacks are cloned out of
/// the lock before being invoked, so a callback may itself subscribe or
/// unsubscribe.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    property_callbacks: RwLock<HashMap<SubscriptionId, PropertyCallback>>,
    power_callbacks: RwLock<HashMap<SubscriptionId, PowerCallback>>,
    brightness_callbacks: RwLock<HashMap<SubscriptionId, BrightnessCallback>>,
    music_callbacks: RwLock<HashMap<SubscriptionId, MusicModeCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            property_callbacks: RwLock::new(HashMap::new()),
            power_callbacks: RwLock::new(HashMap::new()),
            brightness_callbacks: RwLock::new(HashMap::new()),
            music_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for every property change, whatever its source.
    pub fn on_property_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PropertyChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.property_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for power changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for brightness changes.
    pub fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.brightness_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for entering (`true`) and leaving (`false`)
    /// music mode.
    pub fn on_music_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.music_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Removes a callback.
    ///
    /// Returns `true` if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.property_callbacks.write().remove(&id).is_some()
            || self.power_callbacks.write().remove(&id).is_some()
            || self.brightness_callbacks.write().remove(&id).is_some()
            || self.music_callbacks.write().remove(&id).is_some()
    }

    /// Removes all callbacks.
    pub fn clear(&self) {
        self.property_callbacks.write().clear();
        self.power_callbacks.write().clear();
        self.brightness_callbacks.write().clear();
        self.music_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a batch of changes to all matching callbacks.
    pub fn dispatch(&self, changes: &[PropertyChange]) {
        for change in changes {
            self.dispatch_one(change);
        }
    }

    fn dispatch_one(&self, change: &PropertyChange) {
        let callbacks: Vec<PropertyCallback> =
            self.property_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(change);
        }

        match change.name.as_str() {
            "power" => {
                let Some(state) = change.value.as_str().and_then(|s| s.parse().ok()) else {
                    return;
                };
                let callbacks: Vec<PowerCallback> =
                    self.power_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(state);
                }
            }
            "bright" => {
                let Some(level) = brightness_of(&change.value) else {
                    return;
                };
                let callbacks: Vec<BrightnessCallback> =
                    self.brightness_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(level);
                }
            }
            _ => {}
        }
    }

    /// Dispatches a music mode transition.
    pub fn dispatch_music_mode(&self, active: bool) {
        let callbacks: Vec<MusicModeCallback> =
            self.music_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(active);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.property_callbacks.read().len()
            + self.power_callbacks.read().len()
            + self.brightness_callbacks.read().len()
            + self.music_callbacks.read().len()
    }

    /// Returns `true` if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

fn brightness_of(value: &PropertyValue) -> Option<u8> {
    u8::try_from(value.as_u64()?).ok()
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish_non_exhaustive()
    }
}
