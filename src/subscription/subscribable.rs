// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish property changes.

use crate::state::PropertyChange;
use crate::subscription::SubscriptionId;
use crate::types::PowerState;

/// Trait for types that support property change subscriptions.
///
/// Callbacks run synchronously on the task that observed the change, inside
/// whichever bulb operation received the response or notification. Keep them
/// short.
///
/// # Examples
///
/// ```no_run
/// use yeelight_lib::Bulb;
/// use yeelight_lib::subscription::Subscribable;
///
/// # async fn example() -> yeelight_lib::Result<()> {
/// let mut bulb = Bulb::new("192.168.1.20")?;
///
/// let sub_id = bulb.on_power_changed(|state| {
///     println!("Bulb is now {state}");
/// });
///
/// bulb.toggle().await?;
/// bulb.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to every property change, whatever its source.
    fn on_property_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PropertyChange) + Send + Sync + 'static;

    /// Subscribes to power changes.
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static;

    /// Subscribes to brightness changes.
    fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8) + Send + Sync + 'static;

    /// Subscribes to music mode transitions.
    fn on_music_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
