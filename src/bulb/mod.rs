// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level bulb API.
//!
//! [`Bulb`] wraps a [`Session`] with per-bulb defaults (transition effect,
//! duration, power mode) and the auto-on behavior: with auto-on enabled,
//! commands that only work while the light is on first refresh the cached
//! properties and turn the light on if needed.
//!
//! ```no_run
//! use yeelight_lib::Bulb;
//!
//! # async fn example() -> yeelight_lib::Result<()> {
//! let mut bulb = Bulb::builder("192.168.1.20").with_auto_on(true).build()?;
//!
//! bulb.set_rgb(255, 128, 0).await?;
//! bulb.set_brightness(40).await?;
//!
//! let props = bulb.get_properties().await?;
//! println!("power: {:?}", props.power());
//! # Ok(())
//! # }
//! ```

mod builder;

pub use builder::BulbBuilder;

use std::fmt;

use serde_json::Value;

use crate::capabilities::ModelSpecs;
use crate::command::{
    AdjustCommand, BrightnessCommand, ColorTemperatureCommand, Command, CommandOptions,
    CronCommand, FlowCommand, HsvCommand, PowerCommand, Request, RgbCommand, SystemCommand,
};
use crate::error::{DeviceError, Result};
use crate::flow::Flow;
use crate::protocol::{CommandResponse, Session};
use crate::state::{BulbType, Property, PropertyCache, PropertyChange};
use crate::subscription::{Subscribable, SubscriptionId};
use crate::types::{
    AdjustAction, AdjustProperty, Brightness, ColorTemperature, CronType, HsvColor, PowerMode,
    PowerState, RgbColor,
};

/// A Yeelight bulb.
///
/// All commands take `&mut self` because the bulb answers commands strictly
/// in order on one connection. Wrap the bulb in a `tokio::sync::Mutex` to
/// share it between tasks.
#[derive(Debug)]
pub struct Bulb {
    session: Session,
    options: CommandOptions,
    auto_on: bool,
    model: Option<String>,
}

impl Bulb {
    /// Creates a bulb with default settings.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is malformed.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        BulbBuilder::new(host).build()
    }

    /// Creates a builder for a bulb.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> BulbBuilder {
        BulbBuilder::new(host)
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        self.session.config().host()
    }

    /// Returns the control port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.session.config().port()
    }

    /// Returns the default command options.
    #[must_use]
    pub fn options(&self) -> &CommandOptions {
        &self.options
    }

    /// Returns `true` if auto-on is enabled.
    #[must_use]
    pub fn auto_on(&self) -> bool {
        self.auto_on
    }

    /// Enables or disables auto-on.
    pub fn set_auto_on(&mut self, auto_on: bool) {
        self.auto_on = auto_on;
    }

    /// Returns the model name, if known.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns the underlying session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    // ========== Generic dispatch ==========

    /// Sends a typed command with the bulb's default options.
    ///
    /// # Errors
    ///
    /// Returns any error of [`run_with`](Self::run_with).
    pub async fn run<C: Command + Sync>(&mut self, command: &C) -> Result<CommandResponse> {
        let options = self.options;
        self.run_with(command, options).await
    }

    /// Sends a typed command with explicit options.
    ///
    /// Validates the command, makes sure the light is on if the command
    /// needs it, then sends the decorated request.
    ///
    /// # Errors
    ///
    /// - `DeviceError::InvalidFlow` for an empty flow
    /// - `DeviceError::PoweredOff` if the command needs power, auto-on is
    ///   disabled, and the cache does not say the light is on
    /// - any error of [`Session::send_command`]
    pub async fn run_with<C: Command + Sync>(
        &mut self,
        command: &C,
        options: CommandOptions,
    ) -> Result<CommandResponse> {
        command.validate()?;
        if command.requires_power() {
            self.ensure_on().await?;
        }
        let Request { method, params } = Request::build(command, &options);
        self.session.send_command(method, params).await
    }

    /// Sends a raw command without decoration or power checks.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Session::send_command`].
    pub async fn send_command(&mut self, method: &str, params: Vec<Value>) -> Result<CommandResponse> {
        self.session.send_command(method, params).await
    }

    /// Makes sure the light is on before a command that needs it.
    ///
    /// In music mode this does nothing. With auto-on, it refreshes the
    /// properties and turns the light on unless it reports `on`. Without
    /// auto-on, it fails unless the cache already says the light is on; an
    /// unknown power state counts as off and nothing is sent.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::PoweredOff`, or any error of the query or the
    /// power command.
    pub async fn ensure_on(&mut self) -> Result<()> {
        if self.session.is_streaming() {
            return Ok(());
        }

        if !self.auto_on {
            if !self.session.cache().is_powered_on() {
                return Err(DeviceError::PoweredOff.into());
            }
            return Ok(());
        }

        self.get_properties().await?;
        if !self.session.cache().is_powered_on() {
            tracing::debug!(host = %self.host(), "Light is off, turning it on first");
            let Request { method, params } = Request::build(&PowerCommand::On, &self.options);
            self.session.send_command(method, params).await?;
        }
        Ok(())
    }

    // ========== Properties ==========

    /// Refreshes the default set of properties.
    ///
    /// In music mode the cache is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns any error of the `get_prop` command.
    pub async fn get_properties(&mut self) -> Result<&PropertyCache> {
        self.session.query_properties(Property::DEFAULT_QUERY).await
    }

    /// Refreshes the given properties, replacing the whole cache.
    ///
    /// # Errors
    ///
    /// Returns any error of the `get_prop` command.
    pub async fn query_properties(&mut self, names: &[Property]) -> Result<&PropertyCache> {
        self.session.query_properties(names).await
    }

    /// Returns the last properties seen, without any I/O.
    ///
    /// There is no background listener: notifications are only picked up
    /// while waiting for a command response.
    #[must_use]
    pub fn last_properties(&self) -> &PropertyCache {
        self.session.cache()
    }

    /// Returns the brightness the light is currently showing.
    #[must_use]
    pub fn current_brightness(&self) -> Option<u8> {
        self.session.cache().current_brightness()
    }

    /// Returns the bulb type detected from the cached properties.
    #[must_use]
    pub fn bulb_type(&self) -> BulbType {
        self.session.cache().bulb_type()
    }

    /// Returns the hardware limits of this bulb's model.
    #[must_use]
    pub fn model_specs(&self) -> ModelSpecs {
        ModelSpecs::resolve(self.model(), self.bulb_type())
    }

    /// Returns `true` in music mode.
    #[must_use]
    pub fn music_mode(&self) -> bool {
        self.session.is_streaming()
    }

    // ========== Power ==========

    /// Turns the light on.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn turn_on(&mut self) -> Result<CommandResponse> {
        self.run(&PowerCommand::On).await
    }

    /// Turns the light off.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn turn_off(&mut self) -> Result<CommandResponse> {
        self.run(&PowerCommand::Off).await
    }

    /// Toggles the light.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn toggle(&mut self) -> Result<CommandResponse> {
        self.run(&PowerCommand::Toggle).await
    }

    /// Turns the light on in the given mode.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_power_mode(&mut self, mode: PowerMode) -> Result<CommandResponse> {
        let options = self.options.with_power_mode(mode);
        self.run_with(&PowerCommand::On, options).await
    }

    // ========== Color and brightness ==========

    /// Sets the color temperature, clamped to 1700-6500 K.
    ///
    /// # Errors
    ///
    /// Returns error if the light is off without auto-on, or the command fails.
    pub async fn set_color_temp(&mut self, kelvin: u16) -> Result<CommandResponse> {
        self.run(&ColorTemperatureCommand(ColorTemperature::new(kelvin)))
            .await
    }

    /// Sets an RGB color.
    ///
    /// # Errors
    ///
    /// Returns error if the light is off without auto-on, or the command fails.
    pub async fn set_rgb(&mut self, red: u8, green: u8, blue: u8) -> Result<CommandResponse> {
        self.run(&RgbCommand(RgbColor::new(red, green, blue))).await
    }

    /// Sets a hue/saturation color, and optionally the brightness.
    ///
    /// Hue is clamped to 0-359, saturation and value to 0-100.
    ///
    /// # Errors
    ///
    /// Returns error if the light is off without auto-on, or the command fails.
    pub async fn set_hsv(
        &mut self,
        hue: u16,
        saturation: u8,
        value: Option<u8>,
    ) -> Result<CommandResponse> {
        let mut command = HsvCommand::new(HsvColor::new(hue, saturation));
        if let Some(value) = value {
            command = command.with_value(value);
        }
        self.run(&command).await
    }

    /// Sets the brightness, clamped to 1-100.
    ///
    /// # Errors
    ///
    /// Returns error if the light is off without auto-on, or the command fails.
    pub async fn set_brightness(&mut self, brightness: u8) -> Result<CommandResponse> {
        self.run(&BrightnessCommand(Brightness::new(brightness)))
            .await
    }

    /// Nudges a property.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_adjust(
        &mut self,
        action: AdjustAction,
        property: AdjustProperty,
    ) -> Result<CommandResponse> {
        self.run(&AdjustCommand { action, property }).await
    }

    // ========== Flows ==========

    /// Starts a color flow.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidFlow` for an empty flow, or any error of
    /// the power check or the command.
    pub async fn start_flow(&mut self, flow: Flow) -> Result<CommandResponse> {
        self.run(&FlowCommand::Start(flow)).await
    }

    /// Stops the running flow.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn stop_flow(&mut self) -> Result<CommandResponse> {
        self.run(&FlowCommand::Stop).await
    }

    // ========== Settings ==========

    /// Saves the current state as the power-on default.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_default(&mut self) -> Result<CommandResponse> {
        self.run(&SystemCommand::SetDefault).await
    }

    /// Sets the bulb's name.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_name(&mut self, name: impl Into<String>) -> Result<CommandResponse> {
        self.run(&SystemCommand::SetName(name.into())).await
    }

    /// Schedules a timer.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn cron_add(&mut self, kind: CronType, minutes: u32) -> Result<CommandResponse> {
        self.run(&CronCommand::Add { kind, minutes }).await
    }

    /// Reads a timer.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn cron_get(&mut self, kind: CronType) -> Result<CommandResponse> {
        self.run(&CronCommand::Get(kind)).await
    }

    /// Cancels a timer.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn cron_del(&mut self, kind: CronType) -> Result<CommandResponse> {
        self.run(&CronCommand::Delete(kind)).await
    }

    // ========== Music mode ==========

    /// Switches to music mode, listening on `port` (any free port if `None`).
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::MusicModeActive` if already in music mode, or
    /// `ProtocolError::Timeout` if the bulb does not connect back.
    pub async fn start_music(&mut self, port: Option<u16>) -> Result<()> {
        self.session.start_music(port).await
    }

    /// Leaves music mode. Safe to call at any time.
    ///
    /// # Errors
    ///
    /// Currently infallible.
    pub async fn stop_music(&mut self) -> Result<()> {
        self.session.stop_music().await
    }
}

impl Subscribable for Bulb {
    fn on_property_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PropertyChange) + Send + Sync + 'static,
    {
        self.session.callbacks().on_property_changed(callback)
    }

    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.session.callbacks().on_power_changed(callback)
    }

    fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        self.session.callbacks().on_brightness_changed(callback)
    }

    fn on_music_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.session.callbacks().on_music_mode_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.session.callbacks().unsubscribe(id)
    }
}

impl fmt::Display for Bulb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bulb<{}:{}, type={:?}>",
            self.host(),
            self.port(),
            self.bulb_type()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let bulb = Bulb::new("10.0.0.5").unwrap();
        assert_eq!(bulb.to_string(), "Bulb<10.0.0.5:55443, type=Unknown>");
    }

    #[test]
    fn fresh_bulb_state() {
        let bulb = Bulb::new("10.0.0.5").unwrap();
        assert!(!bulb.music_mode());
        assert!(bulb.last_properties().is_empty());
        assert_eq!(bulb.current_brightness(), None);
        assert_eq!(bulb.model_specs(), ModelSpecs::default());
    }

    #[test]
    fn model_specs_prefers_model() {
        let bulb = Bulb::builder("10.0.0.5").with_model("mono1").build().unwrap();
        assert_eq!(bulb.model_specs().max_temperature, 2700);
    }

    #[tokio::test]
    async fn empty_flow_fails_before_io() {
        let mut bulb = Bulb::builder("127.0.0.1").with_port(9).build().unwrap();
        let err = bulb.start_flow(Flow::default()).await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Device(DeviceError::InvalidFlow(_))
        ));
        assert_eq!(bulb.session().next_command_id(), 0);
    }

    #[tokio::test]
    async fn unknown_power_without_auto_on_fails_before_io() {
        let mut bulb = Bulb::new("10.0.0.5").unwrap();

        let err = bulb.ensure_on().await.unwrap_err();
        assert!(matches!(err, crate::Error::Device(DeviceError::PoweredOff)));

        let err = bulb.set_brightness(40).await.unwrap_err();
        assert!(matches!(err, crate::Error::Device(DeviceError::PoweredOff)));
        assert_eq!(bulb.session().next_command_id(), 0);
        assert!(!bulb.session().is_connected());
    }

    #[tokio::test]
    async fn power_commands_skip_the_power_check() {
        let mut bulb = Bulb::builder("127.0.0.1").with_port(9).build().unwrap();
        // consumes an id, so the check let it through to the network
        let _ = bulb.turn_on().await;
        assert_eq!(bulb.session().next_command_id(), 1);
    }

    #[test]
    fn subscriptions_go_to_session_registry() {
        let bulb = Bulb::new("10.0.0.5").unwrap();
        let id = bulb.on_power_changed(|_| {});
        assert_eq!(bulb.session().callbacks().callback_count(), 1);
        assert!(bulb.unsubscribe(id));
    }
}
