// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb builder.

use std::time::Duration;

use crate::bulb::Bulb;
use crate::command::CommandOptions;
use crate::error::{Error, ProtocolError};
use crate::protocol::{Session, SessionConfig};
use crate::types::{Effect, PowerMode};

/// Builder for [`Bulb`].
///
/// Building never touches the network: the connection is opened by the
/// first command.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use yeelight_lib::Bulb;
/// use yeelight_lib::types::Effect;
///
/// let bulb = Bulb::builder("192.168.1.20")
///     .with_effect(Effect::Sudden)
///     .with_duration(500)
///     .with_auto_on(true)
///     .with_model("color")
///     .with_timeout(Duration::from_secs(2))
///     .build()
///     .unwrap();
///
/// assert!(bulb.auto_on());
/// assert_eq!(bulb.options().duration(), 500);
/// ```
#[derive(Debug, Clone)]
pub struct BulbBuilder {
    config: SessionConfig,
    options: CommandOptions,
    auto_on: bool,
    model: Option<String>,
}

impl BulbBuilder {
    pub(crate) fn new(host: impl Into<String>) -> Self {
        Self {
            config: SessionConfig::new(host),
            options: CommandOptions::default(),
            auto_on: false,
            model: None,
        }
    }

    /// Sets the control port (default 55443).
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the default transition effect.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.options = self.options.with_effect(effect);
        self
    }

    /// Sets the default transition duration in milliseconds.
    #[must_use]
    pub fn with_duration(mut self, duration: u32) -> Self {
        self.options = self.options.with_duration(duration);
        self
    }

    /// Sets the default power mode used when turning on.
    #[must_use]
    pub fn with_power_mode(mut self, power_mode: PowerMode) -> Self {
        self.options = self.options.with_power_mode(power_mode);
        self
    }

    /// Turns the light on before commands that need it.
    #[must_use]
    pub fn with_auto_on(mut self, auto_on: bool) -> Self {
        self.auto_on = auto_on;
        self
    }

    /// Sets the model name, as reported by discovery.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the connect and read timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Sets how long to wait for the bulb to connect back in music mode.
    #[must_use]
    pub fn with_music_accept_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_music_accept_timeout(timeout);
        self
    }

    /// Returns the session configuration built so far.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Builds the bulb.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is empty or
    /// contains whitespace or a path separator.
    pub fn build(self) -> Result<Bulb, Error> {
        let host = self.config.host();
        if host.is_empty() || host.contains(|c: char| c.is_whitespace() || c == '/') {
            return Err(ProtocolError::InvalidAddress(host.to_string()).into());
        }

        Ok(Bulb {
            session: Session::new(self.config),
            options: self.options,
            auto_on: self.auto_on,
            model: self.model,
        })
    }
}
