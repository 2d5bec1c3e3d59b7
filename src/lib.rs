// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Yeelight` Lib - A Rust library to control Yeelight WiFi bulbs.
//!
//! Bulbs speak line-delimited JSON over TCP port 55443. This library provides
//! an async API on top of that protocol.
//!
//! # Supported Features
//!
//! - **Power control**: on, off, toggle, power-on modes (moonlight, flow, ...)
//! - **Light control**: color temperature, RGB, HSV, brightness, adjust
//! - **Color flows**: multi-step transitions run by the bulb, with presets
//! - **Music mode**: unthrottled streaming over a connection the bulb opens
//! - **Property tracking**: a cache fed by queries, notifications and music
//!   mode predictions, with change callbacks
//! - **Discovery**: multicast search on the local network (feature `discovery`)
//!
//! # Quick Start
//!
//! ```no_run
//! use yeelight_lib::flow::{Flow, FlowAction, presets};
//! use yeelight_lib::Bulb;
//!
//! #[tokio::main]
//! async fn main() -> yeelight_lib::Result<()> {
//!     let mut bulb = Bulb::builder("192.168.1.20").with_auto_on(true).build()?;
//!
//!     bulb.set_color_temp(2700).await?;
//!     bulb.set_brightness(60).await?;
//!     bulb.start_flow(Flow::new(0, FlowAction::Recover, presets::disco(120))).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Discovery
//!
//! ```no_run
//! use yeelight_lib::discovery::{DiscoveryOptions, discover_bulbs};
//!
//! #[tokio::main]
//! async fn main() -> yeelight_lib::Result<()> {
//!     for found in discover_bulbs(DiscoveryOptions::new()).await? {
//!         let mut bulb = found.bulb().build()?;
//!         bulb.turn_on().await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Music Mode and Callbacks
//!
//! ```no_run
//! use yeelight_lib::{Bulb, subscription::Subscribable};
//!
//! #[tokio::main]
//! async fn main() -> yeelight_lib::Result<()> {
//!     let mut bulb = Bulb::new("192.168.1.20")?;
//!
//!     bulb.on_property_changed(|change| {
//!         println!("{} = {} ({:?})", change.name, change.value, change.source);
//!     });
//!
//!     bulb.start_music(None).await?;
//!     for hue in (0..360).step_by(10) {
//!         bulb.set_hsv(hue, 100, None).await?;
//!     }
//!     bulb.stop_music().await?;
//!     Ok(())
//! }
//! ```

mod bulb;
mod capabilities;
pub mod command;
#[cfg(feature = "discovery")]
pub mod discovery;
pub mod error;
pub mod flow;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod types;

pub use bulb::{Bulb, BulbBuilder};
pub use capabilities::ModelSpecs;
pub use command::{Command, CommandOptions};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use flow::{Flow, FlowAction, Transition};
pub use protocol::{CommandResponse, Session, SessionConfig, SessionMode};
pub use state::{BulbType, Property, PropertyCache, PropertyChange, PropertySource, PropertyValue};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{
    Brightness, ColorMode, ColorTemperature, CronType, Effect, HsvColor, PowerMode, PowerState,
    RgbColor,
};
