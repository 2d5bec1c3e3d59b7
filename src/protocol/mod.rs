// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The JSON-over-TCP protocol spoken by the bulbs.
//!
//! - [`frame`]: line framing and classification of incoming frames
//! - [`Session`]: the connection state machine (normal and music mode)
//!
//! Most applications use [`Bulb`](crate::Bulb), which adds command building
//! and the auto-on behavior on top of a session.

pub mod frame;
mod session;

pub use frame::CommandResponse;
pub use session::{Session, SessionConfig, SessionMode};
