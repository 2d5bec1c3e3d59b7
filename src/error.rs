// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Yeelight library.
//!
//! Failures fall into four families: argument values that cannot be parsed,
//! transport failures on the socket, payloads that do not have the expected
//! shape, and errors reported by (or about) the bulb itself.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred on the transport (connect, send or receive).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The bulb reported an error, or a command precondition failed.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to parsing argument values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An unknown transition effect name was provided.
    #[error("invalid effect: {0} (expected \"smooth\" or \"sudden\")")]
    InvalidEffect(String),

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// A power mode code outside the known set was provided.
    #[error("invalid power mode: {0}")]
    InvalidPowerMode(u8),

    /// A color mode code outside the known set was provided.
    #[error("invalid color mode: {0}")]
    InvalidColorMode(u8),

    /// An unknown adjust action or property was provided.
    #[error("invalid adjust argument: {0}")]
    InvalidAdjust(String),

    /// An unknown property name was provided.
    #[error("unknown property: {0}")]
    InvalidProperty(String),

    /// An unknown flow action code was provided.
    #[error("invalid flow action: {0}")]
    InvalidFlowAction(u8),
}

/// Errors on the socket layer.
///
/// Every transport failure during a command discards the connection, so the
/// next command opens a fresh one. Commands are never retried automatically.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Connection to the bulb could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Writing a command frame failed.
    #[error("failed while sending command: {0}")]
    Send(#[source] std::io::Error),

    /// An operation timed out.
    #[error("operation timed out after {0} ms")]
    Timeout(u64),

    /// Invalid host or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Local socket setup failed (bind, listen, accept).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The music mode connection was lost; music mode must be stopped first.
    #[error("music mode connection is not available")]
    NotConnected,
}

/// Errors related to parsing bulb payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing or serialization failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing.
    #[error("missing field: {0}")]
    MissingField(String),

    /// Unexpected payload format.
    #[error("unexpected format: {0}")]
    UnexpectedFormat(String),
}

/// Errors reported by the bulb, or raised before talking to it.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The bulb answered with an `error` object.
    #[error("bulb reported an error: {0}")]
    CommandRejected(serde_json::Value),

    /// The command needs the light on, it is off, and auto-on is disabled.
    #[error("bulb is powered off")]
    PoweredOff,

    /// Music mode was started while it was already active.
    #[error("already in music mode, stop music mode first")]
    MusicModeActive,

    /// A flow cannot be sent as given.
    #[error("invalid flow: {0}")]
    InvalidFlow(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
