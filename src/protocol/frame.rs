// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire framing.
//!
//! Every message is one JSON object terminated by `\r\n`. Commands go out as
//! `{"id", "method", "params"}`; the bulb answers with `{"id", "result"}` or
//! `{"id", "error"}` and pushes `{"method": "props", "params": {..}}`
//! notifications on the same connection at any time.

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::error::{DeviceError, ParseError};

/// Line terminator used in both directions.
pub const TERMINATOR: &str = "\r\n";

/// Method name of unsolicited property notifications.
pub const NOTIFICATION_METHOD: &str = "props";

/// Longest line accepted from the bulb, terminator included.
pub const MAX_LINE_LEN: usize = 16 * 1024;

/// An outgoing command frame.
#[derive(Debug, Clone, Serialize)]
pub struct CommandFrame<'a> {
    /// Command ID, echoed back by the bulb.
    pub id: u64,
    /// Method name.
    pub method: &'a str,
    /// Positional parameters.
    pub params: &'a [Value],
}

impl CommandFrame<'_> {
    /// Serializes the frame including the line terminator.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if a parameter cannot be serialized.
    pub fn encode(&self) -> Result<String, ParseError> {
        let mut line = serde_json::to_string(self)?;
        line.push_str(TERMINATOR);
        Ok(line)
    }
}

/// A classified incoming frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A `props` notification carrying changed properties.
    Notification(Map<String, Value>),
    /// Anything else, taken as the answer to the outstanding command.
    Response(Value),
}

impl Frame {
    /// Parses and classifies one line.
    ///
    /// A line that is not valid JSON becomes the stand-in response
    /// `{"result": ["invalid command"]}` instead of an error.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let value = match serde_json::from_str::<Value>(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(line, error = %e, "Unparsable line from bulb");
                return Self::Response(invalid_command());
            }
        };

        let is_notification =
            value.get("method").and_then(Value::as_str) == Some(NOTIFICATION_METHOD);
        if is_notification {
            if let Some(Value::Object(params)) = value.get("params") {
                return Self::Notification(params.clone());
            }
            return Self::Notification(Map::new());
        }

        Self::Response(value)
    }
}

fn invalid_command() -> Value {
    serde_json::json!({"result": ["invalid command"]})
}

/// Reads lines until a non-empty one is found and classifies it.
///
/// Returns `Ok(None)` at end of stream. Trailing `\r\n` is stripped; a final
/// line without a terminator is still returned. A line longer than
/// [`MAX_LINE_LEN`] is skipped up to its terminator and answered with the
/// `"invalid command"` stand-in.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub async fn next_frame<R>(reader: &mut R) -> std::io::Result<Option<Frame>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let limit = u64::try_from(MAX_LINE_LEN).unwrap_or(u64::MAX);
        if (&mut *reader).take(limit).read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }
        if buf.len() >= MAX_LINE_LEN && buf.last() != Some(&b'\n') {
            tracing::warn!(limit = MAX_LINE_LEN, "Line from bulb too long, skipping it");
            skip_line(reader).await?;
            return Ok(Some(Frame::Response(invalid_command())));
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }
        return Ok(Some(Frame::parse(line)));
    }
}

/// Discards input up to and including the next `\n`, without buffering it.
async fn skip_line<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            return Ok(());
        }
        match chunk.iter().position(|&b| b == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = chunk.len();
                reader.consume(len);
            }
        }
    }
}

/// The parsed answer to a command.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yeelight_lib::CommandResponse;
///
/// let response = CommandResponse::new(json!({"id": 1, "result": ["ok"]}));
/// assert!(response.is_ok());
/// assert_eq!(response.first(), Some(&json!("ok")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResponse {
    body: Value,
}

impl CommandResponse {
    /// Wraps a response object.
    #[must_use]
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// The stand-in response used in music mode, where the bulb never answers.
    #[must_use]
    pub fn ok() -> Self {
        Self::new(serde_json::json!({"result": ["ok"]}))
    }

    /// The response synthesized when the connection drops mid-read.
    #[must_use]
    pub(crate) fn connection_closed() -> Self {
        Self::new(serde_json::json!({"error": "connection closed"}))
    }

    /// Returns the raw response object.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the `id` field, if present.
    #[must_use]
    pub fn id(&self) -> Option<u64> {
        self.body.get("id").and_then(Value::as_u64)
    }

    /// Returns the `result` array, or an empty slice.
    #[must_use]
    pub fn result(&self) -> &[Value] {
        self.body
            .get("result")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the first element of `result`.
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.result().first()
    }

    /// Returns `true` if the result is `["ok"]`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.first().and_then(Value::as_str) == Some("ok")
    }

    /// Returns the `error` payload, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Value> {
        self.body.get("error")
    }

    /// Turns an error-carrying response into `DeviceError::CommandRejected`.
    ///
    /// # Errors
    ///
    /// Returns the rejection if the body has an `error` field.
    pub fn into_result(self) -> Result<Self, DeviceError> {
        match self.body.get("error") {
            Some(error) => Err(DeviceError::CommandRejected(error.clone())),
            None => Ok(self),
        }
    }

    /// Parses the `result` array into a specific type.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if there is no result, or
    /// `ParseError::Json` if it does not match the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ParseError> {
        let result = self
            .body
            .get("result")
            .ok_or_else(|| ParseError::MissingField("result".to_string()))?;
        serde_json::from_value(result.clone()).map_err(Into::into)
    }
}
