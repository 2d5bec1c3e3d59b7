// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The control session with one bulb.
//!
//! A [`Session`] owns the TCP connection, the command ID counter and the
//! property cache. It has two modes:
//!
//! - **Normal**: the session opens an outgoing connection on demand, writes
//!   one command at a time and reads frames until the response arrives,
//!   merging any `props` notifications it sees along the way.
//! - **Streaming** (music mode): the bulb has connected back to us. Commands
//!   are written and never answered, so the session fabricates an `ok`
//!   response and updates the cache from the outgoing parameters itself.
//!
//! Every transport failure discards the connection. Nothing is retried: a
//! repeated `toggle` after an ambiguous failure could apply twice.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpSocket, TcpStream};
use tokio::time::timeout;

use super::frame::{self, CommandFrame, CommandResponse, Frame};
use crate::error::{DeviceError, ProtocolError, Result};
use crate::state::{Property, PropertyCache};
use crate::subscription::CallbackRegistry;

type Connection = BufReader<TcpStream>;

/// Backlog of the transient music mode listener.
const MUSIC_LISTEN_BACKLOG: u32 = 3;

/// Connection settings for a [`Session`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use yeelight_lib::protocol::SessionConfig;
///
/// let config = SessionConfig::new("192.168.1.20")
///     .with_port(55443)
///     .with_timeout(Duration::from_secs(2));
///
/// assert_eq!(config.host(), "192.168.1.20");
/// assert_eq!(config.timeout(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    host: String,
    port: u16,
    timeout: Duration,
    music_accept_timeout: Duration,
}

impl SessionConfig {
    /// Default control port.
    pub const DEFAULT_PORT: u16 = 55443;

    /// Default connect and read timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Default time to wait for the bulb to connect back in music mode.
    pub const DEFAULT_MUSIC_ACCEPT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a configuration for the given host with default settings.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
            music_accept_timeout: Self::DEFAULT_MUSIC_ACCEPT_TIMEOUT,
        }
    }

    /// Sets the control port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the timeout for connecting and for each read.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how long to wait for the bulb to connect back in music mode.
    #[must_use]
    pub fn with_music_accept_timeout(mut self, timeout: Duration) -> Self {
        self.music_accept_timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the connect and read timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the music mode accept timeout.
    #[must_use]
    pub fn music_accept_timeout(&self) -> Duration {
        self.music_accept_timeout
    }
}

/// The mode a [`Session`] is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionMode {
    /// Request/response over an outgoing connection.
    #[default]
    Normal,
    /// Music mode: unanswered commands over a connection the bulb opened.
    Streaming,
}

/// The connection, tagged with the mode it belongs to.
///
/// An outgoing connection can only exist in `Normal`, an accepted one only in
/// `Music`, so a streaming session can never write to the stale outgoing
/// socket.
#[derive(Debug)]
enum Link {
    Normal(Option<Connection>),
    Music(Option<Connection>),
}

impl Link {
    fn mode(&self) -> SessionMode {
        match self {
            Self::Normal(_) => SessionMode::Normal,
            Self::Music(_) => SessionMode::Streaming,
        }
    }

    fn is_open(&self) -> bool {
        match self {
            Self::Normal(conn) | Self::Music(conn) => conn.is_some(),
        }
    }
}

/// A control session with one bulb.
///
/// All operations take `&mut self`: the protocol pairs each command with the
/// next non-notification frame, so only one command may be in flight.
///
/// # Examples
///
/// ```no_run
/// use serde_json::json;
/// use yeelight_lib::protocol::{Session, SessionConfig};
///
/// # async fn example() -> yeelight_lib::Result<()> {
/// let mut session = Session::new(SessionConfig::new("192.168.1.20"));
///
/// let response = session
///     .send_command("set_bright", vec![json!(50), json!("smooth"), json!(300)])
///     .await?;
/// assert!(response.is_ok());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    next_id: u64,
    link: Link,
    cache: PropertyCache,
    callbacks: Arc<CallbackRegistry>,
}

impl Session {
    /// Creates a session. No connection is opened until the first command.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_callbacks(config, Arc::new(CallbackRegistry::new()))
    }

    /// Creates a session that dispatches property changes to `callbacks`.
    #[must_use]
    pub fn with_callbacks(config: SessionConfig, callbacks: Arc<CallbackRegistry>) -> Self {
        Self {
            config,
            next_id: 0,
            link: Link::Normal(None),
            cache: PropertyCache::new(),
            callbacks,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current mode.
    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.link.mode()
    }

    /// Returns `true` in music mode.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.mode() == SessionMode::Streaming
    }

    /// Returns `true` if a connection is currently open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.link.is_open()
    }

    /// Returns the ID the next command will carry.
    #[must_use]
    pub fn next_command_id(&self) -> u64 {
        self.next_id
    }

    /// Returns the property cache.
    #[must_use]
    pub fn cache(&self) -> &PropertyCache {
        &self.cache
    }

    /// Returns the callback registry.
    #[must_use]
    pub fn callbacks(&self) -> &Arc<CallbackRegistry> {
        &self.callbacks
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ========== Sending ==========

    /// Sends a command and returns the bulb's response.
    ///
    /// In music mode the command is written and an `ok` response is returned
    /// without reading anything.
    ///
    /// The response is not checked against the command ID; the first frame
    /// that is not a notification is taken as the answer.
    ///
    /// # Errors
    ///
    /// - `ProtocolError` if connecting or writing fails (the connection is
    ///   discarded), or if the music mode connection was lost
    /// - `DeviceError::CommandRejected` if the bulb answers with an error, or
    ///   with `"connection closed"` if the connection dropped while waiting
    pub async fn send_command(&mut self, method: &str, params: Vec<Value>) -> Result<CommandResponse> {
        let id = self.take_id();
        let line = CommandFrame {
            id,
            method,
            params: &params,
        }
        .encode()?;

        tracing::debug!(
            host = %self.config.host,
            id,
            method,
            frame = line.trim_end(),
            "> Sending command"
        );

        if self.is_streaming() {
            self.stream(method, &params, line).await
        } else {
            self.exchange(line).await
        }
    }

    async fn exchange(&mut self, line: String) -> Result<CommandResponse> {
        let opened = match &mut self.link {
            Link::Normal(conn) | Link::Music(conn) => conn.take(),
        };
        let mut conn = match opened {
            Some(conn) => conn,
            None => self.open().await?,
        };

        let written = conn.get_mut().write_all(line.as_bytes()).await;
        if let Err(e) = written {
            tracing::warn!(host = %self.config.host, error = %e, "Write failed, dropping connection");
            return Err(ProtocolError::Send(e).into());
        }

        let response = loop {
            match timeout(self.config.timeout, frame::next_frame(&mut conn)).await {
                Ok(Ok(Some(Frame::Notification(params)))) => {
                    tracing::debug!(host = %self.config.host, ?params, "< Notification");
                    let changes = self.cache.merge_notification(&params);
                    self.callbacks.dispatch(&changes);
                }
                Ok(Ok(Some(Frame::Response(body)))) => {
                    tracing::debug!(host = %self.config.host, %body, "< Response");
                    self.link = Link::Normal(Some(conn));
                    break CommandResponse::new(body);
                }
                Ok(Ok(None)) => {
                    tracing::warn!(host = %self.config.host, "Bulb closed the connection");
                    break CommandResponse::connection_closed();
                }
                Ok(Err(e)) => {
                    tracing::warn!(host = %self.config.host, error = %e, "Read failed, dropping connection");
                    break CommandResponse::connection_closed();
                }
                Err(_) => {
                    tracing::warn!(
                        host = %self.config.host,
                        timeout_ms = millis(self.config.timeout),
                        "No response, dropping connection"
                    );
                    break CommandResponse::connection_closed();
                }
            }
        };

        Ok(response.into_result()?)
    }

    async fn stream(&mut self, method: &str, params: &[Value], line: String) -> Result<CommandResponse> {
        let Link::Music(Some(conn)) = &mut self.link else {
            return Err(ProtocolError::NotConnected.into());
        };

        let written = conn.get_mut().write_all(line.as_bytes()).await;
        if let Err(e) = written {
            tracing::warn!(host = %self.config.host, error = %e, "Music mode connection lost");
            self.link = Link::Music(None);
            return Err(ProtocolError::Send(e).into());
        }

        let changes = self.cache.predict(method, params);
        self.callbacks.dispatch(&changes);
        Ok(CommandResponse::ok())
    }

    async fn open(&self) -> std::result::Result<Connection, ProtocolError> {
        let host = self.config.host.as_str();
        let port = self.config.port;

        match timeout(self.config.timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => {
                tracing::info!(host, port, "Connected to bulb");
                Ok(BufReader::new(stream))
            }
            Ok(Err(e)) => Err(ProtocolError::ConnectionFailed(format!("{host}:{port}: {e}"))),
            Err(_) => Err(ProtocolError::Timeout(millis(self.config.timeout))),
        }
    }

    // ========== Properties ==========

    /// Queries properties and replaces the cache with the answer.
    ///
    /// Does nothing in music mode, where queries are never answered.
    ///
    /// # Errors
    ///
    /// Returns any error of [`send_command`](Self::send_command).
    pub async fn query_properties(&mut self, names: &[Property]) -> Result<&PropertyCache> {
        if self.is_streaming() {
            return Ok(&self.cache);
        }

        let params = names.iter().map(|name| Value::from(name.as_str())).collect();
        let response = self.send_command("get_prop", params).await?;

        let names: Vec<String> = names.iter().map(ToString::to_string).collect();
        let changes = self
            .cache
            .replace_from_query(&names, response.result().to_vec());
        self.callbacks.dispatch(&changes);

        Ok(&self.cache)
    }

    // ========== Music mode ==========

    /// Switches to music mode.
    ///
    /// Seeds the cache with a full query, listens on `port` (any free port if
    /// `None`), asks the bulb to connect back, and replaces the outgoing
    /// connection with the accepted one.
    ///
    /// # Errors
    ///
    /// - `DeviceError::MusicModeActive` if already streaming
    /// - `ProtocolError::Timeout` if the bulb does not connect back in time;
    ///   the session stays in normal mode
    /// - any error of the seeding query or the `set_music` command
    pub async fn start_music(&mut self, port: Option<u16>) -> Result<()> {
        if self.is_streaming() {
            return Err(DeviceError::MusicModeActive.into());
        }

        self.query_properties(Property::DEFAULT_QUERY).await?;

        let local_ip = self.local_ip().await?;
        let listener = {
            let socket = TcpSocket::new_v4().map_err(ProtocolError::Io)?;
            socket.set_reuseaddr(true).map_err(ProtocolError::Io)?;
            socket
                .bind(SocketAddr::new(
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    port.unwrap_or(0),
                ))
                .map_err(ProtocolError::Io)?;
            socket
                .listen(MUSIC_LISTEN_BACKLOG)
                .map_err(ProtocolError::Io)?
        };
        let listen_port = listener.local_addr().map_err(ProtocolError::Io)?.port();

        tracing::debug!(host = %self.config.host, %local_ip, port = listen_port, "Waiting for bulb to connect back");
        self.send_command(
            "set_music",
            vec![
                Value::from(1),
                Value::from(local_ip.to_string()),
                Value::from(listen_port),
            ],
        )
        .await?;

        let accepted = timeout(self.config.music_accept_timeout, listener.accept()).await;
        drop(listener);

        let (stream, peer) = match accepted {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => return Err(ProtocolError::Io(e).into()),
            Err(_) => {
                return Err(ProtocolError::Timeout(millis(self.config.music_accept_timeout)).into());
            }
        };

        self.link = Link::Music(Some(BufReader::new(stream)));
        tracing::info!(host = %self.config.host, %peer, "Music mode started");
        self.callbacks.dispatch_music_mode(true);
        Ok(())
    }

    /// Leaves music mode.
    ///
    /// Sends `set_music [0]` on the music connection if it is still open,
    /// ignoring failures, then closes it. Calling this in normal mode does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` leaves room for a checked shutdown.
    pub async fn stop_music(&mut self) -> Result<()> {
        let Link::Music(conn) = &mut self.link else {
            return Ok(());
        };

        if let Some(mut conn) = conn.take() {
            let id = self.take_id();
            let params = [Value::from(0)];
            let frame = CommandFrame {
                id,
                method: "set_music",
                params: &params,
            };
            match frame.encode() {
                Ok(line) => {
                    if let Err(e) = conn.get_mut().write_all(line.as_bytes()).await {
                        tracing::debug!(host = %self.config.host, error = %e, "Could not send set_music 0");
                    }
                }
                Err(e) => tracing::debug!(error = %e, "Could not encode set_music 0"),
            }
            let _ = conn.get_mut().shutdown().await;
        }

        self.link = Link::Normal(None);
        tracing::info!(host = %self.config.host, "Music mode stopped");
        self.callbacks.dispatch_music_mode(false);
        Ok(())
    }

    async fn local_ip(&mut self) -> Result<IpAddr> {
        if let Link::Normal(Some(conn)) = &self.link {
            return Ok(conn.get_ref().local_addr().map_err(ProtocolError::Io)?.ip());
        }
        let conn = self.open().await?;
        let ip = conn.get_ref().local_addr().map_err(ProtocolError::Io)?.ip();
        self.link = Link::Normal(Some(conn));
        Ok(ip)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = SessionConfig::new("10.0.0.2");
        assert_eq!(config.port(), 55443);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.music_accept_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn new_session_is_idle() {
        let session = Session::new(SessionConfig::new("10.0.0.2"));
        assert_eq!(session.mode(), SessionMode::Normal);
        assert!(!session.is_connected());
        assert_eq!(session.next_command_id(), 0);
        assert!(session.cache().is_empty());
    }

    #[tokio::test]
    async fn stop_music_in_normal_mode_is_a_no_op() {
        let mut session = Session::new(SessionConfig::new("10.0.0.2"));
        session.stop_music().await.unwrap();
        session.stop_music().await.unwrap();
        assert_eq!(session.mode(), SessionMode::Normal);
        assert_eq!(session.next_command_id(), 0);
    }

    #[tokio::test]
    async fn connection_refused_still_consumes_an_id() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut session = Session::new(SessionConfig::new("127.0.0.1").with_port(port));
        let err = session.send_command("toggle", Vec::new()).await.unwrap_err();

        assert!(matches!(
            err,
            crate::Error::Protocol(ProtocolError::ConnectionFailed(_) | ProtocolError::Timeout(_))
        ));
        assert_eq!(session.next_command_id(), 1);
        assert!(!session.is_connected());
    }

    #[test]
    fn millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
