// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb discovery on the local network.
//!
//! Bulbs answer an SSDP-style search sent to the multicast group
//! `239.255.255.250:1982`. Each answer is a block of HTTP-like headers: a
//! `Location: yeelight://<ip>:<port>` header to reach the bulb, followed by
//! lower-case headers describing it (`id`, `model`, `support`, `power`, ...).
//!
//! Discovery always runs for the full timeout because there is no way to know
//! when every bulb has answered.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use yeelight_lib::discovery::{DiscoveryOptions, discover_bulbs};
//!
//! # async fn example() -> yeelight_lib::Result<()> {
//! let found = discover_bulbs(DiscoveryOptions::new().with_timeout(Duration::from_secs(3))).await?;
//!
//! for bulb in &found {
//!     println!("{}:{} {:?}", bulb.ip, bulb.port, bulb.model());
//!     let mut bulb = bulb.bulb().build()?;
//!     bulb.toggle().await?;
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::{Instant, timeout_at};
use url::Url;

use crate::bulb::BulbBuilder;
use crate::error::{Error, ParseError, ProtocolError};
use crate::protocol::SessionConfig;

/// Multicast group and port bulbs listen on for searches.
pub const MULTICAST_ADDR: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1982);

const MULTICAST_TTL: u32 = 32;

const MAX_DATAGRAM: usize = 65507;

const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(2);

/// The search datagram.
#[must_use]
pub fn search_message() -> String {
    [
        "M-SEARCH * HTTP/1.1",
        "HOST: 239.255.255.250:1982",
        "MAN: \"ssdp:discover\"",
        "ST: wifi_bulb",
    ]
    .join("\r\n")
}

/// Options for [`discover_bulbs`].
///
/// # Examples
///
/// ```
/// use std::net::Ipv4Addr;
/// use std::time::Duration;
/// use yeelight_lib::discovery::DiscoveryOptions;
///
/// let options = DiscoveryOptions::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_interface(Ipv4Addr::new(192, 168, 1, 10));
/// assert_eq!(options.timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    timeout: Option<Duration>,
    interface: Option<Ipv4Addr>,
}

impl DiscoveryOptions {
    /// Creates options with a 2 second timeout on the default interface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how long to collect answers.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sends the search from the interface with this IPv4 address.
    #[must_use]
    pub fn with_interface(mut self, address: Ipv4Addr) -> Self {
        self.interface = Some(address);
        self
    }

    /// Returns the discovery timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_DISCOVERY_TIMEOUT)
    }

    /// Returns the interface address, if set.
    #[must_use]
    pub fn interface(&self) -> Option<Ipv4Addr> {
        self.interface
    }
}

/// A bulb that answered a discovery search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredBulb {
    /// Host from the `Location` header.
    pub ip: String,
    /// Control port from the `Location` header.
    pub port: u16,
    /// The lower-case headers of the answer.
    pub capabilities: BTreeMap<String, String>,
}

impl DiscoveredBulb {
    /// Returns a capability value.
    #[must_use]
    pub fn capability(&self, key: &str) -> Option<&str> {
        self.capabilities.get(key).map(String::as_str)
    }

    /// Returns the bulb's unique ID.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.capability("id")
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.capability("model")
    }

    /// Returns the user-assigned name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.capability("name").filter(|name| !name.is_empty())
    }

    /// Returns the firmware version.
    #[must_use]
    pub fn firmware_version(&self) -> Option<&str> {
        self.capability("fw_ver")
    }

    /// Returns `true` if the bulb lists `method` as supported.
    #[must_use]
    pub fn supports(&self, method: &str) -> bool {
        self.capability("support")
            .is_some_and(|list| list.split_whitespace().any(|m| m == method))
    }

    /// Returns a builder for a bulb at this address, with the model set.
    #[must_use]
    pub fn bulb(&self) -> BulbBuilder {
        let builder = crate::Bulb::builder(self.ip.clone()).with_port(self.port);
        match self.model() {
            Some(model) => builder.with_model(model),
            None => builder,
        }
    }
}

/// Parses one discovery answer.
///
/// # Errors
///
/// Returns `ParseError::MissingField` without a `Location` header and
/// `ParseError::UnexpectedFormat` if it is not a URL with a host.
///
/// # Examples
///
/// ```
/// use yeelight_lib::discovery::parse_reply;
///
/// let reply = "HTTP/1.1 200 OK\r\n\
///     Location: yeelight://192.168.1.239:55443\r\n\
///     model: color\r\n\
///     support: get_prop set_power toggle\r\n";
///
/// let bulb = parse_reply(reply).unwrap();
/// assert_eq!(bulb.ip, "192.168.1.239");
/// assert_eq!(bulb.port, 55443);
/// assert!(bulb.supports("toggle"));
/// assert!(!bulb.capabilities.contains_key("Location"));
/// ```
pub fn parse_reply(reply: &str) -> Result<DiscoveredBulb, ParseError> {
    let mut location = None;
    let mut capabilities = BTreeMap::new();

    for line in reply.lines() {
        let line = line.trim_end_matches('\r');
        let Some((key, value)) = line.split_once(": ").or_else(|| line.split_once(':')) else {
            continue;
        };
        let value = value.trim();
        if key.eq_ignore_ascii_case("location") {
            location = Some(value.to_string());
        }
        if is_lower_case(key) {
            capabilities.insert(key.to_string(), value.to_string());
        }
    }

    let location = location.ok_or_else(|| ParseError::MissingField("Location".to_string()))?;
    let url = Url::parse(&location)
        .map_err(|e| ParseError::UnexpectedFormat(format!("{location}: {e}")))?;
    let ip = url
        .host_str()
        .ok_or_else(|| ParseError::UnexpectedFormat(format!("{location}: no host")))?
        .to_string();
    let port = url.port().unwrap_or(SessionConfig::DEFAULT_PORT);

    Ok(DiscoveredBulb {
        ip,
        port,
        capabilities,
    })
}

fn is_lower_case(key: &str) -> bool {
    key.chars().any(char::is_alphabetic) && !key.chars().any(char::is_uppercase)
}

/// Searches the local network for bulbs.
///
/// Sends one search datagram and collects answers until the timeout expires,
/// keeping the first answer per `(ip, port)`.
///
/// # Errors
///
/// Returns `ProtocolError` if the UDP socket cannot be set up or the search
/// cannot be sent. Undecodable answers are logged and skipped.
pub async fn discover_bulbs(options: DiscoveryOptions) -> Result<Vec<DiscoveredBulb>, Error> {
    let bind_ip = options.interface().unwrap_or(Ipv4Addr::UNSPECIFIED);
    let socket = UdpSocket::bind(SocketAddr::from((bind_ip, 0)))
        .await
        .map_err(ProtocolError::Io)?;
    socket
        .set_multicast_ttl_v4(MULTICAST_TTL)
        .map_err(ProtocolError::Io)?;
    socket
        .send_to(search_message().as_bytes(), MULTICAST_ADDR)
        .await
        .map_err(|e| ProtocolError::ConnectionFailed(format!("discovery search: {e}")))?;

    let deadline = Instant::now() + options.timeout();
    let mut seen = HashSet::new();
    let mut bulbs = Vec::new();
    let mut buf = vec![0u8; MAX_DATAGRAM];

    while let Ok(received) = timeout_at(deadline, socket.recv_from(&mut buf)).await {
        let (len, from) = match received {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "Discovery receive failed");
                continue;
            }
        };

        let reply = String::from_utf8_lossy(&buf[..len]);
        let bulb = match parse_reply(&reply) {
            Ok(bulb) => bulb,
            Err(e) => {
                tracing::warn!(%from, error = %e, "Ignoring undecodable discovery reply");
                continue;
            }
        };

        if seen.insert((bulb.ip.clone(), bulb.port)) {
            tracing::debug!(ip = %bulb.ip, port = bulb.port, model = ?bulb.model(), "Discovered bulb");
            bulbs.push(bulb);
        }
    }

    tracing::info!(count = bulbs.len(), "Discovery finished");
    Ok(bulbs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "HTTP/1.1 200 OK\r\n\
        Cache-Control: max-age=3600\r\n\
        Date: \r\n\
        Ext: \r\n\
        Location: yeelight://192.168.1.239:55443\r\n\
        Server: POSIX UPnP/1.0 YGLC/1\r\n\
        id: 0x000000000015243f\r\n\
        model: color\r\n\
        fw_ver: 18\r\n\
        support: get_prop set_default set_power toggle set_bright start_cf stop_cf\r\n\
        power: on\r\n\
        bright: 100\r\n\
        color_mode: 2\r\n\
        ct: 4000\r\n\
        rgb: 16711680\r\n\
        hue: 100\r\n\
        sat: 35\r\n\
        name: \r\n";

    #[test]
    fn search_message_format() {
        assert_eq!(
            search_message(),
            "M-SEARCH * HTTP/1.1\r\nHOST: 239.255.255.250:1982\r\nMAN: \"ssdp:discover\"\r\nST: wifi_bulb"
        );
    }

    #[test]
    fn parse_full_reply() {
        let bulb = parse_reply(REPLY).unwrap();
        assert_eq!(bulb.ip, "192.168.1.239");
        assert_eq!(bulb.port, 55443);
        assert_eq!(bulb.id(), Some("0x000000000015243f"));
        assert_eq!(bulb.model(), Some("color"));
        assert_eq!(bulb.firmware_version(), Some("18"));
        assert_eq!(bulb.capability("ct"), Some("4000"));
        assert_eq!(bulb.name(), None);
    }

    #[test]
    fn only_lower_case_headers_are_capabilities() {
        let bulb = parse_reply(REPLY).unwrap();
        assert!(!bulb.capabilities.contains_key("Location"));
        assert!(!bulb.capabilities.contains_key("Server"));
        assert!(bulb.capabilities.contains_key("fw_ver"));
    }

    #[test]
    fn supports_checks_whole_method_names() {
        let bulb = parse_reply(REPLY).unwrap();
        assert!(bulb.supports("start_cf"));
        assert!(!bulb.supports("start"));
        assert!(!bulb.supports("set_music"));
    }

    #[test]
    fn missing_location_is_an_error() {
        let err = parse_reply("HTTP/1.1 200 OK\r\nmodel: mono\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingField(_)));
    }

    #[test]
    fn builder_carries_address_and_model() {
        let bulb = parse_reply(REPLY).unwrap().bulb().build().unwrap();
        assert_eq!(bulb.host(), "192.168.1.239");
        assert_eq!(bulb.model(), Some("color"));
    }

    #[test]
    fn options_default_timeout() {
        assert_eq!(DiscoveryOptions::new().timeout(), Duration::from_secs(2));
        assert!(DiscoveryOptions::new().interface().is_none());
    }
}
