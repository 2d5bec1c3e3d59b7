// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process mock bulb for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// What the mock does after reading a command.
pub enum Reply {
    /// Write these lines, each terminated with `\r\n`.
    Lines(Vec<String>),
    /// Write these bytes verbatim.
    Raw(Vec<u8>),
    /// Close the connection without answering.
    Close,
    /// Read the next command without answering.
    Silent,
}

/// What the mock does when asked to start music mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectBack {
    /// Connect back and record the commands streamed to it.
    Record,
    /// Connect back, then close the connection at once.
    Drop,
    /// Never connect back.
    Never,
}

pub type Handler = Arc<dyn Fn(&Value) -> Reply + Send + Sync>;

/// A fake bulb listening on localhost.
pub struct MockBulb {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Value>>>,
    music_received: Arc<Mutex<Vec<Value>>>,
    connections: Arc<Mutex<usize>>,
}

impl MockBulb {
    /// Starts a mock that answers every command with `handler`.
    ///
    /// `set_music [1, ip, port]` is answered by `handler` and followed by a
    /// connection to `ip:port` whose incoming commands are recorded
    /// separately.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Value) -> Reply + Send + Sync + 'static,
    {
        Self::start_with(handler, ConnectBack::Record).await
    }

    pub async fn start_with<F>(handler: F, connect_back: ConnectBack) -> Self
    where
        F: Fn(&Value) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler: Handler = Arc::new(handler);
        let received = Arc::new(Mutex::new(Vec::new()));
        let music_received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(Mutex::new(0));

        let (rx, mrx, conns) = (
            Arc::clone(&received),
            Arc::clone(&music_received),
            Arc::clone(&connections),
        );
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                *conns.lock() += 1;
                tokio::spawn(serve(
                    stream,
                    Arc::clone(&handler),
                    Arc::clone(&rx),
                    Arc::clone(&mrx),
                    connect_back,
                ));
            }
        });

        Self {
            addr,
            received,
            music_received,
            connections,
        }
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Commands received on the control connection(s), in order.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().clone()
    }

    /// Method names received on the control connection(s), in order.
    pub fn methods(&self) -> Vec<String> {
        self.received()
            .iter()
            .map(|c| c["method"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// Control connection commands other than `get_prop`, in order.
    pub fn commands(&self) -> Vec<Value> {
        self.received()
            .into_iter()
            .filter(|c| c["method"] != "get_prop")
            .collect()
    }

    /// Commands received on the music connection, in order.
    pub fn music_received(&self) -> Vec<Value> {
        self.music_received.lock().clone()
    }

    pub fn connection_count(&self) -> usize {
        *self.connections.lock()
    }

    /// Waits until `count` music commands have arrived.
    pub async fn wait_for_music(&self, count: usize) -> Vec<Value> {
        for _ in 0..200 {
            let got = self.music_received();
            if got.len() >= count {
                return got;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {count} music commands, got {:?}", self.music_received());
    }
}

async fn serve(
    stream: TcpStream,
    handler: Handler,
    received: Arc<Mutex<Vec<Value>>>,
    music_received: Arc<Mutex<Vec<Value>>>,
    connect_back: ConnectBack,
) {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let command: Value = serde_json::from_str(&line).unwrap();
        received.lock().push(command.clone());

        let is_music_start = command["method"] == "set_music" && command["params"][0] == 1;
        if is_music_start && connect_back != ConnectBack::Never {
            let target = format!(
                "{}:{}",
                command["params"][1].as_str().unwrap(),
                command["params"][2]
            );
            if connect_back == ConnectBack::Record {
                tokio::spawn(record_music(target, Arc::clone(&music_received)));
            } else {
                tokio::spawn(async move {
                    drop(TcpStream::connect(target).await.unwrap());
                });
            }
        }

        match handler(&command) {
            Reply::Lines(replies) => {
                for reply in replies {
                    write.write_all(format!("{reply}\r\n").as_bytes()).await.unwrap();
                }
            }
            Reply::Raw(bytes) => write.write_all(&bytes).await.unwrap(),
            Reply::Close => return,
            Reply::Silent => {}
        }
    }
}

async fn record_music(target: String, music_received: Arc<Mutex<Vec<Value>>>) {
    let stream = TcpStream::connect(target).await.unwrap();
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        music_received.lock().push(serde_json::from_str(&line).unwrap());
    }
}

/// The standard success answer for a command.
pub fn ok(command: &Value) -> String {
    json!({"id": command["id"], "result": ["ok"]}).to_string()
}

/// A `props` notification.
pub fn notification(params: Value) -> String {
    json!({"method": "props", "params": params}).to_string()
}

/// Answers `get_prop` from `props` (missing names answer `""`) and
/// everything else with `ok`.
pub fn answer_with(props: Value) -> impl Fn(&Value) -> Reply + Send + Sync + 'static {
    move |command| {
        if command["method"] == "get_prop" {
            let values: Vec<Value> = command["params"]
                .as_array()
                .unwrap()
                .iter()
                .map(|name| props.get(name.as_str().unwrap()).cloned().unwrap_or(json!("")))
                .collect();
            Reply::Lines(vec![json!({"id": command["id"], "result": values}).to_string()])
        } else {
            Reply::Lines(vec![ok(command)])
        }
    }
}

/// Answers `get_prop` with the light on and delegates everything else.
pub fn lit<F>(handler: F) -> impl Fn(&Value) -> Reply + Send + Sync + 'static
where
    F: Fn(&Value) -> Reply + Send + Sync + 'static,
{
    let answer = answer_with(json!({"power": "on"}));
    move |command| {
        if command["method"] == "get_prop" {
            answer(command)
        } else {
            handler(command)
        }
    }
}
