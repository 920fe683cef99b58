// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process deployment API: a snapshot endpoint and a scripted live channel.

use futures_util::SinkExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Message;

/// What one live connection does after the handshake.
#[derive(Clone, Debug)]
pub struct Connection {
    frames: Vec<String>,
    hold: bool,
}

impl Connection {
    /// Send `frames`, then close.
    pub fn frames<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { frames: frames.into_iter().map(Into::into).collect(), hold: false }
    }

    /// Keep the connection open after the frames.
    pub fn hold(mut self) -> Self {
        self.hold = true;
        self
    }
}

pub fn log(sequence: u64, text: &str) -> String {
    serde_json::json!({ "type": "log", "sequence": sequence, "text": text, "timestamp": "2026-01-30T08:14:09Z" })
        .to_string()
}

pub fn status(status: &str) -> String {
    serde_json::json!({ "type": "status", "status": status }).to_string()
}

#[derive(Default)]
struct Shared {
    connections: Mutex<VecDeque<Connection>>,
    live_uris: Mutex<Vec<String>>,
    snapshot_requests: Mutex<Vec<String>>,
    authorizations: Mutex<Vec<Option<String>>>,
}

/// Running stub. Dropping it shuts the servers down.
pub struct Stub {
    pub api_url: String,
    pub ws_url: String,
    shared: Arc<Shared>,
    _rt: Runtime,
}

pub struct StubBuilder {
    snapshot_status: u16,
    snapshot_body: String,
    connections: Vec<Connection>,
}

impl Stub {
    pub fn builder() -> StubBuilder {
        StubBuilder { snapshot_status: 404, snapshot_body: "not found".into(), connections: Vec::new() }
    }

    /// Request URIs of every accepted live connection, in order.
    pub fn live_uris(&self) -> Vec<String> {
        self.shared.live_uris.lock().unwrap().clone()
    }

    pub fn snapshot_requests(&self) -> Vec<String> {
        self.shared.snapshot_requests.lock().unwrap().clone()
    }

    /// `Authorization` header of each snapshot request.
    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.shared.authorizations.lock().unwrap().clone()
    }
}

impl StubBuilder {
    pub fn snapshot(mut self, body: serde_json::Value) -> Self {
        self.snapshot_status = 200;
        self.snapshot_body = body.to_string();
        self
    }

    pub fn snapshot_error(mut self, status: u16, body: &str) -> Self {
        self.snapshot_status = status;
        self.snapshot_body = body.to_string();
        self
    }

    pub fn connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    pub fn start(self) -> Stub {
        let rt = tokio::runtime::Builder::new_multi_thread().worker_threads(2).enable_all().build().unwrap();
        let shared = Arc::new(Shared {
            connections: Mutex::new(self.connections.into()),
            ..Shared::default()
        });

        let (api, ws) = rt.block_on(async {
            let api = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let ws = TcpListener::bind("127.0.0.1:0").await.unwrap();
            (api, ws)
        });
        let api_url = format!("http://{}/api", api.local_addr().unwrap());
        let ws_url = format!("ws://{}/api", ws.local_addr().unwrap());

        let status = self.snapshot_status;
        let body = Arc::new(self.snapshot_body);
        let http_shared = Arc::clone(&shared);
        rt.spawn(async move {
            while let Ok((socket, _)) = api.accept().await {
                let shared = Arc::clone(&http_shared);
                let body = Arc::clone(&body);
                tokio::spawn(async move { serve_http(socket, status, &body, &shared).await });
            }
        });

        let ws_shared = Arc::clone(&shared);
        rt.spawn(async move {
            while let Ok((socket, _)) = ws.accept().await {
                let shared = Arc::clone(&ws_shared);
                tokio::spawn(async move { serve_live(socket, &shared).await });
            }
        });

        Stub { api_url, ws_url, shared, _rt: rt }
    }
}

async fn serve_http(mut socket: TcpStream, status: u16, body: &str, shared: &Shared) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf);
    let mut lines = request.lines();
    if let Some(line) = lines.next() {
        shared.snapshot_requests.lock().unwrap().push(line.to_string());
    }
    let auth = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value.trim().to_string());
    shared.authorizations.lock().unwrap().push(auth);
    let response = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn serve_live(socket: TcpStream, shared: &Shared) {
    let Some(script) = shared.connections.lock().unwrap().pop_front() else {
        // Unscripted: refuse before the handshake
        return;
    };
    let (uri_tx, uri_rx) = std::sync::mpsc::channel();
    let Ok(mut ws) = tokio_tungstenite::accept_hdr_async(socket, move |req: &Request, resp: Response| {
        let _ = uri_tx.send(req.uri().to_string());
        Ok(resp)
    })
    .await
    else {
        return;
    };
    if let Ok(uri) = uri_rx.recv() {
        shared.live_uris.lock().unwrap().push(uri);
    }
    for frame in script.frames {
        if ws.send(Message::text(frame)).await.is_err() {
            return;
        }
    }
    if script.hold {
        tokio::time::sleep(Duration::from_secs(3600)).await;
    }
    let _ = ws.close(None).await;
}
