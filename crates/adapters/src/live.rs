// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live channel: a WebSocket subscription to a deployment's log/status tail.

use async_trait::async_trait;
use dw_core::{Clock, JobId, LiveEvent, SystemClock};
use dw_wire::{ChannelMode, FrameDecoder};
use futures_util::StreamExt;
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::header::{HeaderValue, AUTHORIZATION};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::endpoint::Endpoint;

/// Errors from the live channel.
///
/// `Connect` and `Transport` are recoverable by reconnecting; `Malformed`
/// means the producer sent something the decoder cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed frame: {0}")]
    Malformed(String),
}

/// Opens live subscriptions.
#[async_trait]
pub trait LiveChannel: Send + Sync + 'static {
    /// Subscribe to `job_id`, asking the producer to start at `resume_from`.
    async fn open(
        &self,
        job_id: &JobId,
        resume_from: u64,
    ) -> Result<Box<dyn LiveStream>, ChannelError>;
}

/// One open subscription.
#[async_trait]
pub trait LiveStream: Send {
    /// Next event, or `None` once the channel has closed.
    ///
    /// Cancel-safe: dropping the returned future loses no event.
    async fn next_event(&mut self) -> Option<Result<LiveEvent, ChannelError>>;
}

/// WebSocket live channel at `{ws}/deploy/{id}/logs?from={n}`.
#[derive(Debug, Clone)]
pub struct WsLiveChannel<C: Clock = SystemClock> {
    endpoint: Endpoint,
    token: Option<String>,
    mode: ChannelMode,
    connect_timeout: Duration,
    clock: C,
}

impl WsLiveChannel<SystemClock> {
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_clock(endpoint, SystemClock)
    }
}

impl<C: Clock> WsLiveChannel<C> {
    pub fn with_clock(endpoint: Endpoint, clock: C) -> Self {
        Self {
            endpoint,
            token: None,
            mode: ChannelMode::default(),
            connect_timeout: Duration::from_secs(5),
            clock,
        }
    }

    dw_core::setters! {
        set {
            mode: ChannelMode,
            connect_timeout: Duration,
        }
        option { token: String }
    }

    /// Handshake request; the token rides in `Authorization`, never the URI.
    fn request(&self, job_id: &JobId, resume_from: u64) -> Result<Request, ChannelError> {
        let uri = self.endpoint.url(&dw_wire::live_path(job_id, resume_from));
        let mut request =
            uri.into_client_request().map_err(|e| ChannelError::Connect(format!("request: {e}")))?;
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ChannelError::Connect(format!("token: {e}")))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        Ok(request)
    }
}

#[async_trait]
impl<C: Clock> LiveChannel for WsLiveChannel<C> {
    async fn open(
        &self,
        job_id: &JobId,
        resume_from: u64,
    ) -> Result<Box<dyn LiveStream>, ChannelError> {
        let request = self.request(job_id, resume_from)?;
        let addr = self.endpoint.addr();

        let connect = async {
            let stream = TcpStream::connect(&addr)
                .await
                .map_err(|e| ChannelError::Connect(format!("{addr}: {e}")))?;
            tokio_tungstenite::client_async(request, stream)
                .await
                .map_err(|e| ChannelError::Connect(format!("handshake: {e}")))
        };
        let (ws, _) = tokio::time::timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| ChannelError::Connect(format!("{addr}: timed out")))??;

        if self.mode == ChannelMode::ReplayAll {
            tracing::warn!(%job_id, "ws live: replay-all mode, server replays full history");
        }
        tracing::info!(%job_id, resume_from, mode = %self.mode, "ws live: connected");

        Ok(Box::new(WsLiveStream {
            ws,
            decoder: FrameDecoder::new(self.mode),
            pending: VecDeque::new(),
            clock: self.clock.clone(),
            job_id: job_id.clone(),
        }))
    }
}

struct WsLiveStream<C: Clock> {
    ws: WebSocketStream<TcpStream>,
    decoder: FrameDecoder,
    /// Events decoded from a frame but not yet handed out
    pending: VecDeque<LiveEvent>,
    clock: C,
    job_id: JobId,
}

#[async_trait]
impl<C: Clock> LiveStream for WsLiveStream<C> {
    async fn next_event(&mut self) -> Option<Result<LiveEvent, ChannelError>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    match self.decoder.decode(text.as_str(), self.clock.utc_now()) {
                        Ok(events) => self.pending.extend(events),
                        Err(e) => return Some(Err(ChannelError::Malformed(e.to_string()))),
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(job_id = %self.job_id, ?frame, "ws live: received close frame");
                    return None;
                }
                Some(Err(e)) => {
                    tracing::warn!(job_id = %self.job_id, %e, "ws live: error");
                    return Some(Err(ChannelError::Transport(e.to_string())));
                }
                None => {
                    tracing::info!(job_id = %self.job_id, "ws live: stream ended");
                    return None;
                }
                _ => {} // Ping/Pong/Binary: ignore
            }
        }
    }
}

#[cfg(test)]
#[path = "live_tests.rs"]
mod tests;
