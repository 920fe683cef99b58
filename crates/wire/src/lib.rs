// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire formats of the deployment API.
//!
//! - Snapshot: JSON body of `GET /deploy/{id}`
//! - Live channel: WebSocket text frames on `/deploy/{id}/logs?from=N`

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod frame;
mod snapshot;

pub use frame::{ChannelMode, Frame, FrameDecoder};
pub use snapshot::SnapshotBody;

use thiserror::Error;

/// Errors decoding API payloads
#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed json: {0}")]
    Json(#[source] serde_json::Error),
    #[error("unexpected text frame: {0:?}")]
    UnexpectedText(String),
    #[error("invalid sequence: {0}")]
    InvalidSequence(i64),
    #[error("unknown channel mode: {0}")]
    UnknownChannelMode(String),
}

/// Decode a snapshot body.
pub fn decode_snapshot(body: &str) -> Result<SnapshotBody, WireError> {
    serde_json::from_str(body).map_err(WireError::Json)
}

/// Path of the snapshot endpoint, relative to the API base.
pub fn snapshot_path(job_id: &str) -> String {
    format!("/deploy/{job_id}")
}

/// Path and query of the live channel, relative to the WebSocket base.
pub fn live_path(job_id: &str, resume_from: u64) -> String {
    format!("/deploy/{job_id}/logs?from={resume_from}")
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
