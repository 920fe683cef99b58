// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot endpoint: one-shot fetch of a deployment's persisted state.

use async_trait::async_trait;
use dw_core::{Clock, JobId, Snapshot, SystemClock};
use std::time::Duration;
use thiserror::Error;

use crate::endpoint::Endpoint;
use crate::http;

/// Errors from fetching a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("deployment not found: {0}")]
    NotFound(JobId),
    #[error("snapshot unavailable: {0}")]
    Transient(String),
    #[error("snapshot request rejected: {0}")]
    Rejected(String),
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

impl SnapshotError {
    /// Whether the caller may retry the fetch.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SnapshotError::Transient(_))
    }
}

/// Source of deployment snapshots.
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    async fn fetch(&self, job_id: &JobId) -> Result<Snapshot, SnapshotError>;
}

/// Fetches snapshots from `GET {api}/deploy/{id}`.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource<C: Clock = SystemClock> {
    endpoint: Endpoint,
    token: Option<String>,
    timeout: Duration,
    clock: C,
}

impl HttpSnapshotSource<SystemClock> {
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_clock(endpoint, SystemClock)
    }
}

impl<C: Clock> HttpSnapshotSource<C> {
    pub fn with_clock(endpoint: Endpoint, clock: C) -> Self {
        Self { endpoint, token: None, timeout: Duration::from_secs(5), clock }
    }

    dw_core::setters! {
        set { timeout: Duration }
        option { token: String }
    }
}

#[async_trait]
impl<C: Clock> SnapshotSource for HttpSnapshotSource<C> {
    async fn fetch(&self, job_id: &JobId) -> Result<Snapshot, SnapshotError> {
        let path = dw_wire::snapshot_path(job_id);
        tracing::debug!(%job_id, endpoint = %self.endpoint, "snapshot: GET {}", path);
        let resp = http::get(&self.endpoint, &path, self.token.as_deref(), self.timeout)
            .await
            .map_err(SnapshotError::Transient)?;

        match resp.status {
            404 => return Err(SnapshotError::NotFound(job_id.clone())),
            s if s >= 500 || s == 408 || s == 429 => {
                return Err(SnapshotError::Transient(format!("HTTP {}: {}", s, resp.body.trim())))
            }
            s if !resp.is_success() => {
                return Err(SnapshotError::Rejected(format!("HTTP {}: {}", s, resp.body.trim())))
            }
            _ => {}
        }

        let body =
            dw_wire::decode_snapshot(&resp.body).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
        if body.id != *job_id {
            return Err(SnapshotError::Malformed(format!(
                "requested {} but received {}",
                job_id, body.id
            )));
        }
        body.into_snapshot(self.clock.utc_now()).map_err(|e| SnapshotError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
