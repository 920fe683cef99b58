// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot snapshot load with bounded retries.

use dw_adapters::{SnapshotError, SnapshotSource};
use dw_core::{JobId, Snapshot};
use std::time::Duration;

use crate::backoff::Backoff;
use crate::config::ObserverConfig;
use crate::error::ObserveError;

/// Fetch the snapshot for `job_id`, retrying transient failures.
///
/// Not-found, rejected and malformed responses fail immediately.
pub async fn load<S>(
    source: &S,
    job_id: &JobId,
    config: &ObserverConfig,
) -> Result<Snapshot, ObserveError>
where
    S: SnapshotSource + ?Sized,
{
    let attempts = config.snapshot_attempts.max(1);
    let delays = Backoff::new(config.snapshot_backoff_base, Duration::MAX);
    let mut attempt = 1;
    loop {
        tracing::debug!(%job_id, attempt, "snapshot: fetching");
        let err = match source.fetch(job_id).await {
            Ok(snapshot) => {
                tracing::info!(
                    %job_id,
                    status = %snapshot.status,
                    lines = snapshot.lines.len(),
                    last_sequence = ?snapshot.last_sequence,
                    "snapshot: loaded"
                );
                return Ok(snapshot);
            }
            Err(SnapshotError::NotFound(id)) => return Err(ObserveError::NotFound(id)),
            Err(SnapshotError::Rejected(reason)) => return Err(ObserveError::SnapshotRejected(reason)),
            Err(SnapshotError::Malformed(reason)) => {
                tracing::error!(%job_id, %reason, "snapshot: malformed");
                return Err(ObserveError::ProtocolViolation(format!("snapshot: {reason}")));
            }
            Err(SnapshotError::Transient(reason)) => reason,
        };

        if attempt >= attempts {
            tracing::warn!(%job_id, attempt, error = %err, "snapshot: giving up");
            return Err(ObserveError::TransientFetch { attempts, reason: err });
        }
        let delay = delays.ceiling(attempt - 1);
        tracing::warn!(%job_id, attempt, ?delay, error = %err, "snapshot: retrying");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
