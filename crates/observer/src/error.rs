// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use dw_core::JobId;
use thiserror::Error;

/// Fatal errors of an observation session.
///
/// Live channel failures are not listed: they are retried for as long as the
/// job is running and only show up in the connection state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserveError {
    #[error("deployment not found: {0}")]
    NotFound(JobId),
    #[error("snapshot unavailable after {attempts} attempt(s): {reason}")]
    TransientFetch { attempts: u32, reason: String },
    #[error("snapshot request rejected: {0}")]
    SnapshotRejected(String),
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}
