// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use dw_core::Status;
use dw_observer::ObserveError;
use std::fmt;

pub mod codes {
    /// The deployment ended `failed` or `cancelled`
    pub const JOB_FAILED: i32 = 1;
    /// Invalid configuration
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const PROTOCOL_VIOLATION: i32 = 4;
    pub const SNAPSHOT_UNAVAILABLE: i32 = 5;
    /// Ctrl-C
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Exit for a deployment that finished in `status`, if it was not a success.
    pub fn for_final_status(job_id: &str, status: Status) -> Option<Self> {
        match status {
            Status::Failed | Status::Cancelled => {
                Some(Self::new(codes::JOB_FAILED, format!("deployment {job_id} {status}")))
            }
            _ => None,
        }
    }
}

impl From<ObserveError> for ExitError {
    fn from(err: ObserveError) -> Self {
        let code = match err {
            ObserveError::NotFound(_) => codes::NOT_FOUND,
            ObserveError::ProtocolViolation(_) => codes::PROTOCOL_VIOLATION,
            ObserveError::TransientFetch { .. } | ObserveError::SnapshotRejected(_) => {
                codes::SNAPSHOT_UNAVAILABLE
            }
        };
        Self::new(code, err.to_string())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
