// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequenced log lines and the delivery watermark.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of job output.
///
/// `sequence` is assigned by the producer and is gap-free per job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub sequence: u64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl LogLine {
    pub fn new(sequence: u64, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { sequence, text: text.into(), timestamp }
    }
}

crate::builder! {
    pub struct LogLineBuilder => LogLine {
        into { text: String = "line" }
        set {
            sequence: u64 = 0,
            timestamp: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Sequence number the consumer expects next, given the highest sequence
/// already delivered (`None` when nothing has been delivered).
pub fn next_sequence(watermark: Option<u64>) -> u64 {
    match watermark {
        Some(seq) => seq.saturating_add(1),
        None => 0,
    }
}

/// Highest sequence in `lines`, if any.
pub fn last_sequence(lines: &[LogLine]) -> Option<u64> {
    lines.iter().map(|l| l.sequence).max()
}

#[cfg(test)]
#[path = "log_line_tests.rs"]
mod tests;
