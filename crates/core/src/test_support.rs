// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{LogLine, ObserverEvent, Status};
use chrono::{DateTime, Utc};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core types.
pub mod strategies {
    use crate::status::Status;
    use proptest::prelude::*;

    pub fn arb_status() -> impl Strategy<Value = Status> {
        prop::sample::select(Status::ALL.to_vec())
    }

    pub fn arb_non_terminal_status() -> impl Strategy<Value = Status> {
        prop_oneof![Just(Status::Pending), Just(Status::Building), Just(Status::Deploying)]
    }
}

// ── Factory functions ───────────────────────────────────────────────────

/// A log line whose text is derived from its sequence (`line 4`).
pub fn line(sequence: u64) -> LogLine {
    LogLine::new(sequence, format!("line {sequence}"), timestamp(sequence))
}

/// Lines for every sequence in `range`.
pub fn lines(range: std::ops::RangeInclusive<u64>) -> Vec<LogLine> {
    range.map(line).collect()
}

/// Deterministic timestamp: `sequence` seconds after the epoch.
pub fn timestamp(sequence: u64) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::seconds(sequence as i64)
}

pub fn status_event(previous: Option<Status>, status: Status) -> ObserverEvent {
    ObserverEvent::Status { previous, status }
}

/// Sequences of the line events in `events`, in order.
pub fn sequences(events: &[ObserverEvent]) -> Vec<u64> {
    events.iter().filter_map(ObserverEvent::sequence).collect()
}
