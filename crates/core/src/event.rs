// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events flowing into and out of an observation session.

use crate::log_line::LogLine;
use crate::status::Status;
use serde::{Deserialize, Serialize};

/// Event decoded from the live channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    Line(LogLine),
    Status(Status),
}

/// Event delivered to a consumer, in merge order.
///
/// Serializes as `{"type": "line" | "status" | "gap", ...fields}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObserverEvent {
    Line(LogLine),
    Status {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<Status>,
        status: Status,
    },
    /// Sequences `from..=to` will never be delivered.
    Gap { from: u64, to: u64 },
}

impl ObserverEvent {
    pub fn sequence(&self) -> Option<u64> {
        match self {
            ObserverEvent::Line(line) => Some(line.sequence),
            _ => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, ObserverEvent::Gap { .. })
    }
}

/// Connection state of a session's live channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Live,
    /// Absorbing: the job is finished or the session ended.
    Terminal,
}

crate::simple_display! {
    ConnectionState {
        Disconnected => "disconnected",
        Connecting => "connecting",
        Live => "live",
        Terminal => "terminal",
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
