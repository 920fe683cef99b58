// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live channel text frames.
//!
//! Sequenced frames are JSON objects tagged by `type`:
//!
//! ```text
//! {"type":"log","sequence":12,"text":"Building project...","timestamp":"2026-01-30T08:14:09Z"}
//! {"type":"status","status":"deploying"}
//! ```

use chrono::{DateTime, Utc};
use dw_core::{LiveEvent, LogLine, Status};
use serde::{Deserialize, Serialize};

use crate::WireError;

/// How the live channel numbers its lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelMode {
    /// JSON frames with producer-assigned sequences; the channel honors the
    /// resume offset.
    #[default]
    Sequenced,
    /// Raw text frames without sequences or resume support. Every connection
    /// replays the full history, so lines are numbered per connection from
    /// zero and the watermark drops the replayed prefix.
    ReplayAll,
}

dw_core::simple_display! {
    ChannelMode {
        Sequenced => "sequenced",
        ReplayAll => "replay-all",
    }
}

impl std::str::FromStr for ChannelMode {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequenced" => Ok(ChannelMode::Sequenced),
            "replay-all" | "replay_all" => Ok(ChannelMode::ReplayAll),
            other => Err(WireError::UnknownChannelMode(other.to_string())),
        }
    }
}

/// A decoded JSON frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Log {
        sequence: u64,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<DateTime<Utc>>,
    },
    Status { status: Status },
}

impl Frame {
    fn into_event(self, now: DateTime<Utc>) -> LiveEvent {
        match self {
            Frame::Log { sequence, text, timestamp } => {
                LiveEvent::Line(LogLine::new(sequence, text, timestamp.unwrap_or(now)))
            }
            Frame::Status { status } => LiveEvent::Status(status),
        }
    }
}

/// Per-connection frame decoder.
///
/// Create a new decoder for every connection: in [`ChannelMode::ReplayAll`]
/// the line counter restarts with the replay.
#[derive(Debug)]
pub struct FrameDecoder {
    mode: ChannelMode,
    next_plain: u64,
}

impl FrameDecoder {
    pub fn new(mode: ChannelMode) -> Self {
        Self { mode, next_plain: 0 }
    }

    /// Decode one text frame into zero or more events.
    ///
    /// In replay-all mode a frame that is not a JSON object is treated as one
    /// or more raw log lines (blank frames yield nothing); JSON frames are
    /// still honored so status updates keep working.
    pub fn decode(&mut self, text: &str, now: DateTime<Utc>) -> Result<Vec<LiveEvent>, WireError> {
        let trimmed = text.trim_start();
        if trimmed.starts_with('{') {
            let frame: Frame = serde_json::from_str(text).map_err(WireError::Json)?;
            return Ok(vec![frame.into_event(now)]);
        }
        match self.mode {
            ChannelMode::Sequenced => Err(WireError::UnexpectedText(preview(text))),
            ChannelMode::ReplayAll => {
                if text.trim().is_empty() {
                    return Ok(Vec::new());
                }
                let body = text.strip_suffix('\n').unwrap_or(text);
                Ok(body
                    .split('\n')
                    .map(|line| {
                        let seq = self.next_plain;
                        self.next_plain += 1;
                        LiveEvent::Line(LogLine::new(seq, line.trim_end_matches('\r'), now))
                    })
                    .collect())
            }
        }
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 60;
    let short = dw_core::short(text, MAX);
    if short.len() < text.len() {
        format!("{short}...")
    } else {
        short.to_string()
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
