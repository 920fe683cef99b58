// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only mirror of a watched deployment's log.

use chrono::{DateTime, SecondsFormat, Utc};
use dw_core::ObserverEvent;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::output::gap_message;

/// Writes merged events to a file, one per line:
///
/// ```text
/// 2026-01-30T08:14:09Z [12] Step 3/9 : RUN npm ci
/// 2026-01-30T08:14:15Z [gap] … 1 line missing (13..=13) …
/// 2026-01-30T08:15:02Z [status] ready
/// ```
///
/// Lines carry the producer's timestamp; gap and status entries carry the
/// time they were observed. The file is opened per write.
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append `event`.
    ///
    /// Failures are logged via tracing but do not propagate; the terminal
    /// output stays authoritative.
    pub fn append(&self, event: &ObserverEvent) {
        if let Err(e) = self.write_event(event, Utc::now()) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write log file");
        }
    }

    fn write_event(&self, event: &ObserverEvent, now: DateTime<Utc>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", format_entry(event, now))
    }
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn format_entry(event: &ObserverEvent, now: DateTime<Utc>) -> String {
    match event {
        ObserverEvent::Line(line) => format!("{} [{}] {}", rfc3339(line.timestamp), line.sequence, line.text),
        ObserverEvent::Gap { from, to } => format!("{} [gap] {}", rfc3339(now), gap_message(*from, *to)),
        ObserverEvent::Status { status, .. } => format!("{} [status] {}", rfc3339(now), status),
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
