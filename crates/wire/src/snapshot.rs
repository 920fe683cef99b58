// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Body of `GET /deploy/{id}`.

use chrono::{DateTime, Utc};
use dw_core::{Deployment, JobId, LogLine, ProjectId, Snapshot, Status};
use serde::{Deserialize, Serialize};

use crate::WireError;

/// JSON shape returned by the snapshot endpoint.
///
/// Logs arrive either as sequenced `log_lines` or as a single `build_logs`
/// text blob. When both are present the sequenced form wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotBody {
    pub id: JobId,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_logs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_lines: Option<Vec<LogLine>>,
    /// `-1` or absent when nothing has been logged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sequence: Option<i64>,
}

impl SnapshotBody {
    /// Convert into a [`Snapshot`].
    ///
    /// Text-blob lines carry no timestamp; they are stamped with `updated_at`,
    /// falling back to `now`.
    pub fn into_snapshot(self, now: DateTime<Utc>) -> Result<Snapshot, WireError> {
        let reported = match self.last_sequence {
            Some(seq) if seq < -1 => return Err(WireError::InvalidSequence(seq)),
            Some(seq) => u64::try_from(seq).ok(),
            None => None,
        };

        let mut lines = match (self.log_lines, self.build_logs) {
            (Some(lines), _) => lines,
            (None, Some(text)) => {
                number_text_lines(&text, reported, self.updated_at.unwrap_or(now))
            }
            (None, None) => Vec::new(),
        };
        lines.sort_by_key(|l| l.sequence);
        lines.dedup_by_key(|l| l.sequence);

        let last_sequence = match (reported, dw_core::last_sequence(&lines)) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        Ok(Snapshot {
            job_id: self.id,
            status: self.status,
            lines,
            last_sequence,
            deployment: Deployment {
                project_id: self.project_id.filter(|p| !p.is_empty()),
                subdomain: non_empty(self.subdomain),
                commit_hash: non_empty(self.commit_hash),
                image_url: non_empty(self.image_url),
                created_at: self.created_at,
            },
        })
    }
}

/// Split a log blob into lines and number them.
///
/// Lines end at the reported last sequence when it can hold them all,
/// otherwise they are numbered from zero. A trailing newline does not
/// produce an empty line.
pub(crate) fn number_text_lines(
    text: &str,
    last_sequence: Option<u64>,
    timestamp: DateTime<Utc>,
) -> Vec<LogLine> {
    if text.is_empty() {
        return Vec::new();
    }
    let texts: Vec<&str> = text.strip_suffix('\n').unwrap_or(text).split('\n').collect();
    let span = texts.len() as u64 - 1;
    let first = match last_sequence {
        Some(last) if last >= span => last - span,
        _ => 0,
    };
    texts
        .into_iter()
        .enumerate()
        .map(|(i, t)| LogLine::new(first + i as u64, t.trim_end_matches('\r'), timestamp))
        .collect()
}

/// Go encodes unset strings as `""`.
fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
