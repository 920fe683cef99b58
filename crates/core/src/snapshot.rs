// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted state of a deployment at the moment an observation starts.

use crate::id::{JobId, ProjectId};
use crate::log_line::LogLine;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptive fields of a deployment, carried alongside the snapshot so
/// consumers can render a header without a second request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Domain under which ready deployments are served.
pub const DEPLOY_DOMAIN: &str = "dejavu.id";

impl Deployment {
    /// Public URL of the deployment, when a subdomain has been assigned.
    pub fn url(&self) -> Option<String> {
        self.subdomain
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("https://{s}.{DEPLOY_DOMAIN}"))
    }

    /// First seven characters of the commit hash.
    pub fn short_commit(&self) -> Option<&str> {
        self.commit_hash.as_deref().filter(|s| !s.is_empty()).map(|s| crate::id::short(s, 7))
    }
}

/// One-shot view of a job: status plus every log line persisted so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub job_id: JobId,
    pub status: Status,
    /// Lines in ascending sequence order.
    pub lines: Vec<LogLine>,
    /// Highest sequence the producer had persisted, `None` when the log is empty.
    pub last_sequence: Option<u64>,
    #[serde(default)]
    pub deployment: Deployment,
}

impl Snapshot {
    /// Watermark to start merging from, before the snapshot's own lines.
    ///
    /// The snapshot is authoritative about where the log begins: when it
    /// carries lines, everything below its first line is treated as already
    /// delivered. An empty snapshot starts from its `last_sequence`.
    pub fn baseline(&self) -> Option<u64> {
        match self.lines.iter().map(|l| l.sequence).min() {
            Some(first) => first.checked_sub(1),
            None => self.last_sequence,
        }
    }
}

crate::builder! {
    pub struct SnapshotBuilder => Snapshot {
        into { job_id: JobId = "job-1" }
        set {
            status: Status = Status::Building,
            lines: Vec<LogLine> = Vec::new(),
            last_sequence: Option<u64> = None,
            deployment: Deployment = Deployment::default(),
        }
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
