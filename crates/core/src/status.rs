// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment lifecycle status.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of a deployment job.
///
/// `Ready`, `Failed` and `Cancelled` are terminal: once a job reaches one of
/// them no further transitions occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Queued, no builder has picked it up yet
    Pending,
    /// Builder is running
    Building,
    /// Image built, rollout in progress
    Deploying,
    Ready,
    /// Older backends report failures as `error`
    #[serde(alias = "error")]
    Failed,
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Pending,
        Status::Building,
        Status::Deploying,
        Status::Ready,
        Status::Failed,
        Status::Cancelled,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Ready | Status::Failed | Status::Cancelled)
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Any change away from a terminal status is rejected; repeating the same
    /// terminal status is not a change and is allowed. Non-terminal statuses
    /// may move in any order.
    pub fn can_transition_to(self, next: Status) -> bool {
        !self.is_terminal() || self == next
    }
}

crate::simple_display! {
    Status {
        Pending => "pending",
        Building => "building",
        Deploying => "deploying",
        Ready => "ready",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Status::Pending),
            "building" => Ok(Status::Building),
            "deploying" => Ok(Status::Deploying),
            "ready" => Ok(Status::Ready),
            "failed" | "error" => Ok(Status::Failed),
            "cancelled" => Ok(Status::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
