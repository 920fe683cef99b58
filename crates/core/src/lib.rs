// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dw-core: Domain types shared by the deployment watcher crates

pub mod macros;

pub mod clock;
pub mod event;
pub mod id;
pub mod log_line;
pub mod snapshot;
pub mod status;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use event::{ConnectionState, LiveEvent, ObserverEvent};
pub use id::{short, JobId, ProjectId};
#[cfg(any(test, feature = "test-support"))]
pub use log_line::LogLineBuilder;
pub use log_line::{last_sequence, next_sequence, LogLine};
#[cfg(any(test, feature = "test-support"))]
pub use snapshot::SnapshotBuilder;
pub use snapshot::{Deployment, Snapshot, DEPLOY_DOMAIN};
pub use status::{Status, UnknownStatus};
