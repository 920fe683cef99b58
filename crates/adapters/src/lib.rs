// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the deployment API: snapshot over HTTP, live tail over
//! WebSocket, and scripted fakes for tests.

pub mod endpoint;
mod http;
pub mod live;
pub mod snapshot;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use endpoint::{Endpoint, EndpointError, Scheme};
pub use live::{ChannelError, LiveChannel, LiveStream, WsLiveChannel};
pub use snapshot::{HttpSnapshotSource, SnapshotError, SnapshotSource};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLiveChannel, FakeLiveHandle, FakeSnapshotSource};
