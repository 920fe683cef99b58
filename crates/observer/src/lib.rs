// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dw-observer: gap-free, ordered view of a deployment's log and status.
//!
//! A session loads the snapshot once, then keeps the live channel attached
//! (reconnecting with backoff) and merges both into a single stream of
//! [`ObserverEvent`](dw_core::ObserverEvent)s.

mod backoff;
mod config;
mod error;
pub mod loader;
pub mod reconciler;
mod session;

pub use backoff::Backoff;
pub use config::ObserverConfig;
pub use error::ObserveError;
pub use reconciler::Reconciler;
pub use session::{Observer, Session};
