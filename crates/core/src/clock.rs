// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock source for stamping lines that arrive without a timestamp.
//!
//! Deadlines inside a session run on `tokio::time` so paused-time tests can
//! drive them; this trait only covers the calendar time shown to users.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

pub trait Clock: Clone + Send + Sync + 'static {
    fn utc_now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock; clones share the same time. Starts at the Unix epoch.
#[derive(Debug, Clone)]
pub struct FakeClock {
    at: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::at(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn at(at: DateTime<Utc>) -> Self {
        Self { at: Arc::new(Mutex::new(at)) }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.at.lock() = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.at.lock() += by;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn utc_now(&self) -> DateTime<Utc> {
        *self.at.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
