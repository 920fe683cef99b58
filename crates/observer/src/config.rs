// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tuning knobs of an observation session.

use dw_wire::ChannelMode;
use std::time::Duration;

use crate::backoff::Backoff;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverConfig {
    /// How long a head gap may stay unfilled before it is declared permanent
    pub gap_timeout: Duration,
    /// Live channel reconnect delays
    pub backoff: Backoff,
    /// Snapshot fetch attempts, including the first
    pub snapshot_attempts: u32,
    /// Delay before the second snapshot attempt; doubles afterwards
    pub snapshot_backoff_base: Duration,
    /// Reorder buffer bound; overflowing it declares the head gap permanent
    pub max_pending: usize,
    pub channel_mode: ChannelMode,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            gap_timeout: Duration::from_secs(5),
            backoff: Backoff::default(),
            snapshot_attempts: 3,
            snapshot_backoff_base: Duration::from_millis(250),
            max_pending: 10_000,
            channel_mode: ChannelMode::Sequenced,
        }
    }
}

impl ObserverConfig {
    dw_core::setters! {
        set {
            gap_timeout: Duration,
            backoff: Backoff,
            snapshot_attempts: u32,
            snapshot_backoff_base: Duration,
            max_pending: usize,
            channel_mode: ChannelMode,
        }
    }
}
