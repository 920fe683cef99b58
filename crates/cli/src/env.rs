// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

/// Version string shown by `dw --version`
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn parse_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<u64>().ok())
}

/// Config file: DW_CONFIG > ~/.config/dw/config.toml
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = non_empty("DW_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("dw").join("config.toml"))
}

/// Whether the config file location was chosen explicitly.
pub fn config_path_explicit() -> bool {
    non_empty("DW_CONFIG").is_some()
}

pub fn api_url() -> Option<String> {
    non_empty("DW_API_URL")
}

pub fn ws_url() -> Option<String> {
    non_empty("DW_WS_URL")
}

/// Bearer token passed through to the API.
pub fn token() -> Option<String> {
    non_empty("DW_TOKEN")
}

pub fn gap_timeout_ms() -> Option<u64> {
    parse_u64("DW_GAP_TIMEOUT_MS")
}

pub fn backoff_base_ms() -> Option<u64> {
    parse_u64("DW_BACKOFF_BASE_MS")
}

pub fn backoff_cap_ms() -> Option<u64> {
    parse_u64("DW_BACKOFF_CAP_MS")
}

pub fn max_pending() -> Option<u64> {
    parse_u64("DW_MAX_PENDING")
}

pub fn snapshot_attempts() -> Option<u64> {
    parse_u64("DW_SNAPSHOT_ATTEMPTS")
}

/// `sequenced` or `replay-all`
pub fn channel_mode() -> Option<String> {
    non_empty("DW_CHANNEL_MODE")
}

/// Tracing filter directives (default `warn`)
pub fn log_filter() -> String {
    non_empty("DW_LOG").unwrap_or_else(|| "warn".to_string())
}

/// Diagnostic log destination; stderr when unset.
pub fn log_file() -> Option<PathBuf> {
    non_empty("DW_LOG_FILE").map(PathBuf::from)
}
