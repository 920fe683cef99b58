// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for running `dw` in specs.

pub use crate::stub::{log, status, Connection, Stub};
pub use serde_json::json;

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;

/// Fluent wrapper around one `dw` invocation.
pub struct Cli {
    cmd: Command,
    home: tempfile::TempDir,
}

/// `dw` with an isolated environment: no config file, no color, short
/// timers so reconnect specs finish quickly.
pub fn cli() -> Cli {
    let home = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("dw").unwrap();
    cmd.env_clear()
        .env("PATH", std::env::var_os("PATH").unwrap_or_default())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("NO_COLOR", "1")
        .env("DW_BACKOFF_BASE_MS", "20")
        .env("DW_BACKOFF_CAP_MS", "100")
        .timeout(Duration::from_secs(30));
    Cli { cmd, home }
}

/// `dw` pointed at `stub`.
pub fn dw(stub: &Stub) -> Cli {
    cli().env("DW_API_URL", &stub.api_url).env("DW_WS_URL", &stub.ws_url)
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn config_file(self, path: &Path) -> Self {
        self.env("DW_CONFIG", path)
    }

    /// Write `~/.config/dw/config.toml` in the isolated home.
    pub fn user_config(self, toml: &str) -> Self {
        let dir = self.home.path().join(".config").join("dw");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), toml).unwrap();
        self
    }

    /// Run, expecting exit status 0.
    pub fn passes(self) -> Output {
        self.exits_with(0)
    }

    pub fn exits_with(mut self, code: i32) -> Output {
        let output = self.cmd.output().unwrap();
        let out = Output {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        assert_eq!(
            output.status.code(),
            Some(code),
            "unexpected exit status\nstdout:\n{}\nstderr:\n{}",
            out.stdout,
            out.stderr
        );
        out
    }
}

/// Captured output of a finished run.
pub struct Output {
    pub stdout: String,
    pub stderr: String,
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout unexpectedly has {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout.trim_end(), expected.trim_end());
        self
    }

    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Snapshot body for a deployment.
pub fn snapshot(id: &str, status: &str, lines: &[(u64, &str)]) -> serde_json::Value {
    let log_lines: Vec<_> = lines
        .iter()
        .map(|(seq, text)| json!({ "sequence": seq, "text": text, "timestamp": "2026-01-30T08:14:00Z" }))
        .collect();
    let last = lines.last().map_or(-1, |(seq, _)| *seq as i64);
    json!({
        "id": id,
        "status": status,
        "project_id": "p-1",
        "subdomain": "sunny-fox",
        "commit_hash": "9f2c1e4b7a",
        "log_lines": log_lines,
        "last_sequence": last,
    })
}
