// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn dw_help_lists_commands() {
    cli().args(&["--help"]).passes().stdout_has("Usage:").stdout_has("watch").stdout_has("status");
}

#[test]
fn dw_watch_help_shows_flags() {
    cli()
        .args(&["watch", "--help"])
        .passes()
        .stdout_has("--log-file")
        .stdout_has("--gap-timeout-ms")
        .stdout_has("--replay-all")
        .stdout_has("--api-url");
}

#[test]
fn dw_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn dw_no_args_is_a_usage_error() {
    cli().exits_with(2).stderr_has("Usage:");
}

#[test]
fn unknown_output_format_is_rejected() {
    cli().args(&["status", "d-1", "--output", "yaml"]).exits_with(2);
}
