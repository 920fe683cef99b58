// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings layering: config file < environment < flags.

use crate::prelude::*;

const DEAD_API: &str = "http://127.0.0.1:9/api";

fn ready_stub() -> Stub {
    Stub::builder().snapshot(snapshot("d-1", "ready", &[(0, "done")])).start()
}

#[test]
fn user_config_file_supplies_api_url() {
    let stub = ready_stub();
    cli()
        .user_config(&format!("api_url = {:?}\n", stub.api_url))
        .args(&["status", "d-1"])
        .passes()
        .stdout_has("deployment d-1  ready");
}

#[test]
fn environment_overrides_config_file() {
    let stub = ready_stub();
    cli()
        .user_config(&format!("api_url = {DEAD_API:?}\n"))
        .env("DW_API_URL", &stub.api_url)
        .args(&["status", "d-1"])
        .passes();
}

#[test]
fn flag_overrides_environment() {
    let stub = ready_stub();
    cli()
        .env("DW_API_URL", DEAD_API)
        .args(&["status", "d-1", "--api-url", &stub.api_url])
        .passes();
    assert_eq!(stub.snapshot_requests(), vec!["GET /api/deploy/d-1 HTTP/1.1"]);
}

#[test]
fn unknown_config_key_is_a_usage_error() {
    cli().user_config("api = \"http://x\"\n").args(&["status", "d-1"]).exits_with(2).stderr_has("config");
}

#[test]
fn explicit_missing_config_file_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    cli().config_file(&dir.path().join("missing.toml")).args(&["status", "d-1"]).exits_with(2);
}

#[test]
fn unsupported_scheme_is_a_usage_error() {
    cli().args(&["status", "d-1", "--api-url", "https://example.com/api"]).exits_with(2).stderr_has("api_url");
}
