// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exit status of `dw watch` for each way a session can end.

use crate::prelude::*;

#[test]
fn finished_deployment_exits_without_connecting() {
    let stub = Stub::builder().snapshot(snapshot("d-1", "ready", &[(0, "done")])).start();

    dw(&stub)
        .args(&["watch", "d-1"])
        .passes()
        .stdout_has("deployment d-1  ready")
        .stdout_has("url: https://sunny-fox.dejavu.id")
        .stdout_has("done");
    assert!(stub.live_uris().is_empty());
}

#[yare::parameterized(
    failed    = { "failed" },
    cancelled = { "cancelled" },
)]
fn unsuccessful_deployment_exits_1(final_status: &str) {
    let stub = Stub::builder()
        .snapshot(snapshot("d-1", "building", &[]))
        .connection(Connection::frames([log(0, "npm ERR!"), status(final_status)]))
        .start();

    dw(&stub)
        .args(&["watch", "d-1"])
        .exits_with(1)
        .stdout_has("npm ERR!")
        .stderr_has(&format!("deployment d-1 {final_status}"));
}

#[test]
fn unknown_deployment_exits_3() {
    let stub = Stub::builder().snapshot_error(404, r#"{"error":"not found"}"#).start();
    dw(&stub).args(&["watch", "nope"]).exits_with(3).stderr_has("nope");
    assert_eq!(stub.snapshot_requests().len(), 1);
}

#[test]
fn server_errors_are_retried_then_exit_5() {
    let stub = Stub::builder().snapshot_error(503, "unavailable").start();
    dw(&stub).env("DW_SNAPSHOT_ATTEMPTS", "2").args(&["watch", "d-1"]).exits_with(5);
    assert_eq!(stub.snapshot_requests().len(), 2);
}

#[test]
fn rejected_snapshot_exits_5_without_retry() {
    let stub = Stub::builder().snapshot_error(401, "unauthorized").start();
    dw(&stub).args(&["watch", "d-1"]).exits_with(5);
    assert_eq!(stub.snapshot_requests().len(), 1);
}

#[test]
fn malformed_snapshot_exits_4() {
    let stub = Stub::builder().snapshot(json!({ "id": "d-1", "status": "exploded" })).start();
    dw(&stub).args(&["watch", "d-1"]).exits_with(4);
}

#[test]
fn status_regression_exits_4() {
    let stub = Stub::builder()
        .snapshot(snapshot("d-1", "building", &[(0, "a")]))
        .connection(Connection::frames([log(2, "c"), status("failed"), status("building")]).hold())
        .start();

    dw(&stub).args(&["watch", "d-1"]).exits_with(4).stderr_has("status changed from terminal failed to building");
}

#[test]
fn malformed_frame_exits_4() {
    let stub = Stub::builder()
        .snapshot(snapshot("d-1", "building", &[]))
        .connection(Connection::frames(["Building project...".to_string()]).hold())
        .start();

    dw(&stub).args(&["watch", "d-1"]).exits_with(4);
}
