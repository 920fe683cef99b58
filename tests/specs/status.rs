// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dw status` prints the snapshot once.

use crate::prelude::*;

#[test]
fn status_prints_header_and_captured_log() {
    let stub = Stub::builder().snapshot(snapshot("d-1", "building", &[(0, "Step 1/2"), (1, "Step 2/2")])).start();

    dw(&stub).args(&["status", "d-1"]).passes().stdout_eq(
        "deployment d-1  building
commit: 9f2c1e4
project: p-1
log: 2 lines
Step 1/2
Step 2/2",
    );
    assert!(stub.live_uris().is_empty());
}

#[test]
fn status_json_is_the_snapshot() {
    let stub = Stub::builder().snapshot(snapshot("d-1", "ready", &[(0, "done")])).start();

    let out = dw(&stub).args(&["status", "d-1", "-o", "json"]).passes();
    let value: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(value["job_id"], "d-1");
    assert_eq!(value["status"], "ready");
    assert_eq!(value["last_sequence"], 0);
}

#[test]
fn status_of_unknown_deployment_exits_3() {
    let stub = Stub::builder().snapshot_error(404, "").start();
    dw(&stub).args(&["status", "nope"]).exits_with(3);
}

#[test]
fn token_is_sent_as_bearer() {
    let stub = Stub::builder().snapshot(snapshot("d-1", "ready", &[])).start();
    dw(&stub).env("DW_TOKEN", "s3cret").args(&["status", "d-1"]).passes();
    assert_eq!(stub.authorizations(), vec![Some("Bearer s3cret".to_string())]);
}
