// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dw watch` survives live channel drops.

use crate::prelude::*;

#[test]
fn dropped_channel_resumes_after_the_watermark() {
    let stub = Stub::builder()
        .snapshot(snapshot("d-1", "building", &[(0, "a")]))
        .connection(Connection::frames([log(1, "b"), log(2, "c")]))
        .connection(Connection::frames([log(2, "c"), log(3, "d"), status("ready")]))
        .start();

    let out = dw(&stub).args(&["watch", "d-1"]).passes();
    assert_eq!(out.stdout_lines()[2..6], ["a", "b", "c", "d"]);
    assert_eq!(stub.live_uris(), vec!["/api/deploy/d-1/logs?from=1", "/api/deploy/d-1/logs?from=3"]);
}

#[test]
fn replay_all_reconnect_does_not_repeat_lines() {
    let stub = Stub::builder()
        .snapshot(snapshot("d-1", "building", &[]))
        .connection(Connection::frames(["one\ntwo"]))
        .connection(Connection::frames(["one\ntwo\nthree".to_string(), status("ready")]))
        .start();

    let out = dw(&stub).args(&["watch", "d-1", "--replay-all"]).passes();
    assert_eq!(out.stdout_lines()[2..5], ["one", "two", "three"]);
    out.stdout_lacks("missing");
}
