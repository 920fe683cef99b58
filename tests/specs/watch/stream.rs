// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dw watch` merges the snapshot with the live channel.

use crate::prelude::*;

#[test]
fn snapshot_and_live_tail_merge_without_duplicates() {
    let stub = Stub::builder()
        .snapshot(snapshot("d-1", "building", &[(0, "Step 1/3"), (1, "Step 2/3")]))
        .connection(Connection::frames([
            log(1, "Step 2/3"),
            log(2, "Step 3/3"),
            status("deploying"),
            log(3, "pushed image"),
            status("ready"),
        ]))
        .start();

    dw(&stub).args(&["watch", "d-1"]).passes().stdout_eq(
        "deployment d-1  building
commit: 9f2c1e4
Step 1/3
Step 2/3
Step 3/3
status: building → deploying
pushed image
status: deploying → ready
url: https://sunny-fox.dejavu.id",
    );
    assert_eq!(stub.live_uris(), vec!["/api/deploy/d-1/logs?from=2"]);
}

#[test]
fn out_of_order_lines_are_reordered() {
    let stub = Stub::builder()
        .snapshot(snapshot("d-1", "building", &[]))
        .connection(Connection::frames([log(1, "b"), log(0, "a"), log(2, "c"), status("ready")]))
        .start();

    let out = dw(&stub).args(&["watch", "d-1"]).passes();
    assert_eq!(out.stdout_lines()[2..5], ["a", "b", "c"]);
}

#[test]
fn missing_line_becomes_a_gap_marker_after_timeout() {
    let stub = Stub::builder()
        .snapshot(snapshot("d-1", "building", &[(0, "a")]))
        .connection(Connection::frames([log(1, "b"), log(3, "d"), status("ready")]).hold())
        .start();

    let out = dw(&stub).args(&["watch", "d-1", "--gap-timeout-ms", "200"]).passes();
    let lines = out.stdout_lines();
    let gap = lines.iter().position(|l| *l == "… 1 line missing (2..=2) …").unwrap();
    let d = lines.iter().position(|l| *l == "d").unwrap();
    let b = lines.iter().position(|l| *l == "b").unwrap();
    assert!(b < gap && gap < d, "{lines:?}");
}

#[test]
fn json_output_is_one_event_per_line() {
    let stub = Stub::builder()
        .snapshot(snapshot("d-1", "deploying", &[(0, "a")]))
        .connection(Connection::frames([status("ready")]))
        .start();

    let out = dw(&stub).args(&["watch", "d-1", "--output", "json"]).passes();
    let events: Vec<serde_json::Value> =
        out.stdout.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(events[0], json!({ "type": "status", "status": "deploying" }));
    assert_eq!(events[1]["type"], "line");
    assert_eq!(events[1]["sequence"], 0);
    assert_eq!(events[2], json!({ "type": "status", "previous": "deploying", "status": "ready" }));
    assert_eq!(events.len(), 3);
}

#[test]
fn log_file_mirrors_lines_and_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("d-1.log");
    let stub = Stub::builder()
        .snapshot(snapshot("d-1", "building", &[(0, "a")]))
        .connection(Connection::frames([log(2, "c"), status("failed")]))
        .start();

    dw(&stub).args(&["watch", "d-1", "--log-file", path.to_str().unwrap()]).exits_with(1);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines.iter().any(|l| l.ends_with("[0] a")), "{lines:?}");
    assert!(lines.iter().any(|l| l.ends_with("[gap] … 1 line missing (1..=1) …")), "{lines:?}");
    assert!(lines.iter().any(|l| l.ends_with("[2] c")), "{lines:?}");
}

#[test]
fn replay_all_drops_the_replayed_prefix() {
    let stub = Stub::builder()
        .snapshot(json!({
            "id": "d-1",
            "status": "building",
            "build_logs": "one\ntwo",
            "last_sequence": 1,
        }))
        .connection(Connection::frames(["one\ntwo\nthree".to_string(), status("ready")]))
        .start();

    let out = dw(&stub).args(&["watch", "d-1", "--replay-all"]).passes();
    assert_eq!(out.stdout_lines()[1..4], ["one", "two", "three"]);
    out.stdout_has("status: building → ready");
}
