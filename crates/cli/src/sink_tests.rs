// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dw_core::test_support::{line, status_event, timestamp};
use dw_core::Status;

#[test]
fn entries_are_timestamped_and_tagged() {
    let now = timestamp(60);
    assert_eq!(format_entry(&ObserverEvent::Line(line(4)), now), "1970-01-01T00:00:04Z [4] line 4");
    assert_eq!(
        format_entry(&ObserverEvent::Gap { from: 8, to: 9 }, now),
        "1970-01-01T00:01:00Z [gap] … 2 lines missing (8..=9) …"
    );
    assert_eq!(
        format_entry(&status_event(Some(Status::Building), Status::Ready), now),
        "1970-01-01T00:01:00Z [status] ready"
    );
}

#[test]
fn append_creates_parent_and_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs/d-1.log");
    let sink = LogFile::new(path.clone());

    sink.append(&ObserverEvent::Line(line(0)));
    sink.append(&ObserverEvent::Line(line(1)));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec!["1970-01-01T00:00:00Z [0] line 0", "1970-01-01T00:00:01Z [1] line 1"]);
}

#[test]
fn write_failure_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened for appending
    let sink = LogFile::new(dir.path().to_path_buf());
    sink.append(&ObserverEvent::Line(line(0)));
    assert!(dir.path().is_dir());
}
