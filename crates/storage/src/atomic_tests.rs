// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde::{Deserialize, Serialize};
use tempfile::tempdir;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Sample {
    name: String,
    count: u32,
}

#[test]
fn write_then_read_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let value = Sample {
        name: "x".into(),
        count: 7,
    };

    atomic_write_json(&path, &value).unwrap();

    let read: Sample = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(read, value);
}

#[test]
fn no_tmp_file_survives_a_successful_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    atomic_write_json(&path, &Sample { name: "a".into(), count: 1 }).unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn overwrite_replaces_previous_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    atomic_write_json(&path, &Sample { name: "a".into(), count: 1 }).unwrap();
    atomic_write_json(&path, &Sample { name: "b".into(), count: 2 }).unwrap();

    let read: Sample = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(read, Sample { name: "b".into(), count: 2 });
}
