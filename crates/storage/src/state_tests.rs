// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::TempDir;

fn entry(code: &str, seconds: i64) -> StateEntry {
    StateEntry::at(
        Fingerprint::new(code),
        Fingerprint::new("i"),
        Fingerprint::new("v"),
        Environment::new("dev").unwrap(),
        Utc::now() + chrono::Duration::seconds(seconds),
    )
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state/deploy.tb");
    let store = StateStore::new();

    let mut table = StateTable::new("deploy");
    table.append(entry("c1", 1));
    table.append(entry("c2", 2));

    store.save(&path, &table).unwrap();
    let loaded = store.load(&path).unwrap().unwrap();

    assert_eq!(loaded, table);
}

#[test]
fn missing_file_loads_as_none() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new();
    assert!(store.load(&dir.path().join("absent.tb")).unwrap().is_none());
}

#[test]
fn zero_length_file_loads_as_none() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.tb");
    fs::write(&path, b"").unwrap();
    assert!(StateStore::new().load(&path).unwrap().is_none());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.tb");
    fs::write(&path, b"definitely not a state table").unwrap();
    assert!(StateStore::new().load(&path).is_err());
}

#[test]
fn load_restores_order_from_an_unordered_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.tb");
    let store = StateStore::new();

    // build a table whose entries were appended newest-first
    let mut table = StateTable::new("test");
    table.append(entry("c3", 3));
    table.append(entry("c1", 1));
    table.append(entry("c2", 2));
    store.save(&path, &table).unwrap();

    let loaded = store.load(&path).unwrap().unwrap();
    let codes: Vec<_> = loaded.entries().iter().map(|e| e.code().as_str()).collect();
    assert_eq!(codes, vec!["c1", "c2", "c3"]);
}

#[test]
fn save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deep/nested/state/test.tb");
    StateStore::new()
        .save(&path, &StateTable::new("test"))
        .unwrap();
    assert!(path.exists());
}
