#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use slimsgraph::{MemoryRecordStore, Snapshot, SqliteRecordStore};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn snapshot(name: &str) -> Snapshot {
    Snapshot::from_path(fixture_path(name)).expect("fixture snapshot")
}

pub fn memory_store(name: &str) -> MemoryRecordStore {
    MemoryRecordStore::from_snapshot(snapshot(name)).expect("memory store")
}

pub fn sqlite_store(name: &str) -> SqliteRecordStore {
    let mut store = SqliteRecordStore::open_in_memory().expect("sqlite store");
    store.import_snapshot(&snapshot(name)).expect("import");
    store
}

pub fn instant(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .expect("rfc3339")
        .with_timezone(&Utc)
}

pub fn edge_strings(edges: &[(slimsgraph::NodeKey, slimsgraph::NodeKey)]) -> Vec<String> {
    edges
        .iter()
        .map(|(from, to)| format!("{from}->{to}"))
        .collect()
}
