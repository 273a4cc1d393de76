use ahash::{AHashMap, AHashSet};
use parking_lot::Mutex;
use tracing::debug;

use super::{RecordStore, Snapshot};
use crate::{SlimsGraphError, criteria::Criteria, row::Row};

/// One `fetch` call as seen by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedQuery {
    pub table: String,
    pub criteria: Criteria,
}

/// Record store held entirely in memory. Criteria are evaluated row by row and rows come back
/// in insertion order. Every query is logged so callers can inspect the join waterfall.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: AHashMap<String, Vec<Row>>,
    keys: AHashSet<(String, i64)>,
    attachments: AHashMap<i64, Vec<u8>>,
    failing: AHashMap<String, String>,
    queries: Mutex<Vec<RecordedQuery>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SlimsGraphError> {
        let mut store = Self::new();
        for row in snapshot.records {
            store.insert(row);
        }
        for (pk, value) in &snapshot.attachments {
            store.insert_attachment(*pk, Snapshot::attachment_bytes(value)?);
        }
        Ok(store)
    }

    /// Adds a row; a second row with the same table and primary key is ignored.
    pub fn insert(&mut self, row: Row) {
        let key = (row.table_name().to_string(), row.pk());
        if self.keys.insert(key) {
            self.tables
                .entry(row.table_name().to_string())
                .or_default()
                .push(row);
        }
    }

    pub fn insert_attachment(&mut self, pk: i64, content: Vec<u8>) {
        self.attachments.insert(pk, content);
    }

    /// Makes every fetch against `table` fail with a store error.
    pub fn fail_table<T: Into<String>, M: Into<String>>(&mut self, table: T, message: M) {
        self.failing.insert(table.into(), message.into());
    }

    pub fn row_count(&self) -> usize {
        self.keys.len()
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn clear_queries(&self) {
        self.queries.lock().clear();
    }
}

impl RecordStore for MemoryRecordStore {
    fn fetch(&self, table: &str, criteria: &Criteria) -> Result<Vec<Row>, SlimsGraphError> {
        self.queries.lock().push(RecordedQuery {
            table: table.to_string(),
            criteria: criteria.clone(),
        });
        if let Some(message) = self.failing.get(table) {
            return Err(SlimsGraphError::store(format!("{table}: {message}")));
        }
        let rows: Vec<Row> = self
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| criteria.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        debug!(table, operator = criteria.operator(), rows = rows.len(), "memory fetch");
        Ok(rows)
    }

    fn fetch_attachment(&self, pk: i64) -> Result<Vec<u8>, SlimsGraphError> {
        self.attachments
            .get(&pk)
            .cloned()
            .ok_or_else(|| SlimsGraphError::attachment(format!("attachment {pk} not found")))
    }
}
