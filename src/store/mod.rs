//! Record store boundary. The assemblers only ever see [`RecordStore`]; which implementation
//! answers is chosen through [`crate::config::open_store`].

mod memory;
mod snapshot;
mod sqlite;

pub use memory::{MemoryRecordStore, RecordedQuery};
pub use snapshot::Snapshot;
pub use sqlite::SqliteRecordStore;

use crate::{SlimsGraphError, criteria::Criteria, row::Row};

/// Table-oriented store: per-table queries only, no joins.
pub trait RecordStore {
    fn fetch(&self, table: &str, criteria: &Criteria) -> Result<Vec<Row>, SlimsGraphError>;

    /// Raw content of the attachment with primary key `pk`.
    fn fetch_attachment(&self, pk: i64) -> Result<Vec<u8>, SlimsGraphError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn fetch(&self, table: &str, criteria: &Criteria) -> Result<Vec<Row>, SlimsGraphError> {
        (**self).fetch(table, criteria)
    }

    fn fetch_attachment(&self, pk: i64) -> Result<Vec<u8>, SlimsGraphError> {
        (**self).fetch_attachment(pk)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn fetch(&self, table: &str, criteria: &Criteria) -> Result<Vec<Row>, SlimsGraphError> {
        (**self).fetch(table, criteria)
    }

    fn fetch_attachment(&self, pk: i64) -> Result<Vec<u8>, SlimsGraphError> {
        (**self).fetch_attachment(pk)
    }
}
