//! Batched foreign-key graph assembly over a table-oriented laboratory record store.
//!
//! A [`RecordStore`] answers per-table queries built from [`Criteria`]. Join steps fetch the
//! rows referenced by the previous step in one query each and link them into a
//! [`RecordGraph`]; the domain assemblers under [`assemblers`] fold each root's descendants
//! into a typed aggregate.
//!
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod assemblers;
pub mod client;
pub mod coerce;
pub mod config;
pub mod criteria;
pub mod errors;
pub mod graph;
pub mod join;
pub mod models;
pub mod row;
pub mod schema;
pub mod store;
pub mod traversal;

pub use crate::assemblers::{
    AssembledGraph, DateRange, EcephysSessionHandler, HistologySessionHandler,
    ImagingSessionHandler, InstrumentSessionHandler, ViralInjectionSessionHandler,
    WaterRestrictionSessionHandler,
};
pub use crate::client::{CommandLineConfig, SlimsClient};
pub use crate::config::{BackendKind, SqliteConfig, StoreConfig, open_store};
pub use crate::criteria::Criteria;
pub use crate::errors::SlimsGraphError;
pub use crate::graph::{NodeKey, RecordGraph};
pub use crate::join::{JoinStep, join_foreign_table};
pub use crate::row::{Field, Row};
pub use crate::schema::TableKind;
pub use crate::store::{MemoryRecordStore, RecordStore, Snapshot, SqliteRecordStore};
