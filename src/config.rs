//! Store selection and store-specific options.
//!
//! Everything a process needs to reach a record store is carried by one [`StoreConfig`] value
//! built at startup and handed to [`open_store`]; nothing is read from global state.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use crate::{
    SlimsGraphError,
    store::{MemoryRecordStore, RecordStore, Snapshot, SqliteRecordStore},
};

/// Which [`RecordStore`] implementation answers queries.
///
/// # Examples
///
/// ```rust
/// use slimsgraph::{BackendKind, StoreConfig};
///
/// let cfg = StoreConfig::new(BackendKind::Sqlite);
/// assert_eq!(cfg.backend, BackendKind::Sqlite);
/// assert_eq!(StoreConfig::default().backend, BackendKind::Memory);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Rows held in process, loaded from a snapshot file when one is configured.
    #[default]
    Memory,
    /// Rows held in a SQLite database, optionally seeded from a snapshot file.
    Sqlite,
}

impl BackendKind {
    pub fn parse(name: &str) -> Result<Self, SlimsGraphError> {
        match name {
            "memory" => Ok(BackendKind::Memory),
            "sqlite" => Ok(BackendKind::Sqlite),
            other => Err(SlimsGraphError::invalid_input(format!(
                "unsupported backend {other}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Sqlite => "sqlite",
        }
    }
}

/// Options used only by the SQLite backend.
///
/// # Default Configuration
///
/// ```rust
/// use slimsgraph::SqliteConfig;
/// let config = SqliteConfig::default();
/// assert!(config.path.is_none());
/// assert!(config.cache_size.is_none());
/// assert!(config.pragma_settings.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SqliteConfig {
    /// Database file. `None` opens a private in-memory database.
    pub path: Option<PathBuf>,

    /// Prepared statement cache capacity.
    ///
    /// Every join issues the same statement shape with a different number of keys, so a
    /// larger cache helps long join plans.
    pub cache_size: Option<usize>,

    /// PRAGMA settings applied right after the database is opened, for example
    /// `journal_mode = WAL`.
    pub pragma_settings: BTreeMap<String, String>,
}

/// Complete configuration for opening a record store.
///
/// # Examples
///
/// ```rust
/// use slimsgraph::StoreConfig;
///
/// let mut cfg = StoreConfig::sqlite();
/// cfg.sqlite.pragma_settings.insert("journal_mode".to_string(), "WAL".to_string());
/// cfg.snapshot = Some("records.json".into());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    pub sqlite: SqliteConfig,
    /// Snapshot file loaded into the store when it is opened.
    pub snapshot: Option<PathBuf>,
}

impl StoreConfig {
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    pub fn memory() -> Self {
        Self::new(BackendKind::Memory)
    }

    pub fn sqlite() -> Self {
        Self::new(BackendKind::Sqlite)
    }

    pub fn with_snapshot<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.snapshot = Some(path.into());
        self
    }
}

/// Opens the store described by `cfg`, loading the configured snapshot into it.
pub fn open_store(cfg: &StoreConfig) -> Result<Box<dyn RecordStore>, SlimsGraphError> {
    let snapshot = cfg
        .snapshot
        .as_ref()
        .map(Snapshot::from_path)
        .transpose()?;
    debug!(
        backend = cfg.backend.as_str(),
        snapshot = snapshot.is_some(),
        "opening record store"
    );
    match cfg.backend {
        BackendKind::Memory => {
            let store = MemoryRecordStore::from_snapshot(snapshot.unwrap_or_default())?;
            Ok(Box::new(store))
        }
        BackendKind::Sqlite => {
            let mut store = match &cfg.sqlite.path {
                Some(path) => SqliteRecordStore::open(path)?,
                None => SqliteRecordStore::open_in_memory()?,
            };
            for (key, value) in &cfg.sqlite.pragma_settings {
                store.apply_pragma(key, value)?;
            }
            if let Some(capacity) = cfg.sqlite.cache_size {
                store.set_statement_cache_capacity(capacity);
            }
            if let Some(snapshot) = snapshot {
                store.import_snapshot(&snapshot)?;
            }
            Ok(Box::new(store))
        }
    }
}
