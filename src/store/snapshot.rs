use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{SlimsGraphError, row::Row};

/// Serialized dump of a record store: rows in store order plus JSON attachments by primary key.
///
/// ```json
/// {"records": [{"pk": 40007, "tableName": "ExperimentRun", "columns": []}],
///  "attachments": {"12": {"instrument_id": "440_SmartSPIM1_20240327"}}}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub records: Vec<Row>,
    #[serde(default)]
    pub attachments: BTreeMap<i64, Value>,
}

impl Snapshot {
    pub fn from_json(text: &str) -> Result<Self, SlimsGraphError> {
        serde_json::from_str(text).map_err(|e| SlimsGraphError::snapshot(e.to_string()))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SlimsGraphError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SlimsGraphError::snapshot(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, SlimsGraphError> {
        serde_json::to_string_pretty(self).map_err(|e| SlimsGraphError::snapshot(e.to_string()))
    }

    /// Appends another snapshot; later attachments replace earlier ones with the same key.
    pub fn merge(&mut self, other: Snapshot) {
        self.records.extend(other.records);
        self.attachments.extend(other.attachments);
    }

    pub(crate) fn attachment_bytes(value: &Value) -> Result<Vec<u8>, SlimsGraphError> {
        match value {
            Value::String(text) => Ok(text.as_bytes().to_vec()),
            other => {
                serde_json::to_vec(other).map_err(|e| SlimsGraphError::snapshot(e.to_string()))
            }
        }
    }
}
