use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params, params_from_iter, types::Value as SqlValue};
use serde_json::{Map, Value};
use tracing::debug;

use super::{RecordStore, Snapshot};
use crate::{SlimsGraphError, criteria::Criteria, row::Row};

/// Record store over a local SQLite database holding a snapshot of the remote tables.
///
/// Each row is kept twice: the full entity as JSON in `body`, and a flat `{column: value}`
/// object in `fields` that criteria are compiled against.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SlimsGraphError> {
        let conn = Connection::open(path).map_err(|e| SlimsGraphError::store(e.to_string()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, SlimsGraphError> {
        let conn =
            Connection::open_in_memory().map_err(|e| SlimsGraphError::store(e.to_string()))?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, SlimsGraphError> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Sets a PRAGMA; statements that report a value are accepted.
    pub fn apply_pragma(&self, key: &str, value: &str) -> Result<(), SlimsGraphError> {
        match self.conn.execute(&format!("PRAGMA {key} = {value}"), []) {
            Ok(_) | Err(rusqlite::Error::ExecuteReturnedResults) => Ok(()),
            Err(e) => Err(SlimsGraphError::store(format!("PRAGMA {key} = {value}: {e}"))),
        }
    }

    pub fn set_statement_cache_capacity(&self, capacity: usize) {
        self.conn.set_prepared_statement_cache_capacity(capacity);
    }

    /// Stores a row unless one with the same table and primary key already exists.
    pub fn insert(&self, row: &Row) -> Result<bool, SlimsGraphError> {
        let body = serde_json::to_string(row).map_err(|e| SlimsGraphError::store(e.to_string()))?;
        let fields = flatten_fields(row);
        let inserted = self
            .conn
            .prepare_cached(
                "INSERT OR IGNORE INTO records(table_name, pk, body, fields) VALUES (?1, ?2, ?3, ?4)",
            )
            .and_then(|mut stmt| stmt.execute(params![row.table_name(), row.pk(), body, fields]))
            .map_err(|e| SlimsGraphError::store(e.to_string()))?;
        Ok(inserted > 0)
    }

    pub fn insert_attachment(&self, pk: i64, content: &[u8]) -> Result<(), SlimsGraphError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO attachments(pk, content) VALUES (?1, ?2)",
                params![pk, content],
            )
            .map_err(|e| SlimsGraphError::store(e.to_string()))?;
        Ok(())
    }

    /// Loads a snapshot in one transaction.
    pub fn import_snapshot(&mut self, snapshot: &Snapshot) -> Result<usize, SlimsGraphError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| SlimsGraphError::store(e.to_string()))?;
        let mut inserted = 0;
        {
            let mut insert_row = tx
                .prepare(
                    "INSERT OR IGNORE INTO records(table_name, pk, body, fields) VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(|e| SlimsGraphError::store(e.to_string()))?;
            for row in &snapshot.records {
                let body =
                    serde_json::to_string(row).map_err(|e| SlimsGraphError::store(e.to_string()))?;
                inserted += insert_row
                    .execute(params![row.table_name(), row.pk(), body, flatten_fields(row)])
                    .map_err(|e| SlimsGraphError::store(e.to_string()))?;
            }
            let mut insert_attachment = tx
                .prepare("INSERT OR REPLACE INTO attachments(pk, content) VALUES (?1, ?2)")
                .map_err(|e| SlimsGraphError::store(e.to_string()))?;
            for (pk, value) in &snapshot.attachments {
                let content = Snapshot::attachment_bytes(value)?;
                insert_attachment
                    .execute(params![pk, content])
                    .map_err(|e| SlimsGraphError::store(e.to_string()))?;
            }
        }
        tx.commit()
            .map_err(|e| SlimsGraphError::store(e.to_string()))?;
        debug!(rows = inserted, "imported snapshot");
        Ok(inserted)
    }

    pub fn row_count(&self) -> Result<i64, SlimsGraphError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .map_err(|e| SlimsGraphError::store(e.to_string()))
    }
}

impl RecordStore for SqliteRecordStore {
    fn fetch(&self, table: &str, criteria: &Criteria) -> Result<Vec<Row>, SlimsGraphError> {
        let mut bindings = vec![SqlValue::Text(table.to_string())];
        let predicate = compile(criteria, &mut bindings);
        let sql = format!(
            "SELECT body FROM records WHERE table_name = ?1 AND {predicate} ORDER BY seq"
        );
        let mut stmt = self
            .conn
            .prepare_cached(&sql)
            .map_err(|e| SlimsGraphError::store(e.to_string()))?;
        let bodies = stmt
            .query_map(params_from_iter(bindings.iter()), |row| row.get::<_, String>(0))
            .map_err(|e| SlimsGraphError::store(e.to_string()))?;
        let mut rows = Vec::new();
        for body in bodies {
            let body = body.map_err(|e| SlimsGraphError::store(e.to_string()))?;
            let row: Row =
                serde_json::from_str(&body).map_err(|e| SlimsGraphError::store(e.to_string()))?;
            rows.push(row);
        }
        debug!(table, operator = criteria.operator(), rows = rows.len(), "sqlite fetch");
        Ok(rows)
    }

    fn fetch_attachment(&self, pk: i64) -> Result<Vec<u8>, SlimsGraphError> {
        self.conn
            .query_row(
                "SELECT content FROM attachments WHERE pk = ?1",
                params![pk],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()
            .map_err(|e| SlimsGraphError::store(e.to_string()))?
            .ok_or_else(|| SlimsGraphError::attachment(format!("attachment {pk} not found")))
    }
}

fn ensure_schema(conn: &Connection) -> Result<(), SlimsGraphError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS records (
            seq        INTEGER PRIMARY KEY AUTOINCREMENT,
            table_name TEXT NOT NULL,
            pk         INTEGER NOT NULL,
            body       TEXT NOT NULL,
            fields     TEXT NOT NULL,
            UNIQUE(table_name, pk)
        );
        CREATE TABLE IF NOT EXISTS attachments (
            pk      INTEGER PRIMARY KEY,
            content BLOB NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_records_table ON records(table_name, seq);
        "#,
    )
    .map_err(|e| SlimsGraphError::store(e.to_string()))
}

fn flatten_fields(row: &Row) -> String {
    let fields: Map<String, Value> = row
        .columns()
        .iter()
        .map(|field| (field.name.clone(), field.value.clone()))
        .collect();
    Value::Object(fields).to_string()
}

/// Translates a criterion into a SQL predicate over `records.fields`, pushing bound values.
///
/// `json_each` over a scalar yields that scalar and over an array yields its elements, which
/// gives list columns the same any-element semantics as [`Criteria::matches`].
fn compile(criteria: &Criteria, bindings: &mut Vec<SqlValue>) -> String {
    match criteria {
        Criteria::Equals { field, value } => {
            let path = bind(bindings, json_path(field));
            let guard = type_guard(value);
            let value = bind(bindings, sql_value(value));
            format!(
                "EXISTS (SELECT 1 FROM json_each(records.fields, {path}) AS v WHERE {guard}v.value = {value})"
            )
        }
        Criteria::Contains { field, substring } => {
            let path = bind(bindings, json_path(field));
            let needle = bind(bindings, SqlValue::Text(substring.clone()));
            format!(
                "EXISTS (SELECT 1 FROM json_each(records.fields, {path}) AS v WHERE v.type = 'text' AND instr(v.value, {needle}) > 0)"
            )
        }
        Criteria::IsOneOf { field, values } => {
            if values.is_empty() {
                return "0".to_string();
            }
            let path = bind(bindings, json_path(field));
            let alternatives: Vec<String> = values
                .iter()
                .map(|value| {
                    let guard = type_guard(value);
                    let placeholder = bind(bindings, sql_value(value));
                    format!("({guard}v.value = {placeholder})")
                })
                .collect();
            format!(
                "EXISTS (SELECT 1 FROM json_each(records.fields, {path}) AS v WHERE {})",
                alternatives.join(" OR ")
            )
        }
        Criteria::GreaterOrEqual { field, value } => range(field, ">=", value, bindings),
        Criteria::LessOrEqual { field, value } => range(field, "<=", value, bindings),
        Criteria::And(items) => {
            if items.is_empty() {
                return "1".to_string();
            }
            let parts: Vec<String> = items.iter().map(|item| compile(item, bindings)).collect();
            format!("({})", parts.join(" AND "))
        }
    }
}

fn range(field: &str, op: &str, value: &Value, bindings: &mut Vec<SqlValue>) -> String {
    let path = bind(bindings, json_path(field));
    let guard = type_guard(value);
    let bound = bind(bindings, sql_value(value));
    format!(
        "EXISTS (SELECT 1 FROM json_each(records.fields, {path}) AS v WHERE {guard}v.value {op} {bound})"
    )
}

fn bind(bindings: &mut Vec<SqlValue>, value: SqlValue) -> String {
    bindings.push(value);
    format!("?{}", bindings.len())
}

fn json_path(field: &str) -> SqlValue {
    SqlValue::Text(format!("$.\"{}\"", field.replace('"', "\\\"")))
}

fn type_guard(value: &Value) -> &'static str {
    match value {
        Value::Number(_) => "v.type IN ('integer', 'real') AND ",
        Value::String(_) => "v.type = 'text' AND ",
        Value::Bool(_) => "v.type IN ('true', 'false') AND ",
        _ => "",
    }
}

fn sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(flag) => SqlValue::Integer(i64::from(*flag)),
        Value::Number(number) => match number.as_i64() {
            Some(int) => SqlValue::Integer(int),
            None => SqlValue::Real(number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(text) => SqlValue::Text(text.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}
