//! Batched foreign-key joins over a [`RecordStore`].
//!
//! The store has no join operator, so a plan is executed as a waterfall: the keys of one batch of
//! rows become a single `equals`/`inSet` query against the next table. Rows that come back are
//! added to the [`RecordGraph`] and linked to every input row whose keys they match.

use std::collections::BTreeSet;

use ahash::AHashSet;
use tracing::debug;

use crate::{
    SlimsGraphError,
    criteria::Criteria,
    graph::{NodeKey, RecordGraph},
    row::Row,
    store::RecordStore,
};

/// One hop of a join plan.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinStep {
    pub input_table: String,
    /// Candidate key columns on the input rows; the first non-null one is used per row.
    pub input_key_columns: Vec<String>,
    pub foreign_table: String,
    pub foreign_key_column: String,
    pub extra_criteria: Option<Criteria>,
}

impl JoinStep {
    pub fn new(input_table: &str, foreign_table: &str, foreign_key_column: &str) -> Self {
        Self {
            input_table: input_table.to_string(),
            input_key_columns: Vec::new(),
            foreign_table: foreign_table.to_string(),
            foreign_key_column: foreign_key_column.to_string(),
            extra_criteria: None,
        }
    }

    pub fn via(mut self, column: &str) -> Self {
        self.input_key_columns.push(column.to_string());
        self
    }

    pub fn via_any(mut self, columns: &[&str]) -> Self {
        self.input_key_columns
            .extend(columns.iter().map(|column| column.to_string()));
        self
    }

    pub fn with_criteria(mut self, criteria: Option<Criteria>) -> Self {
        self.extra_criteria = criteria;
        self
    }

    /// Keys of `row` under the first candidate column holding a non-null value.
    pub fn probe(&self, row: &Row) -> Vec<i64> {
        self.input_key_columns
            .iter()
            .find(|column| row.value(column).is_some())
            .map(|column| row.key_values(column))
            .unwrap_or_default()
    }

    /// The single query issued for `keys`, or `None` when there is nothing to look up.
    pub fn criteria_for(&self, keys: &BTreeSet<i64>) -> Option<Criteria> {
        let key_criteria = match keys.len() {
            0 => return None,
            1 => {
                let key = keys.iter().next().copied()?;
                Criteria::equals(self.foreign_key_column.as_str(), key)
            }
            _ => Criteria::is_one_of(self.foreign_key_column.as_str(), keys.iter().copied()),
        };
        Some(match &self.extra_criteria {
            Some(extra) => key_criteria.and_also(extra.clone()),
            None => key_criteria,
        })
    }
}

/// Runs one join step.
///
/// Returns every foreign row fetched. With `graph` set, foreign rows become nodes and each
/// matching input row gets an edge to them; without it the call only fetches.
pub fn join_foreign_table<S: RecordStore + ?Sized>(
    store: &S,
    step: &JoinStep,
    input_rows: &[Row],
    graph: Option<&mut RecordGraph>,
) -> Result<Vec<Row>, SlimsGraphError> {
    let probed: Vec<(&Row, Vec<i64>)> = input_rows
        .iter()
        .map(|row| (row, step.probe(row)))
        .collect();
    let keys: BTreeSet<i64> = probed
        .iter()
        .flat_map(|(_, keys)| keys.iter().copied())
        .collect();

    let Some(criteria) = step.criteria_for(&keys) else {
        debug!(
            input = %step.input_table,
            foreign = %step.foreign_table,
            "no join keys, skipping fetch"
        );
        return Ok(Vec::new());
    };

    let foreign_rows = store.fetch(&step.foreign_table, &criteria)?;
    debug!(
        input = %step.input_table,
        foreign = %step.foreign_table,
        keys = keys.len(),
        rows = foreign_rows.len(),
        "joined foreign table"
    );

    if let Some(graph) = graph {
        for foreign in &foreign_rows {
            let foreign_key = graph.add_node(foreign);
            let targets: AHashSet<i64> = foreign
                .key_values(&step.foreign_key_column)
                .into_iter()
                .collect();
            if targets.is_empty() {
                continue;
            }
            for (input_row, input_keys) in &probed {
                if input_keys.iter().any(|key| targets.contains(key)) {
                    let input_key = graph.add_node(input_row);
                    graph.add_edge(input_key, foreign_key.clone());
                }
            }
        }
    }

    Ok(foreign_rows)
}

/// Adds `rows` to the graph as roots and returns their keys in store order.
pub fn add_roots(graph: &mut RecordGraph, rows: &[Row]) -> Vec<NodeKey> {
    rows.iter().map(|row| graph.add_node(row)).collect()
}
