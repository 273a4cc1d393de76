use std::collections::BTreeSet;
use std::fmt;

use ahash::AHashMap;

use crate::{row::Row, schema::TableKind};

/// Identity of a fetched row: `"{table}.{pk}"` when displayed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub table: String,
    pub pk: i64,
}

impl NodeKey {
    pub fn new(table: &str, pk: i64) -> Self {
        Self {
            table: table.to_string(),
            pk,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.pk)
    }
}

#[derive(Clone, Debug)]
pub struct GraphNode {
    pub row: Row,
    pub kind: TableKind,
}

/// Directed graph of fetched rows. Edges point from the referencing row to the referenced row.
#[derive(Debug, Default)]
pub struct RecordGraph {
    nodes: AHashMap<NodeKey, GraphNode>,
    outgoing: AHashMap<NodeKey, BTreeSet<NodeKey>>,
    edge_count: usize,
}

impl RecordGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `row` unless a row with the same key is already present; the first row wins.
    pub fn add_node(&mut self, row: &Row) -> NodeKey {
        let key = row.node_key();
        if !self.nodes.contains_key(&key) {
            let kind = TableKind::from_table_name(row.table_name());
            self.nodes.insert(
                key.clone(),
                GraphNode {
                    row: row.clone(),
                    kind,
                },
            );
        }
        key
    }

    pub fn add_edge(&mut self, from: NodeKey, to: NodeKey) {
        if self.outgoing.entry(from).or_default().insert(to) {
            self.edge_count += 1;
        }
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node(&self, key: &NodeKey) -> Option<&GraphNode> {
        self.nodes.get(key)
    }

    pub fn row(&self, key: &NodeKey) -> Option<&Row> {
        self.nodes.get(key).map(|node| &node.row)
    }

    /// Direct successors of `key`, ordered by table name then primary key.
    pub fn successors(&self, key: &NodeKey) -> impl Iterator<Item = &NodeKey> {
        self.outgoing.get(key).into_iter().flatten()
    }

    /// Every edge as `(from, to)`, sorted.
    pub fn edges(&self) -> Vec<(NodeKey, NodeKey)> {
        let mut edges: Vec<(NodeKey, NodeKey)> = self
            .outgoing
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from.clone(), to.clone())))
            .collect();
        edges.sort();
        edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
