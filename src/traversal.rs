use std::collections::VecDeque;

use ahash::AHashSet;

use crate::{
    graph::{GraphNode, NodeKey, RecordGraph},
    row::Row,
    schema::TableKind,
};

/// Mutation applied to an aggregate for one visited row.
pub type Handler<A> = fn(&mut A, &Row);

/// Selects the handler for a table kind; `None` skips the node.
pub type Dispatch<A> = fn(TableKind) -> Option<Handler<A>>;

/// Every node reachable from `root`, excluding `root` itself.
///
/// Nodes are ordered by (depth, table, pk) with each node placed at its shallowest depth, so the
/// result does not depend on store return order or insertion order.
pub fn descendants(graph: &RecordGraph, root: &NodeKey) -> Vec<NodeKey> {
    let mut visited = AHashSet::new();
    let mut queue = VecDeque::new();
    let mut ordered = Vec::new();
    visited.insert(root.clone());
    queue.push_back((root.clone(), 0usize));

    while let Some((node, level)) = queue.pop_front() {
        for next in graph.successors(&node) {
            if visited.insert(next.clone()) {
                ordered.push((level + 1, next.clone()));
                queue.push_back((next.clone(), level + 1));
            }
        }
    }
    ordered.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    ordered.into_iter().map(|(_, node)| node).collect()
}

/// Direct successors of `key` paired with their nodes, in (table, pk) order.
pub fn children<'g>(
    graph: &'g RecordGraph,
    key: &NodeKey,
) -> impl Iterator<Item = (&'g NodeKey, &'g GraphNode)> {
    graph
        .successors(key)
        .filter_map(move |child| graph.node(child).map(|node| (child, node)))
}

/// Folds every descendant of `root` into `aggregate` through `dispatch`.
pub fn fold_descendants<A>(
    graph: &RecordGraph,
    root: &NodeKey,
    aggregate: &mut A,
    dispatch: Dispatch<A>,
) {
    for key in descendants(graph, root) {
        let Some(node) = graph.node(&key) else {
            continue;
        };
        if let Some(handler) = dispatch(node.kind) {
            handler(aggregate, &node.row);
        }
    }
}
