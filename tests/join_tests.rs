use std::collections::BTreeSet;

use serde_json::json;
use slimsgraph::{
    Criteria, Field, JoinStep, MemoryRecordStore, RecordGraph, RecordStore, Row,
    SlimsGraphError, join::add_roots, join_foreign_table,
};

fn run(pk: i64) -> Row {
    Row::new("ExperimentRun", pk, vec![Field::new("xprn_pk", json!(pk))])
}

fn step(pk: i64, run: i64) -> Row {
    Row::new(
        "ExperimentRunStep",
        pk,
        vec![
            Field::new("xprs_pk", json!(pk)),
            Field::new("xprs_fk_experimentRun", json!(run)),
        ],
    )
}

fn store_with_steps() -> MemoryRecordStore {
    let mut store = MemoryRecordStore::new();
    for row in [step(10, 1), step(11, 1), step(20, 2), step(30, 3)] {
        store.insert(row);
    }
    store
}

fn run_to_steps() -> JoinStep {
    JoinStep::new("ExperimentRun", "ExperimentRunStep", "xprs_fk_experimentRun").via("xprn_pk")
}

#[test]
fn test_empty_key_set_issues_no_query() {
    let store = store_with_steps();
    let mut graph = RecordGraph::new();
    let unkeyed = Row::new("ExperimentRun", 1, vec![Field::new("xprn_pk", json!(null))]);

    let rows = join_foreign_table(&store, &run_to_steps(), &[unkeyed], Some(&mut graph)).unwrap();
    assert!(rows.is_empty());
    assert_eq!(store.query_count(), 0);

    let rows = join_foreign_table(&store, &run_to_steps(), &[], None).unwrap();
    assert!(rows.is_empty());
    assert_eq!(store.query_count(), 0);
    assert_eq!(graph.node_count(), 0);
}

#[test]
fn test_single_key_uses_equals_and_many_use_in_set() {
    let store = store_with_steps();
    join_foreign_table(&store, &run_to_steps(), &[run(1)], None).unwrap();
    join_foreign_table(&store, &run_to_steps(), &[run(2), run(1), run(2)], None).unwrap();

    let queries = store.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].table, "ExperimentRunStep");
    assert_eq!(queries[0].criteria, Criteria::equals("xprs_fk_experimentRun", 1));
    assert_eq!(
        queries[1].criteria,
        Criteria::is_one_of("xprs_fk_experimentRun", [1_i64, 2])
    );
}

#[test]
fn test_extra_criteria_are_anded_after_key_criterion() {
    let step = run_to_steps().with_criteria(Some(Criteria::equals("xprs_name", "Streams")));
    let keys: BTreeSet<i64> = [7].into_iter().collect();
    assert_eq!(
        step.criteria_for(&keys),
        Some(
            Criteria::equals("xprs_fk_experimentRun", 7)
                .and_also(Criteria::equals("xprs_name", "Streams"))
        )
    );
    assert_eq!(step.criteria_for(&BTreeSet::new()), None);
}

#[test]
fn test_edges_link_inputs_to_matching_foreign_rows() {
    let store = store_with_steps();
    let mut graph = RecordGraph::new();
    let runs = vec![run(1), run(2), run(4)];
    add_roots(&mut graph, &runs);

    let steps = join_foreign_table(&store, &run_to_steps(), &runs, Some(&mut graph)).unwrap();
    assert_eq!(steps.len(), 3);

    let edges: Vec<String> = graph
        .edges()
        .iter()
        .map(|(from, to)| format!("{from}->{to}"))
        .collect();
    assert_eq!(
        edges,
        vec![
            "ExperimentRun.1->ExperimentRunStep.10",
            "ExperimentRun.1->ExperimentRunStep.11",
            "ExperimentRun.2->ExperimentRunStep.20",
        ]
    );
    assert_eq!(graph.node_count(), 6);
}

#[test]
fn test_input_nodes_missing_from_graph_are_added() {
    let store = store_with_steps();
    let mut graph = RecordGraph::new();
    join_foreign_table(&store, &run_to_steps(), &[run(3)], Some(&mut graph)).unwrap();
    assert!(graph.contains(&run(3).node_key()));
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_list_valued_keys_are_flattened_and_first_candidate_wins() {
    let mut store = MemoryRecordStore::new();
    for pk in [100, 101, 102] {
        store.insert(Row::new(
            "ReferenceDataRecord",
            pk,
            vec![Field::new("rdrc_pk", json!(pk))],
        ));
    }
    let result = Row::new(
        "Result",
        1,
        vec![
            Field::new("rslt_cf_fk_modulesinStream", json!([100, 101])),
            Field::new("rslt_cf_fk_rewardDelivery", json!(102)),
        ],
    );
    let step = JoinStep::new("Result", "ReferenceDataRecord", "rdrc_pk")
        .via_any(&["rslt_cf_fk_modulesinStream", "rslt_cf_fk_rewardDelivery"]);
    assert_eq!(step.probe(&result), vec![100, 101]);

    let mut graph = RecordGraph::new();
    let rows = join_foreign_table(&store, &step, &[result], Some(&mut graph)).unwrap();
    let pks: Vec<i64> = rows.iter().map(Row::pk).collect();
    assert_eq!(pks, vec![100, 101]);
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_dry_fetch_leaves_graph_untouched() {
    let store = store_with_steps();
    let mut graph = RecordGraph::new();
    join_foreign_table(&store, &run_to_steps(), &[run(1)], Some(&mut graph)).unwrap();
    let edges_before = graph.edges();
    assert_eq!(graph.node_count(), 3);

    let rows = join_foreign_table(&store, &run_to_steps(), &[run(2), run(3)], None).unwrap();
    assert_eq!(rows.iter().map(Row::pk).collect::<Vec<_>>(), vec![20, 30]);
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edges(), edges_before);
    assert!(!graph.contains(&run(2).node_key()));
}

#[test]
fn test_store_failure_propagates() {
    let mut store = store_with_steps();
    store.fail_table("ExperimentRunStep", "connection reset");
    let err = join_foreign_table(&store, &run_to_steps(), &[run(1)], None).unwrap_err();
    assert!(matches!(err, SlimsGraphError::Store(_)));
    assert!(err.to_string().contains("connection reset"));
}

#[test]
fn test_boxed_store_is_a_record_store() {
    let store: Box<dyn RecordStore> = Box::new(store_with_steps());
    let rows = join_foreign_table(&store, &run_to_steps(), &[run(2)], None).unwrap();
    assert_eq!(rows.len(), 1);
}
