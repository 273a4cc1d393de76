mod common;

use std::str::FromStr;

use common::{instant, memory_store};
use rust_decimal::Decimal;
use slimsgraph::{
    DateRange, HistologySessionHandler,
    models::{HistologyReagentData, HistologyWashData, SlimsHistologyData},
};

fn expected_index_matching() -> SlimsHistologyData {
    SlimsHistologyData {
        procedure_name: Some("SmartSPIM Refractive Index Matching".into()),
        experiment_run_created_on: Some(instant("2025-01-29T18:24:35.574Z")),
        specimen_id: Some("BRN00000002".into()),
        subject_id: Some("754372".into()),
        protocol_id: Some(
            "https://www.protocols.io/view/refractive-index-matching-ethyl-cinnamate".into(),
        ),
        protocol_name: Some("Refractive Index Matching - Ethyl Cinnamate (UNPUBLISHED)".into()),
        washes: vec![
            HistologyWashData {
                wash_name: Some("Refractive Index Matching Wash".into()),
                wash_type: Some("Refractive Index Matching".into()),
                start_time: Some(instant("2025-01-24T18:40:00Z")),
                end_time: Some(instant("2025-01-27T18:40:00Z")),
                modified_by: Some("PersonM".into()),
                reagents: vec![HistologyReagentData {
                    name: Some("rgntEX00000020".into()),
                    source: Some("Sigma-Aldrich".into()),
                    lot_number: Some("stbk5149".into()),
                }],
                mass: None,
            },
            HistologyWashData {
                wash_name: Some("Refractive Index Matching Wash 2".into()),
                modified_by: Some("PersonM".into()),
                ..Default::default()
            },
        ],
    }
}

#[test]
fn test_procedure_matches_golden_aggregate() {
    let store = memory_store("histology.json");
    let procedures = HistologySessionHandler::new(&store)
        .get_histology_data(Some("754372"), None, None)
        .unwrap();
    assert_eq!(procedures, vec![expected_index_matching()]);
}

#[test]
fn test_only_histology_templates_become_roots() {
    let store = memory_store("histology.json");
    let assembled = HistologySessionHandler::new(&store)
        .get_graph(&DateRange::default())
        .unwrap();
    let roots: Vec<String> = assembled.roots.iter().map(ToString::to_string).collect();
    assert_eq!(roots, vec!["ExperimentRun.1001", "ExperimentRun.1002"]);
    assert!(
        assembled
            .graph
            .edges()
            .iter()
            .any(|(from, to)| from.to_string() == "Content.501"
                && to.to_string() == "ReferenceDataRecord.601")
    );
}

#[test]
fn test_each_run_is_its_own_procedure() {
    let store = memory_store("histology.json");
    let procedures = HistologySessionHandler::new(&store)
        .get_histology_data(None, None, None)
        .unwrap();
    assert_eq!(procedures.len(), 2);

    let labeling = &procedures[1];
    assert_eq!(labeling.procedure_name.as_deref(), Some("SmartSPIM Labeling"));
    assert_eq!(labeling.subject_id.as_deref(), Some("754373"));
    assert_eq!(labeling.specimen_id.as_deref(), Some("BRN00000003"));
    assert_eq!(labeling.protocol_name, None);
    assert_eq!(labeling.washes.len(), 1);
    assert_eq!(
        labeling.washes[0].mass,
        Some(Decimal::from_str("1.25").unwrap())
    );
    assert!(labeling.washes[0].reagents.is_empty());
}

#[test]
fn test_subject_filter_excludes_other_procedures() {
    let store = memory_store("histology.json");
    let procedures = HistologySessionHandler::new(&store)
        .get_histology_data(Some("754373"), None, None)
        .unwrap();
    assert_eq!(procedures.len(), 1);
    assert_eq!(procedures[0].specimen_id.as_deref(), Some("BRN00000003"));
}

#[test]
fn test_end_date_before_all_runs_returns_nothing() {
    let store = memory_store("histology.json");
    let procedures = HistologySessionHandler::new(&store)
        .get_histology_data(None, None, Some("2024-12-31"))
        .unwrap();
    assert!(procedures.is_empty());
}
