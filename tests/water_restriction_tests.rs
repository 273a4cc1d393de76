mod common;

use std::str::FromStr;

use common::{edge_strings, instant, memory_store, sqlite_store};
use rust_decimal::Decimal;
use slimsgraph::{
    DateRange, WaterRestrictionSessionHandler, assemblers::water_restriction::root_criteria,
    models::SlimsWaterRestrictionData,
};

fn expected_event() -> SlimsWaterRestrictionData {
    SlimsWaterRestrictionData {
        content_event_created_on: Some(instant("2024-12-13T19:43:34.103Z")),
        subject_id: Some("762287".into()),
        start_date: Some(instant("2024-12-13T19:43:32.354Z")),
        end_date: None,
        assigned_by: Some("person.name".into()),
        target_weight_fraction: Some(Decimal::from_str("0.85").unwrap()),
        baseline_weight: Some(Decimal::from_str("28.23").unwrap()),
        weight_unit: Some("g".into()),
    }
}

#[test]
fn test_event_matches_golden_aggregate() {
    let store = memory_store("water_restriction.json");
    let events = WaterRestrictionSessionHandler::new(&store)
        .get_water_restriction_data(Some("762287"), None, None)
        .unwrap();
    assert_eq!(events, vec![expected_event()]);
}

#[test]
fn test_only_water_restriction_events_are_roots() {
    let store = memory_store("water_restriction.json");
    let assembled = WaterRestrictionSessionHandler::new(&store)
        .get_graph(&DateRange::default())
        .unwrap();
    let roots: Vec<String> = assembled.roots.iter().map(ToString::to_string).collect();
    assert_eq!(roots, vec!["ContentEvent.15", "ContentEvent.17"]);
    assert_eq!(
        edge_strings(&assembled.graph.edges()),
        vec!["ContentEvent.15->Content.55", "ContentEvent.17->Content.56"]
    );
    let tables: Vec<String> = store.queries().into_iter().map(|q| q.table).collect();
    assert_eq!(tables, vec!["ContentEvent", "Content"]);
}

#[test]
fn test_date_window_is_applied_to_the_event_query() {
    let store = memory_store("water_restriction.json");
    let dates = DateRange::parse(Some("2024-12-13T19:43:32"), None).unwrap();
    let assembled = WaterRestrictionSessionHandler::new(&store)
        .get_graph(&dates)
        .unwrap();
    let roots: Vec<String> = assembled.roots.iter().map(ToString::to_string).collect();
    assert_eq!(roots, vec!["ContentEvent.15"]);

    let root_query = &store.queries()[0];
    assert_eq!(root_query.table, "ContentEvent");
    assert_eq!(root_query.criteria, root_criteria(&dates));
    assert_eq!(root_query.criteria.operator(), "and");
}

#[test]
fn test_sqlite_store_assembles_the_same_events() {
    let memory = memory_store("water_restriction.json");
    let sqlite = sqlite_store("water_restriction.json");
    let from_memory = WaterRestrictionSessionHandler::new(&memory)
        .get_water_restriction_data(None, None, None)
        .unwrap();
    let from_sqlite = WaterRestrictionSessionHandler::new(&sqlite)
        .get_water_restriction_data(None, None, None)
        .unwrap();
    assert_eq!(from_memory.len(), 2);
    assert_eq!(from_memory, from_sqlite);
}

#[test]
fn test_invalid_date_is_a_validation_error() {
    let store = memory_store("water_restriction.json");
    let err = WaterRestrictionSessionHandler::new(&store)
        .get_water_restriction_data(None, Some("13/12/2024"), None)
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.query_count(), 0);
}
