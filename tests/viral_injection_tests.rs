mod common;

use std::str::FromStr;

use common::{edge_strings, instant, memory_store};
use rust_decimal::Decimal;
use slimsgraph::{
    DateRange, ViralInjectionSessionHandler,
    models::{SlimsViralInjectionData, SlimsViralMaterialData},
};

fn dec(text: &str) -> Option<Decimal> {
    Some(Decimal::from_str(text).unwrap())
}

fn expected_injection() -> SlimsViralInjectionData {
    SlimsViralInjectionData {
        content_category: Some("Viral Materials".into()),
        content_type: Some("Viral injection".into()),
        content_created_on: Some(instant("2025-04-30T12:00:00Z")),
        content_modified_on: Some(instant("2025-05-08T15:23:15.853Z")),
        name: Some("INJ00000002".into()),
        viral_injection_buffer: Some("AAV Buffer".into()),
        volume: dec("98.56"),
        volume_unit: Some("&mu;l".into()),
        labeling_protein: Some("tdTomato".into()),
        date_made: Some(instant("2025-04-30T12:00:00Z")),
        intake_date: None,
        storage_temperature: Some("4 C".into()),
        special_storage_guidelines: Some(vec!["Light sensitive storage".into()]),
        special_handling_guidelines: Some(vec!["Use only in BSL2 hood".into()]),
        mix_count: None,
        derivation_count: None,
        ingredient_count: None,
        assigned_mice: Some(vec!["614178".into()]),
        requested_for_date: None,
        planned_injection_date: Some(instant("2025-05-08T12:00:00Z")),
        planned_injection_time: None,
        order_created_on: Some(instant("2025-05-08T15:23:15.853Z")),
        viral_materials: vec![SlimsViralMaterialData {
            content_category: Some("Viral Materials".into()),
            content_type: Some("Viral solution".into()),
            content_created_on: Some(instant("2024-11-01T09:00:00Z")),
            content_modified_on: None,
            viral_solution_type: Some("Injection Dilution".into()),
            virus_name: Some("7x-TRE-tDTomato".into()),
            lot_number: Some("VT5355g".into()),
            lab_team: Some("Molecular Anatomy".into()),
            virus_type: Some("AAV".into()),
            virus_serotype: Some("PhP.eB".into()),
            virus_plasmid_number: Some("AiP300001".into()),
            name: Some("VRS00000029".into()),
            dose: dec("180000000000"),
            dose_unit: Some("gc".into()),
            titer: dec("24200000000000"),
            titer_unit: Some("GC/ml".into()),
            volume: dec("8.55"),
            volume_unit: Some("&mu;l".into()),
            date_made: None,
            intake_date: None,
            storage_temperature: Some("-80 C".into()),
            special_storage_guidelines: None,
            special_handling_guidelines: None,
            mix_count: Some(1),
            derivation_count: Some(0),
            ingredient_count: Some(0),
        }],
    }
}

#[test]
fn test_injection_matches_golden_aggregate() {
    let store = memory_store("viral_injection.json");
    let injections = ViralInjectionSessionHandler::new(&store)
        .get_viral_injection_data(Some("614178"), None, None)
        .unwrap();
    assert_eq!(injections, vec![expected_injection()]);
}

#[test]
fn test_materials_are_linked_through_content_relation() {
    let store = memory_store("viral_injection.json");
    let assembled = ViralInjectionSessionHandler::new(&store)
        .get_graph(&DateRange::default())
        .unwrap();
    assert_eq!(
        edge_strings(&assembled.graph.edges()),
        vec![
            "Content.801->ContentRelation.901",
            "Content.801->Order.1101",
            "Content.803->Order.1102",
            "ContentRelation.901->Content.802",
        ]
    );
}

#[test]
fn test_subject_filter_uses_assigned_mice() {
    let store = memory_store("viral_injection.json");
    let handler = ViralInjectionSessionHandler::new(&store);

    let all = handler.get_viral_injection_data(None, None, None).unwrap();
    assert_eq!(all.len(), 2);

    let other = handler
        .get_viral_injection_data(Some("614179"), None, None)
        .unwrap();
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].name.as_deref(), Some("INJ00000003"));
    assert!(other[0].viral_materials.is_empty());

    assert!(
        handler
            .get_viral_injection_data(Some("000001"), None, None)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_start_date_filters_root_contents() {
    let store = memory_store("viral_injection.json");
    let recent = ViralInjectionSessionHandler::new(&store)
        .get_viral_injection_data(None, Some("2025-01-01T00:00:00Z"), None)
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].name.as_deref(), Some("INJ00000002"));
}
