mod common;

use std::str::FromStr;

use common::{edge_strings, instant, memory_store};
use rust_decimal::Decimal;
use slimsgraph::{DateRange, ImagingSessionHandler, NodeKey, models::SlimsSpimData};

fn expected_run() -> SlimsSpimData {
    let channel = |text: &str| text.to_string();
    SlimsSpimData {
        experiment_run_created_on: Some(instant("2025-03-01T12:00:00Z")),
        order_project_id: Some("Some Project - Some Subproject 1".into()),
        order_created_by: Some("PersonS".into()),
        specimen_id: Some("BRN00000018".into()),
        subject_id: Some("744742".into()),
        protocol_name: Some("Imaging cleared mouse brains on SmartSPIM".into()),
        protocol_id: Some(
            "https://www.protocols.io/view/imaging-cleared-mouse-brains-on-smartspim".into(),
        ),
        date_performed: Some(instant("2025-03-01T12:00:00Z")),
        chamber_immersion_medium: Some("Ethyl Cinnamate".into()),
        sample_immersion_medium: Some("Ethyl Cinnamate".into()),
        chamber_refractive_index: Some(Decimal::from_str("1.557").unwrap()),
        sample_refractive_index: Some(Decimal::from_str("1.557").unwrap()),
        instrument_id: Some("440_SmartSPIM1_20240327".into()),
        experimenter_name: Some("Person R".into()),
        z_direction: Some("Superior to Inferior".into()),
        y_direction: Some("Anterior to Posterior".into()),
        x_direction: Some("Left to Right".into()),
        imaging_channels: Some(vec![
            channel("Laser = 488, Emission Filter = 525/45"),
            channel("Laser = 561, Emission Filter = 593/40"),
            channel("Laser = 639, Emission Filter = 667/30"),
        ]),
        stitching_channels: Some("Laser = 639, Emission Filter = 667/30".into()),
        ccf_registration_channels: Some("Laser = 639, Emission Filter = 667/30".into()),
        cell_segmentation_channels: None,
    }
}

#[test]
fn test_imaging_run_matches_golden_aggregate() {
    let store = memory_store("imaging.json");
    let runs = ImagingSessionHandler::new(&store)
        .get_spim_data(Some("744742"), None, None)
        .unwrap();
    assert_eq!(runs, vec![expected_run()]);
}

#[test]
fn test_order_is_reached_through_order_content() {
    let store = memory_store("imaging.json");
    let assembled = ImagingSessionHandler::new(&store)
        .get_graph(&DateRange::default())
        .unwrap();
    let edges = edge_strings(&assembled.graph.edges());
    assert_eq!(
        edges,
        vec![
            "Content.5301->OrderContent.5401",
            "ExperimentRun.5001->ExperimentRunStep.5101",
            "ExperimentRunStep.5101->ExperimentRunStepContent.5201",
            "ExperimentRunStep.5101->Result.5601",
            "ExperimentRunStep.5101->SOP.31",
            "ExperimentRunStep.5101->User.71",
            "ExperimentRunStepContent.5201->Content.5301",
            "OrderContent.5401->Order.5501",
            "Result.5601->ReferenceDataRecord.5701",
            "Result.5601->ReferenceDataRecord.5702",
        ]
    );
}

#[test]
fn test_instrument_id_ignores_non_instrument_reference_records() {
    let store = memory_store("imaging.json");
    let assembled = ImagingSessionHandler::new(&store)
        .get_graph(&DateRange::default())
        .unwrap();
    let medium = assembled
        .graph
        .row(&NodeKey::new("ReferenceDataRecord", 5702))
        .expect("immersion medium record joined");
    assert_eq!(
        medium.display_value("rdrc_fk_referenceDataType"),
        Some("Immersion Medium")
    );

    let runs = ImagingSessionHandler::new(&store)
        .get_spim_data(Some("744742"), None, None)
        .unwrap();
    assert_eq!(runs[0].instrument_id.as_deref(), Some("440_SmartSPIM1_20240327"));
}

#[test]
fn test_unknown_subject_returns_empty() {
    let store = memory_store("imaging.json");
    let runs = ImagingSessionHandler::new(&store)
        .get_spim_data(Some("000000"), None, None)
        .unwrap();
    assert!(runs.is_empty());
}
