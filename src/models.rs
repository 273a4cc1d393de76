//! Aggregates assembled from the record graph. Every scalar is optional because the remote
//! schema is only partially populated; repeated sub-records default to empty.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EcephysStreamModule {
    pub implant_hole: Option<i64>,
    pub assembly_name: Option<String>,
    pub probe_name: Option<String>,
    pub primary_target_structure: Option<String>,
    pub secondary_target_structures: Option<Vec<String>>,
    pub arc_angle: Option<Decimal>,
    pub module_angle: Option<Decimal>,
    pub rotation_angle: Option<Decimal>,
    pub coordinate_transform: Option<String>,
    pub ccf_coordinate_ap: Option<Decimal>,
    pub ccf_coordinate_ml: Option<Decimal>,
    pub ccf_coordinate_dv: Option<Decimal>,
    pub ccf_coordinate_unit: Option<String>,
    pub ccf_version: Option<String>,
    pub bregma_target_ap: Option<Decimal>,
    pub bregma_target_ml: Option<Decimal>,
    pub bregma_target_dv: Option<Decimal>,
    pub bregma_target_unit: Option<String>,
    pub surface_z: Option<Decimal>,
    pub surface_z_unit: Option<String>,
    pub manipulator_x: Option<Decimal>,
    pub manipulator_y: Option<Decimal>,
    pub manipulator_z: Option<Decimal>,
    pub manipulator_unit: Option<String>,
    pub dye: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EcephysRewardSpouts {
    pub spout_side: Option<String>,
    pub starting_position: Option<String>,
    pub variable_position: Option<bool>,
}

/// One electrophysiology session, rooted at an experiment run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlimsEcephysData {
    pub experiment_run_created_on: Option<DateTime<Utc>>,
    pub subject_id: Option<String>,
    pub operator: Option<String>,
    pub instrument: Option<String>,
    pub session_type: Option<String>,
    pub device_calibrations: Option<i64>,
    pub mouse_platform_name: Option<String>,
    pub active_mouse_platform: Option<bool>,
    pub session_name: Option<String>,
    pub animal_weight_prior: Option<Decimal>,
    pub animal_weight_after: Option<Decimal>,
    pub animal_weight_unit: Option<String>,
    pub reward_consumed: Option<Decimal>,
    pub reward_consumed_unit: Option<String>,
    pub stimulus_epochs: Option<i64>,
    pub link_to_stimulus_epoch_code: Option<String>,
    pub reward_solution: Option<String>,
    pub other_reward_solution: Option<String>,
    #[serde(default)]
    pub reward_spouts: Vec<EcephysRewardSpouts>,
    pub stream_modalities: Option<Vec<String>>,
    #[serde(default)]
    pub stream_modules: Vec<EcephysStreamModule>,
    pub daq_names: Option<Vec<String>>,
    pub camera_names: Option<Vec<String>>,
}

/// SmartSPIM imaging run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlimsSpimData {
    pub experiment_run_created_on: Option<DateTime<Utc>>,
    pub order_project_id: Option<String>,
    pub order_created_by: Option<String>,
    pub specimen_id: Option<String>,
    pub subject_id: Option<String>,
    pub protocol_name: Option<String>,
    pub protocol_id: Option<String>,
    pub date_performed: Option<DateTime<Utc>>,
    pub chamber_immersion_medium: Option<String>,
    pub sample_immersion_medium: Option<String>,
    pub chamber_refractive_index: Option<Decimal>,
    pub sample_refractive_index: Option<Decimal>,
    pub instrument_id: Option<String>,
    pub experimenter_name: Option<String>,
    pub z_direction: Option<String>,
    pub y_direction: Option<String>,
    pub x_direction: Option<String>,
    pub imaging_channels: Option<Vec<String>>,
    pub stitching_channels: Option<String>,
    pub ccf_registration_channels: Option<String>,
    pub cell_segmentation_channels: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistologyReagentData {
    pub name: Option<String>,
    pub source: Option<String>,
    pub lot_number: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistologyWashData {
    pub wash_name: Option<String>,
    pub wash_type: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
    #[serde(default)]
    pub reagents: Vec<HistologyReagentData>,
    pub mass: Option<Decimal>,
}

/// SmartSPIM histology procedure with its ordered washes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlimsHistologyData {
    pub procedure_name: Option<String>,
    pub experiment_run_created_on: Option<DateTime<Utc>>,
    pub specimen_id: Option<String>,
    pub subject_id: Option<String>,
    pub protocol_id: Option<String>,
    pub protocol_name: Option<String>,
    #[serde(default)]
    pub washes: Vec<HistologyWashData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlimsViralMaterialData {
    pub content_category: Option<String>,
    pub content_type: Option<String>,
    pub content_created_on: Option<DateTime<Utc>>,
    pub content_modified_on: Option<DateTime<Utc>>,
    pub viral_solution_type: Option<String>,
    pub virus_name: Option<String>,
    pub lot_number: Option<String>,
    pub lab_team: Option<String>,
    pub virus_type: Option<String>,
    pub virus_serotype: Option<String>,
    pub virus_plasmid_number: Option<String>,
    pub name: Option<String>,
    pub dose: Option<Decimal>,
    pub dose_unit: Option<String>,
    pub titer: Option<Decimal>,
    pub titer_unit: Option<String>,
    pub volume: Option<Decimal>,
    pub volume_unit: Option<String>,
    pub date_made: Option<DateTime<Utc>>,
    pub intake_date: Option<DateTime<Utc>>,
    pub storage_temperature: Option<String>,
    pub special_storage_guidelines: Option<Vec<String>>,
    pub special_handling_guidelines: Option<Vec<String>>,
    pub mix_count: Option<i64>,
    pub derivation_count: Option<i64>,
    pub ingredient_count: Option<i64>,
}

/// Viral injection content with its order and constituent viral materials.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlimsViralInjectionData {
    pub content_category: Option<String>,
    pub content_type: Option<String>,
    pub content_created_on: Option<DateTime<Utc>>,
    pub content_modified_on: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub viral_injection_buffer: Option<String>,
    pub volume: Option<Decimal>,
    pub volume_unit: Option<String>,
    pub labeling_protein: Option<String>,
    pub date_made: Option<DateTime<Utc>>,
    pub intake_date: Option<DateTime<Utc>>,
    pub storage_temperature: Option<String>,
    pub special_storage_guidelines: Option<Vec<String>>,
    pub special_handling_guidelines: Option<Vec<String>>,
    pub mix_count: Option<i64>,
    pub derivation_count: Option<i64>,
    pub ingredient_count: Option<i64>,
    pub assigned_mice: Option<Vec<String>>,
    pub requested_for_date: Option<DateTime<Utc>>,
    pub planned_injection_date: Option<DateTime<Utc>>,
    pub planned_injection_time: Option<DateTime<Utc>>,
    pub order_created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub viral_materials: Vec<SlimsViralMaterialData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlimsWaterRestrictionData {
    pub content_event_created_on: Option<DateTime<Utc>>,
    pub subject_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub assigned_by: Option<String>,
    pub target_weight_fraction: Option<Decimal>,
    pub baseline_weight: Option<Decimal>,
    pub weight_unit: Option<String>,
}
