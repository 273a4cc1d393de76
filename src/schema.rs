//! Table kinds and the column aliases each assembler reads.
//!
//! Column names belong to the record store and change independently of the aggregates, so
//! handlers never spell a column inline; they go through the per-table modules below.

use std::fmt;

/// Tables the assemblers know how to walk. Anything else resolves to [`TableKind::Unknown`]
/// and is skipped during traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    ExperimentTemplate,
    ExperimentRun,
    ExperimentRunStep,
    ExperimentRunStepContent,
    Content,
    ContentType,
    ContentRelation,
    ContentEvent,
    Result,
    ReferenceDataRecord,
    Sop,
    Order,
    OrderContent,
    User,
    Unknown,
}

impl TableKind {
    pub fn from_table_name(name: &str) -> Self {
        match name {
            experiment_template::TABLE => TableKind::ExperimentTemplate,
            experiment_run::TABLE => TableKind::ExperimentRun,
            experiment_run_step::TABLE => TableKind::ExperimentRunStep,
            experiment_run_step_content::TABLE => TableKind::ExperimentRunStepContent,
            content::TABLE => TableKind::Content,
            content_type::TABLE => TableKind::ContentType,
            content_relation::TABLE => TableKind::ContentRelation,
            content_event::TABLE => TableKind::ContentEvent,
            result::TABLE => TableKind::Result,
            reference_data_record::TABLE => TableKind::ReferenceDataRecord,
            sop::TABLE => TableKind::Sop,
            order::TABLE => TableKind::Order,
            order_content::TABLE => TableKind::OrderContent,
            user::TABLE => TableKind::User,
            _ => TableKind::Unknown,
        }
    }

    pub fn table_name(self) -> Option<&'static str> {
        let name = match self {
            TableKind::ExperimentTemplate => experiment_template::TABLE,
            TableKind::ExperimentRun => experiment_run::TABLE,
            TableKind::ExperimentRunStep => experiment_run_step::TABLE,
            TableKind::ExperimentRunStepContent => experiment_run_step_content::TABLE,
            TableKind::Content => content::TABLE,
            TableKind::ContentType => content_type::TABLE,
            TableKind::ContentRelation => content_relation::TABLE,
            TableKind::ContentEvent => content_event::TABLE,
            TableKind::Result => result::TABLE,
            TableKind::ReferenceDataRecord => reference_data_record::TABLE,
            TableKind::Sop => sop::TABLE,
            TableKind::Order => order::TABLE,
            TableKind::OrderContent => order_content::TABLE,
            TableKind::User => user::TABLE,
            TableKind::Unknown => return None,
        };
        Some(name)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name().unwrap_or("Unknown"))
    }
}

pub mod experiment_template {
    pub const TABLE: &str = "ExperimentTemplate";
    pub const PK: &str = "xptm_pk";
    pub const NAME: &str = "xptm_name";
}

pub mod experiment_run {
    pub const TABLE: &str = "ExperimentRun";
    pub const PK: &str = "xprn_pk";
    pub const FK_TEMPLATE: &str = "xprn_fk_experimentTemplate";
    pub const CREATED_ON: &str = "xprn_createdOn";
}

pub mod experiment_run_step {
    pub const TABLE: &str = "ExperimentRunStep";
    pub const PK: &str = "xprs_pk";
    pub const FK_RUN: &str = "xprs_fk_experimentRun";
    pub const NAME: &str = "xprs_name";
    pub const OPERATOR: &str = "xprs_cf_fk_operator";
    pub const SESSION_TYPE: &str = "xprs_cf_sessionType";
    pub const MOUSE_PLATFORM_NAME: &str = "xprs_cf_mousePlatformName";
    pub const ACTIVE_MOUSE_PLATFORM: &str = "xprs_cf_activeMousePlatform";
    pub const INSTRUMENT: &str = "xprs_cf_fk_instrumentJson";
    pub const DEVICE_CALIBRATIONS: &str = "xprs_cf_fk_deviceCalibrations";
    pub const FK_PROTOCOL: &str = "xprs_cf_fk_protocol";
    pub const FK_REAGENT: &str = "xprs_cf_fk_reagent";
    pub const FK_EXPERIMENTER: &str = "xprs_cf_fk_experimenter";
    pub const WASH_TYPE: &str = "xprs_cf_spimWashType";
    pub const START_TIME: &str = "xprs_cf_startTime";
    pub const END_TIME: &str = "xprs_cf_endTime";
    pub const MODIFIED_BY: &str = "xprs_modifiedBy";
    pub const MASS: &str = "xprs_cf_mass";
}

pub mod experiment_run_step_content {
    pub const TABLE: &str = "ExperimentRunStepContent";
    pub const PK: &str = "xrsc_pk";
    pub const FK_STEP: &str = "xrsc_fk_experimentRunStep";
    pub const FK_CONTENT: &str = "xrsc_fk_content";
}

pub mod content {
    pub const TABLE: &str = "Content";
    pub const PK: &str = "cntn_pk";
    pub const ID: &str = "cntn_id";
    pub const BARCODE: &str = "cntn_barCode";
    pub const CATEGORY: &str = "cntn_fk_category";
    pub const CONTENT_TYPE: &str = "cntn_fk_contentType";
    pub const CREATED_ON: &str = "cntn_createdOn";
    pub const MODIFIED_ON: &str = "cntn_modifiedOn";
    pub const SOURCE: &str = "cntn_fk_source";
    pub const LOT_NUMBER: &str = "cntn_cf_lotNumber";
    pub const CATALOG_NUMBER_REAGENTS: &str = "cntn_cf_fk_catalogNumberReagents";
    pub const VIRAL_INJECTION_BUFFER: &str = "cntn_cf_fk_viralInjectionBuffer";
    pub const VOLUME_REQUIRED: &str = "cntn_cf_volumeRequired";
    pub const LABELING_PROTEIN: &str = "cntn_cf_fk_viralInjectionFluorescentLabelingP";
    pub const DATE_MADE: &str = "cntn_cf_dateMade";
    pub const INTAKE_DATE: &str = "cntn_cf_intakeDate_NA";
    pub const STORAGE_TEMPERATURE: &str = "cntn_cf_fk_storageTemp_dynChoice";
    pub const SPECIAL_STORAGE_GUIDELINES: &str = "cntn_cf_fk_specialStorageGuidelines";
    pub const SPECIAL_HANDLING_GUIDELINES: &str = "cntn_cf_fk_specialHandlingGuidelines";
    pub const VIRAL_SOLUTION_TYPE: &str = "cntn_cf_fk_viralSolutionType";
    pub const VIRUS_NAME: &str = "cntn_cf_virusName";
    pub const LAB_TEAM: &str = "cntn_cf_fk_labTeam";
    pub const VIRUS_TYPE: &str = "cntn_cf_fk_virusType";
    pub const VIRUS_SEROTYPE: &str = "cntn_cf_fk_virusSerotype";
    pub const VIRUS_PLASMID_NUMBER: &str = "cntn_cf_virusPlasmidNumber";
    pub const DOSE: &str = "cntn_cf_dose";
    pub const TITER: &str = "cntn_cf_titer";
    pub const DERIVED_COUNT: &str = "derivedCount";
    pub const INGREDIENT_COUNT: &str = "ingredientCount";
    pub const MIX_COUNT: &str = "mixCount";

    /// Category display values that mark a content row as a reagent.
    pub const REAGENT_CATEGORIES: [&str; 2] = [
        "Reagents, Externally Manufactured",
        "Reagents, Internally Produced",
    ];
    pub const VIRAL_SOLUTION: &str = "Viral solution";
}

pub mod content_type {
    pub const TABLE: &str = "ContentType";
    pub const PK: &str = "cntp_pk";
    pub const NAME: &str = "cntp_name";
}

pub mod content_relation {
    pub const TABLE: &str = "ContentRelation";
    pub const PK: &str = "corl_pk";
    pub const FK_FROM: &str = "corl_fk_from";
    pub const FK_TO: &str = "corl_fk_to";
}

pub mod content_event {
    pub const TABLE: &str = "ContentEvent";
    pub const PK: &str = "cnvn_pk";
    pub const EVENT_TYPE: &str = "cnvn_cf_eventType";
    pub const FK_CONTENT: &str = "cnvn_fk_content";
    pub const CREATED_ON: &str = "cnvn_createdOn";
    pub const START_DATE: &str = "cnvn_cf_startDate";
    pub const END_DATE: &str = "cnvn_cf_endDate";
    pub const ASSIGNED_BY: &str = "cnvn_cf_assignedBy";
    pub const TARGET_WEIGHT_FRACTION: &str = "cnvn_cf_targetWeightFraction";
    pub const BASELINE_WEIGHT: &str = "cnvn_cf_baselineWeight";
}

pub mod result {
    pub const TABLE: &str = "Result";
    pub const PK: &str = "rslt_pk";
    pub const FK_STEP: &str = "rslt_fk_experimentRunStep";
    pub const TEST_LABEL: &str = "test_label";
    pub const SESSION_NAME: &str = "rslt_cf_sessionName";
    pub const ANIMAL_WEIGHT_PRIOR: &str = "rslt_cf_animalWeightPrior";
    pub const ANIMAL_WEIGHT_POST: &str = "rslt_cf_animalWeightPost";
    pub const REWARD_CONSUMED: &str = "rslt_cf_rewardConsumedvolume";
    pub const LINK_TO_STIMULUS_EPOCH_CODE: &str = "rslt_cf_linkToStimulusEpochCode";
    pub const STIMULUS_EPOCHS: &str = "rslt_cf_fk_stimulusEpochs";
    pub const STREAM_MODALITIES: &str = "rslt_cf_streamModalities";
    pub const DAQ_NAMES: &str = "rslt_cf_daqNames";
    pub const CAMERA_NAMES: &str = "rslt_cf_cameraNames";
    pub const FK_MODULES_IN_STREAM: &str = "rslt_cf_fk_modulesinStream";
    pub const FK_REWARD_DELIVERY: &str = "rslt_cf_fk_rewardDelivery";
    pub const DATE_PERFORMED: &str = "rslt_cf_datePerformed";
    pub const CHAMBER_IMMERSION_MEDIUM: &str = "rslt_cf_chamberImmersionMedium";
    pub const SAMPLE_IMMERSION_MEDIUM: &str = "rslt_cf_sampleImmersionMedium";
    pub const CHAMBER_REFRACTIVE_INDEX: &str = "rslt_cf_chamberRefractiveIndex";
    pub const SAMPLE_REFRACTIVE_INDEX: &str = "rslt_cf_sampleRefractiveIndex";
    pub const FK_INSTRUMENT_JSON: &str = "rslt_cf_fk_instrumentJson";
    pub const Z_DIRECTION: &str = "rslt_cf_zDirection";
    pub const Y_DIRECTION: &str = "rslt_cf_yDirection";
    pub const X_DIRECTION: &str = "rslt_cf_xDirection";
    pub const IMAGING_CHANNELS: &str = "rslt_cf_imagingChannels";
    pub const STITCHING_CHANNELS: &str = "rslt_cf_stitchingChannels";
    pub const CCF_REGISTRATION_CHANNELS: &str = "rslt_cf_ccfRegistrationChannels";
    pub const CELL_SEGMENTATION_CHANNELS: &str = "rslt_cf_cellSegmentationChannels";

    pub const LABEL_MOUSE_SESSION: &str = "Mouse Session";
    pub const LABEL_STREAMS: &str = "Streams";
    pub const LABEL_SPIM_IMAGING: &str = "SPIM Imaging";
}

pub mod reference_data_record {
    pub const TABLE: &str = "ReferenceDataRecord";
    pub const PK: &str = "rdrc_pk";
    pub const NAME: &str = "rdrc_name";
    pub const REFERENCE_DATA_TYPE: &str = "rdrc_fk_referenceDataType";
    pub const ATTACHMENT_COUNT: &str = "attachmentCount";
    pub const INSTRUMENT_JSON_ATTACHMENT: &str = "rdrc_cf_instrumentJsonAttachment";
    pub const REWARD_SOLUTION: &str = "rdrc_cf_rewardSolution";
    pub const SPECIFY_REWARD_SOLUTION: &str = "rdrc_cf_specifyRewardSolution";
    pub const FK_REWARD_SPOUTS: &str = "rdrc_cf_fk_rewardSpouts";
    pub const SPOUT_SIDE: &str = "rdrc_cf_spoutSide";
    pub const STARTING_POSITION: &str = "rdrc_cf_startingPosition";
    pub const VARIABLE_POSITION: &str = "rdrc_cf_variablePosition";
    pub const IMPLANT_HOLE: &str = "rdrc_cf_implantHole";
    pub const ASSEMBLY_NAME: &str = "rdrc_cf_assemblyName";
    pub const PROBE_NAME: &str = "rdrc_cf_ephysProbeName";
    pub const PRIMARY_TARGETED_STRUCTURE: &str = "rdrc_cf_fk_primaryTargetedStructure";
    pub const SECONDARY_TARGETED_STRUCTURES: &str = "rdrc_cf_fk_secondaryTargetedStructures";
    pub const ARC_ANGLE: &str = "rdrc_cf_arcAngle";
    pub const MODULE_ANGLE: &str = "rdrc_cf_moduleAngle";
    pub const ROTATION_ANGLE: &str = "rdrc_cf_rotationAngle";
    pub const COORDINATE_TRANSFORM: &str = "rdrc_cf_fk_coordinateTransform";
    pub const CCF_COORDINATES_AP: &str = "rdrc_cf_ccfCoordinatesAp";
    pub const CCF_COORDINATES_ML: &str = "rdrc_cf_ccfCoordinatesMl";
    pub const CCF_COORDINATES_DV: &str = "rdrc_cf_ccfCoordinatesDv";
    pub const CCF_VERSION: &str = "rdrc_cf_ccfVersion";
    pub const BREGMA_TARGET_AP: &str = "rdrc_cf_targetAp";
    pub const BREGMA_TARGET_ML: &str = "rdrc_cf_targetMl";
    pub const BREGMA_TARGET_DV: &str = "rdrc_cf_targetDv";
    pub const SURFACE_Z: &str = "rdrc_cf_surfaceZ";
    pub const MANIPULATOR_X: &str = "rdrc_cf_manipulatorX";
    pub const MANIPULATOR_Y: &str = "rdrc_cf_manipulatorY";
    pub const MANIPULATOR_Z: &str = "rdrc_cf_manipulatorZ";
    pub const DYE: &str = "rdrc_cf_fk_dye";

    pub const TYPE_REWARD_DELIVERY: &str = "Reward Delivery";
    pub const TYPE_REWARD_SPOUTS: &str = "Reward Spouts";
    pub const TYPE_DOME_MODULE: &str = "Dome Module";
    pub const TYPE_INSTRUMENT: &str = "Instrument";
}

pub mod sop {
    pub const TABLE: &str = "SOP";
    pub const PK: &str = "stop_pk";
    pub const NAME: &str = "stop_name";
    pub const LINK: &str = "stop_link";
}

pub mod order {
    pub const TABLE: &str = "Order";
    pub const PK: &str = "ordr_pk";
    pub const FK_VIRAL_INJECTION: &str = "ordr_cf_fk_viralInjection";
    pub const ASSIGNED_MICE: &str = "ordr_cf_fk_assignedMice";
    pub const REQUESTED_FOR_DATE: &str = "ordr_cf_requestedForDate";
    pub const PLANNED_ON_DATE: &str = "ordr_plannedOnDate";
    pub const PLANNED_ON_TIME: &str = "ordr_plannedOnTime";
    pub const CREATED_ON: &str = "ordr_createdOn";
    pub const CREATED_BY: &str = "ordr_createdBy";
    pub const PROJECT_ID: &str = "ordr_cf_fk_projectId";
    pub const DERIVED_COUNT: &str = "derivedCount";
    pub const INGREDIENT_COUNT: &str = "ingredientCount";
    pub const MIX_COUNT: &str = "mixCount";
}

pub mod order_content {
    pub const TABLE: &str = "OrderContent";
    pub const PK: &str = "ordc_pk";
    pub const FK_CONTENT: &str = "ordc_fk_content";
    pub const FK_ORDER: &str = "ordc_fk_order";
}

pub mod user {
    pub const TABLE: &str = "User";
    pub const PK: &str = "user_pk";
    pub const FULL_NAME: &str = "user_fullName";
}
