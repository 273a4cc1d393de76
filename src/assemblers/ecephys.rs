use tracing::info;

use super::{AssembledGraph, DateRange, accepts, validate_subject_id};
use crate::{
    SlimsGraphError,
    criteria::Criteria,
    graph::RecordGraph,
    join::{JoinStep, add_roots, join_foreign_table},
    models::{EcephysRewardSpouts, EcephysStreamModule, SlimsEcephysData},
    row::Row,
    schema::{
        TableKind, content, experiment_run, experiment_run_step, experiment_run_step_content,
        experiment_template, reference_data_record as rdrc, result,
    },
    store::RecordStore,
    traversal::{Handler, fold_descendants},
};

pub const TEMPLATE_NAME: &str = "In Vivo Electrophysiology Recording";
const GROUP_OF_SESSIONS: &str = "Group of Sessions";

/// Electrophysiology sessions rooted at experiment runs of the recording template.
pub struct EcephysSessionHandler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> EcephysSessionHandler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn get_graph(&self, dates: &DateRange) -> Result<AssembledGraph, SlimsGraphError> {
        let templates = self.store.fetch(
            experiment_template::TABLE,
            &Criteria::equals(experiment_template::NAME, TEMPLATE_NAME),
        )?;
        let runs = join_foreign_table(
            self.store,
            &JoinStep::new(
                experiment_template::TABLE,
                experiment_run::TABLE,
                experiment_run::FK_TEMPLATE,
            )
            .via(experiment_template::PK)
            .with_criteria(dates.criteria(experiment_run::CREATED_ON)),
            &templates,
            None,
        )?;

        let mut graph = RecordGraph::new();
        let roots = add_roots(&mut graph, &runs);

        let steps = join_foreign_table(
            self.store,
            &JoinStep::new(
                experiment_run::TABLE,
                experiment_run_step::TABLE,
                experiment_run_step::FK_RUN,
            )
            .via(experiment_run::PK),
            &runs,
            Some(&mut graph),
        )?;
        let step_contents = join_foreign_table(
            self.store,
            &JoinStep::new(
                experiment_run_step::TABLE,
                experiment_run_step_content::TABLE,
                experiment_run_step_content::FK_STEP,
            )
            .via(experiment_run_step::PK),
            &steps,
            Some(&mut graph),
        )?;
        let results = join_foreign_table(
            self.store,
            &JoinStep::new(experiment_run_step::TABLE, result::TABLE, result::FK_STEP)
                .via(experiment_run_step::PK),
            &steps,
            Some(&mut graph),
        )?;
        join_foreign_table(
            self.store,
            &JoinStep::new(
                experiment_run_step_content::TABLE,
                content::TABLE,
                content::PK,
            )
            .via(experiment_run_step_content::FK_CONTENT),
            &step_contents,
            Some(&mut graph),
        )?;
        let references = join_foreign_table(
            self.store,
            &JoinStep::new(result::TABLE, rdrc::TABLE, rdrc::PK)
                .via_any(&[result::FK_MODULES_IN_STREAM, result::FK_REWARD_DELIVERY]),
            &results,
            Some(&mut graph),
        )?;
        join_foreign_table(
            self.store,
            &JoinStep::new(rdrc::TABLE, rdrc::TABLE, rdrc::PK).via(rdrc::FK_REWARD_SPOUTS),
            &references,
            Some(&mut graph),
        )?;

        Ok(AssembledGraph { graph, roots })
    }

    pub fn parse_graph(
        &self,
        assembled: &AssembledGraph,
        subject_id: Option<&str>,
        session_name: Option<&str>,
    ) -> Vec<SlimsEcephysData> {
        let mut sessions = Vec::new();
        for root in &assembled.roots {
            let mut session = SlimsEcephysData::default();
            if let Some(row) = assembled.graph.row(root) {
                session.experiment_run_created_on = row.instant_value(experiment_run::CREATED_ON);
            }
            fold_descendants(&assembled.graph, root, &mut session, dispatch);
            if accepts(subject_id, session.subject_id.as_deref())
                && accepts(session_name, session.session_name.as_deref())
            {
                sessions.push(session);
            }
        }
        sessions
    }

    /// Sessions created inside `[start_date, end_date]`, newest first.
    pub fn get_ecephys_data(
        &self,
        subject_id: Option<&str>,
        session_name: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<SlimsEcephysData>, SlimsGraphError> {
        validate_subject_id(subject_id)?;
        let dates = DateRange::parse(start_date, end_date)?;
        let assembled = self.get_graph(&dates)?;
        let mut sessions = self.parse_graph(&assembled, subject_id, session_name);
        sort_newest_first(&mut sessions);
        info!(
            roots = assembled.roots.len(),
            sessions = sessions.len(),
            "assembled ecephys sessions"
        );
        Ok(sessions)
    }
}

/// Stable sort by run creation, newest first; sessions without a timestamp go last.
pub fn sort_newest_first(sessions: &mut [SlimsEcephysData]) {
    sessions.sort_by(|a, b| b.experiment_run_created_on.cmp(&a.experiment_run_created_on));
}

fn dispatch(kind: TableKind) -> Option<Handler<SlimsEcephysData>> {
    match kind {
        TableKind::Content => Some(handle_content),
        TableKind::ExperimentRunStep => Some(handle_experiment_run_step),
        TableKind::Result => Some(handle_result),
        TableKind::ReferenceDataRecord => Some(handle_reference_data_record),
        _ => None,
    }
}

fn handle_content(session: &mut SlimsEcephysData, row: &Row) {
    session.subject_id = row.str_value(content::ID);
}

fn handle_experiment_run_step(session: &mut SlimsEcephysData, row: &Row) {
    if row.str_value(experiment_run_step::NAME).as_deref() != Some(GROUP_OF_SESSIONS) {
        return;
    }
    session.operator = row
        .joined_display_value(experiment_run_step::OPERATOR)
        .map(str::to_string);
    session.session_type = row.str_value(experiment_run_step::SESSION_TYPE);
    session.mouse_platform_name = row.str_value(experiment_run_step::MOUSE_PLATFORM_NAME);
    session.active_mouse_platform = row.bool_value(experiment_run_step::ACTIVE_MOUSE_PLATFORM);
    session.instrument = row
        .display_value(experiment_run_step::INSTRUMENT)
        .map(str::to_string);
    session.device_calibrations = row.i64_value(experiment_run_step::DEVICE_CALIBRATIONS);
}

fn handle_result(session: &mut SlimsEcephysData, row: &Row) {
    match row.str_value(result::TEST_LABEL).as_deref() {
        Some(result::LABEL_MOUSE_SESSION) => {
            session.session_name = row.str_value(result::SESSION_NAME);
            session.animal_weight_prior = row.decimal_value(result::ANIMAL_WEIGHT_PRIOR);
            session.animal_weight_after = row.decimal_value(result::ANIMAL_WEIGHT_POST);
            session.animal_weight_unit = row.unit(result::ANIMAL_WEIGHT_PRIOR).map(str::to_string);
            session.reward_consumed = row.decimal_value(result::REWARD_CONSUMED);
            session.reward_consumed_unit = row.unit(result::REWARD_CONSUMED).map(str::to_string);
            session.link_to_stimulus_epoch_code =
                row.str_value(result::LINK_TO_STIMULUS_EPOCH_CODE);
            session.stimulus_epochs = row.i64_value(result::STIMULUS_EPOCHS);
        }
        Some(result::LABEL_STREAMS) => {
            session.stream_modalities = row.string_list(result::STREAM_MODALITIES);
            session.daq_names = row.string_list(result::DAQ_NAMES);
            session.camera_names = row.string_list(result::CAMERA_NAMES);
        }
        _ => {}
    }
}

fn handle_reference_data_record(session: &mut SlimsEcephysData, row: &Row) {
    match row.display_value(rdrc::REFERENCE_DATA_TYPE) {
        Some(rdrc::TYPE_REWARD_DELIVERY) => {
            session.reward_solution = row.str_value(rdrc::REWARD_SOLUTION);
            session.other_reward_solution = row.str_value(rdrc::SPECIFY_REWARD_SOLUTION);
        }
        Some(rdrc::TYPE_REWARD_SPOUTS) => session.reward_spouts.push(reward_spouts(row)),
        Some(rdrc::TYPE_DOME_MODULE) => session.stream_modules.push(stream_module(row)),
        _ => {}
    }
}

fn reward_spouts(row: &Row) -> EcephysRewardSpouts {
    EcephysRewardSpouts {
        spout_side: row.str_value(rdrc::SPOUT_SIDE),
        starting_position: row.str_value(rdrc::STARTING_POSITION),
        variable_position: row.bool_value(rdrc::VARIABLE_POSITION),
    }
}

fn stream_module(row: &Row) -> EcephysStreamModule {
    let unit = |column: &str| row.unit(column).map(str::to_string);
    let display = |column: &str| row.display_value(column).map(str::to_string);
    EcephysStreamModule {
        implant_hole: row.i64_value(rdrc::IMPLANT_HOLE),
        assembly_name: row.str_value(rdrc::ASSEMBLY_NAME),
        probe_name: row.str_value(rdrc::PROBE_NAME),
        primary_target_structure: display(rdrc::PRIMARY_TARGETED_STRUCTURE),
        secondary_target_structures: row.display_value_list(rdrc::SECONDARY_TARGETED_STRUCTURES),
        arc_angle: row.decimal_value(rdrc::ARC_ANGLE),
        module_angle: row.decimal_value(rdrc::MODULE_ANGLE),
        rotation_angle: row.decimal_value(rdrc::ROTATION_ANGLE),
        coordinate_transform: display(rdrc::COORDINATE_TRANSFORM),
        ccf_coordinate_ap: row.decimal_value(rdrc::CCF_COORDINATES_AP),
        ccf_coordinate_ml: row.decimal_value(rdrc::CCF_COORDINATES_ML),
        ccf_coordinate_dv: row.decimal_value(rdrc::CCF_COORDINATES_DV),
        ccf_coordinate_unit: unit(rdrc::CCF_COORDINATES_AP),
        ccf_version: row.str_value(rdrc::CCF_VERSION),
        bregma_target_ap: row.decimal_value(rdrc::BREGMA_TARGET_AP),
        bregma_target_ml: row.decimal_value(rdrc::BREGMA_TARGET_ML),
        bregma_target_dv: row.decimal_value(rdrc::BREGMA_TARGET_DV),
        bregma_target_unit: unit(rdrc::BREGMA_TARGET_AP),
        surface_z: row.decimal_value(rdrc::SURFACE_Z),
        surface_z_unit: unit(rdrc::SURFACE_Z),
        manipulator_x: row.decimal_value(rdrc::MANIPULATOR_X),
        manipulator_y: row.decimal_value(rdrc::MANIPULATOR_Y),
        manipulator_z: row.decimal_value(rdrc::MANIPULATOR_Z),
        manipulator_unit: unit(rdrc::MANIPULATOR_X),
        dye: display(rdrc::DYE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session_at(millis: Option<i64>, name: &str) -> SlimsEcephysData {
        SlimsEcephysData {
            experiment_run_created_on: millis
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            session_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn newest_first_with_missing_last() {
        let mut sessions = vec![
            session_at(None, "none"),
            session_at(Some(1_700_000_000_000), "older"),
            session_at(Some(1_738_175_075_000), "newest"),
        ];
        sort_newest_first(&mut sessions);
        let names: Vec<_> = sessions
            .iter()
            .map(|s| s.session_name.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["newest", "older", "none"]);
    }
}
