use tracing::info;

use super::{AssembledGraph, DateRange, accepts, validate_subject_id};
use crate::{
    SlimsGraphError,
    coerce::parse_html_anchor,
    criteria::Criteria,
    graph::RecordGraph,
    join::{JoinStep, add_roots, join_foreign_table},
    models::SlimsSpimData,
    row::Row,
    schema::{
        TableKind, content, experiment_run, experiment_run_step, experiment_run_step_content,
        experiment_template, order, order_content, reference_data_record as rdrc, result, sop,
        user,
    },
    store::RecordStore,
    traversal::{Handler, fold_descendants},
};

pub const TEMPLATE_NAME: &str = "SmartSPIM Imaging";

/// SmartSPIM imaging runs.
pub struct ImagingSessionHandler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> ImagingSessionHandler<'a, S> {
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
        let contents = join_foreign_table(
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
        let order_contents = join_foreign_table(
            self.store,
            &JoinStep::new(content::TABLE, order_content::TABLE, order_content::FK_CONTENT)
                .via(content::PK),
            &contents,
            Some(&mut graph),
        )?;
        join_foreign_table(
            self.store,
            &JoinStep::new(order_content::TABLE, order::TABLE, order::PK)
                .via(order_content::FK_ORDER),
            &order_contents,
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
            &JoinStep::new(result::TABLE, rdrc::TABLE, rdrc::PK).via(result::FK_INSTRUMENT_JSON),
            &results,
            Some(&mut graph),
        )?;
        join_foreign_table(
            self.store,
            &JoinStep::new(experiment_run_step::TABLE, sop::TABLE, sop::PK)
                .via(experiment_run_step::FK_PROTOCOL),
            &steps,
            Some(&mut graph),
        )?;
        join_foreign_table(
            self.store,
            &JoinStep::new(experiment_run_step::TABLE, user::TABLE, user::PK)
                .via(experiment_run_step::FK_EXPERIMENTER),
            &steps,
            Some(&mut graph),
        )?;

        Ok(AssembledGraph { graph, roots })
    }

    pub fn parse_graph(
        &self,
        assembled: &AssembledGraph,
        subject_id: Option<&str>,
    ) -> Vec<SlimsSpimData> {
        let mut runs = Vec::new();
        for root in &assembled.roots {
            let mut run = SlimsSpimData::default();
            if let Some(row) = assembled.graph.row(root) {
                run.experiment_run_created_on = row.instant_value(experiment_run::CREATED_ON);
            }
            fold_descendants(&assembled.graph, root, &mut run, dispatch);
            if accepts(subject_id, run.subject_id.as_deref()) {
                runs.push(run);
            }
        }
        runs
    }

    pub fn get_spim_data(
        &self,
        subject_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<SlimsSpimData>, SlimsGraphError> {
        validate_subject_id(subject_id)?;
        let dates = DateRange::parse(start_date, end_date)?;
        let assembled = self.get_graph(&dates)?;
        let runs = self.parse_graph(&assembled, subject_id);
        info!(
            roots = assembled.roots.len(),
            runs = runs.len(),
            "assembled imaging runs"
        );
        Ok(runs)
    }
}

fn dispatch(kind: TableKind) -> Option<Handler<SlimsSpimData>> {
    match kind {
        TableKind::Content => Some(handle_content),
        TableKind::Order => Some(handle_order),
        TableKind::Sop => Some(handle_sop),
        TableKind::Result => Some(handle_result),
        TableKind::ReferenceDataRecord => Some(handle_reference_data_record),
        TableKind::User => Some(handle_user),
        _ => None,
    }
}

fn handle_content(run: &mut SlimsSpimData, row: &Row) {
    run.subject_id = row.str_value(content::ID);
    run.specimen_id = row.str_value(content::BARCODE);
}

fn handle_order(run: &mut SlimsSpimData, row: &Row) {
    run.order_project_id = row.display_value(order::PROJECT_ID).map(str::to_string);
    run.order_created_by = row.str_value(order::CREATED_BY);
}

fn handle_sop(run: &mut SlimsSpimData, row: &Row) {
    run.protocol_name = row.str_value(sop::NAME);
    run.protocol_id = parse_html_anchor(row.value(sop::LINK));
}

fn handle_result(run: &mut SlimsSpimData, row: &Row) {
    if row.str_value(result::TEST_LABEL).as_deref() != Some(result::LABEL_SPIM_IMAGING) {
        return;
    }
    run.date_performed = row.instant_value(result::DATE_PERFORMED);
    run.chamber_immersion_medium = row.str_value(result::CHAMBER_IMMERSION_MEDIUM);
    run.sample_immersion_medium = row.str_value(result::SAMPLE_IMMERSION_MEDIUM);
    run.chamber_refractive_index = row.decimal_value(result::CHAMBER_REFRACTIVE_INDEX);
    run.sample_refractive_index = row.decimal_value(result::SAMPLE_REFRACTIVE_INDEX);
    run.z_direction = row.str_value(result::Z_DIRECTION);
    run.y_direction = row.str_value(result::Y_DIRECTION);
    run.x_direction = row.str_value(result::X_DIRECTION);
    run.imaging_channels = row.string_list(result::IMAGING_CHANNELS);
    run.stitching_channels = row.str_value(result::STITCHING_CHANNELS);
    run.ccf_registration_channels = row.str_value(result::CCF_REGISTRATION_CHANNELS);
    run.cell_segmentation_channels = row.string_list(result::CELL_SEGMENTATION_CHANNELS);
}

/// A result links to several reference records; only the instrument one names the rig.
fn handle_reference_data_record(run: &mut SlimsSpimData, row: &Row) {
    if row.display_value(rdrc::REFERENCE_DATA_TYPE) != Some(rdrc::TYPE_INSTRUMENT) {
        return;
    }
    if let Some(name) = row.str_value(rdrc::NAME) {
        run.instrument_id = Some(name);
    }
}

fn handle_user(run: &mut SlimsSpimData, row: &Row) {
    run.experimenter_name = row.str_value(user::FULL_NAME);
}
