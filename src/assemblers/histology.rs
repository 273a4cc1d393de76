use tracing::info;

use super::{AssembledGraph, DateRange, accepts, validate_subject_id};
use crate::{
    SlimsGraphError,
    coerce::parse_html_anchor,
    criteria::Criteria,
    graph::{NodeKey, RecordGraph},
    join::{JoinStep, add_roots, join_foreign_table},
    models::{HistologyReagentData, HistologyWashData, SlimsHistologyData},
    row::Row,
    schema::{
        TableKind, content, experiment_run, experiment_run_step, experiment_run_step_content,
        experiment_template, reference_data_record as rdrc, sop,
    },
    store::RecordStore,
    traversal::children,
};

pub const TEMPLATE_NAMES: [&str; 3] = [
    "SmartSPIM Labeling",
    "SmartSPIM Delipidation",
    "SmartSPIM Refractive Index Matching",
];

/// Step names that record a wash. Numbered repeats ("... Wash 2") match by prefix.
pub const WASH_NAMES: [&str; 13] = [
    "Wash 1",
    "Wash 2",
    "Wash 3",
    "Wash 4",
    "Refractive Index Matching Wash",
    "Primary Antibody Wash",
    "Secondary Antibody Wash",
    "MBS Wash",
    "Gelation PBS Wash",
    "Stock X + VA-044 Equilibration",
    "Gelation + ProK RT",
    "Gelation + Add'l ProK 37C",
    "Final PBS Wash",
];

pub fn is_wash_step(name: &str) -> bool {
    WASH_NAMES.iter().any(|wash| name.starts_with(wash))
}

/// SmartSPIM labeling, delipidation and index matching procedures.
pub struct HistologySessionHandler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> HistologySessionHandler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn get_graph(&self, dates: &DateRange) -> Result<AssembledGraph, SlimsGraphError> {
        let templates = self.store.fetch(
            experiment_template::TABLE,
            &Criteria::is_one_of(experiment_template::NAME, TEMPLATE_NAMES),
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
        join_foreign_table(
            self.store,
            &JoinStep::new(experiment_run_step::TABLE, sop::TABLE, sop::PK)
                .via(experiment_run_step::FK_PROTOCOL),
            &steps,
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
        let reagents = join_foreign_table(
            self.store,
            &JoinStep::new(experiment_run_step::TABLE, content::TABLE, content::PK)
                .via(experiment_run_step::FK_REAGENT),
            &steps,
            Some(&mut graph),
        )?;
        join_foreign_table(
            self.store,
            &JoinStep::new(content::TABLE, rdrc::TABLE, rdrc::PK)
                .via(content::CATALOG_NUMBER_REAGENTS),
            &reagents,
            Some(&mut graph),
        )?;

        Ok(AssembledGraph { graph, roots })
    }

    /// Root → steps (ordered) → step children. Deeper nodes are only read through their step.
    pub fn parse_graph(
        &self,
        assembled: &AssembledGraph,
        subject_id: Option<&str>,
    ) -> Vec<SlimsHistologyData> {
        let graph = &assembled.graph;
        let mut procedures = Vec::new();
        for root in &assembled.roots {
            let mut procedure = SlimsHistologyData::default();
            if let Some(run) = graph.row(root) {
                procedure.experiment_run_created_on = run.instant_value(experiment_run::CREATED_ON);
                procedure.procedure_name = run
                    .display_value(experiment_run::FK_TEMPLATE)
                    .map(str::to_string);
            }
            for (step_key, step) in children(graph, root) {
                if step.kind != TableKind::ExperimentRunStep {
                    continue;
                }
                let is_wash = step
                    .row
                    .str_value(experiment_run_step::NAME)
                    .is_some_and(|name| is_wash_step(&name));
                if is_wash {
                    procedure.washes.push(wash(graph, step_key, &step.row));
                }
                for (child_key, child) in children(graph, step_key) {
                    match child.kind {
                        TableKind::Sop => {
                            procedure.protocol_id = parse_html_anchor(child.row.value(sop::LINK));
                            procedure.protocol_name = child.row.str_value(sop::NAME);
                        }
                        TableKind::ExperimentRunStepContent => {
                            let (subject, specimen) = specimen_ids(graph, child_key);
                            if subject.is_some() {
                                procedure.subject_id = subject;
                            }
                            if specimen.is_some() {
                                procedure.specimen_id = specimen;
                            }
                        }
                        _ => {}
                    }
                }
            }
            if accepts(subject_id, procedure.subject_id.as_deref()) {
                procedures.push(procedure);
            }
        }
        procedures
    }

    pub fn get_histology_data(
        &self,
        subject_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<SlimsHistologyData>, SlimsGraphError> {
        validate_subject_id(subject_id)?;
        let dates = DateRange::parse(start_date, end_date)?;
        let assembled = self.get_graph(&dates)?;
        let procedures = self.parse_graph(&assembled, subject_id);
        info!(
            roots = assembled.roots.len(),
            procedures = procedures.len(),
            "assembled histology procedures"
        );
        Ok(procedures)
    }
}

fn wash(graph: &RecordGraph, step_key: &NodeKey, step: &Row) -> HistologyWashData {
    HistologyWashData {
        wash_name: step.str_value(experiment_run_step::NAME),
        wash_type: step.str_value(experiment_run_step::WASH_TYPE),
        start_time: step.instant_value(experiment_run_step::START_TIME),
        end_time: step.instant_value(experiment_run_step::END_TIME),
        modified_by: step.str_value(experiment_run_step::MODIFIED_BY),
        reagents: children(graph, step_key)
            .filter(|(_, node)| node.kind == TableKind::Content)
            .filter_map(|(_, node)| reagent(&node.row))
            .collect(),
        mass: step.decimal_value(experiment_run_step::MASS),
    }
}

fn reagent(row: &Row) -> Option<HistologyReagentData> {
    let category = row.display_value(content::CATEGORY)?;
    if !content::REAGENT_CATEGORIES.iter().any(|known| *known == category) {
        return None;
    }
    Some(HistologyReagentData {
        name: row
            .display_value(content::CATALOG_NUMBER_REAGENTS)
            .map(str::to_string),
        source: row.display_value(content::SOURCE).map(str::to_string),
        lot_number: row.str_value(content::LOT_NUMBER),
    })
}

/// `(subject_id, specimen_id)` from the content rows linked to a step content; last non-null wins.
fn specimen_ids(graph: &RecordGraph, step_content: &NodeKey) -> (Option<String>, Option<String>) {
    let mut subject = None;
    let mut specimen = None;
    for (_, node) in children(graph, step_content) {
        if let Some(id) = node.row.str_value(content::ID) {
            subject = Some(id);
        }
        if let Some(barcode) = node.row.str_value(content::BARCODE) {
            specimen = Some(barcode);
        }
    }
    (subject, specimen)
}
