use tracing::info;

use super::{AssembledGraph, DateRange, validate_subject_id};
use crate::{
    SlimsGraphError,
    criteria::Criteria,
    graph::RecordGraph,
    join::{JoinStep, add_roots, join_foreign_table},
    models::{SlimsViralInjectionData, SlimsViralMaterialData},
    row::Row,
    schema::{TableKind, content, content_relation, content_type, order},
    store::RecordStore,
    traversal::{Handler, fold_descendants},
};

pub const CONTENT_TYPE_NAME: &str = "Viral Injection";

/// Viral injection contents, their orders and the viral solutions they were mixed from.
pub struct ViralInjectionSessionHandler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> ViralInjectionSessionHandler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn get_graph(&self, dates: &DateRange) -> Result<AssembledGraph, SlimsGraphError> {
        let content_types = self.store.fetch(
            content_type::TABLE,
            &Criteria::equals(content_type::NAME, CONTENT_TYPE_NAME),
        )?;
        let injections = join_foreign_table(
            self.store,
            &JoinStep::new(content_type::TABLE, content::TABLE, content::CONTENT_TYPE)
                .via(content_type::PK)
                .with_criteria(dates.criteria(content::CREATED_ON)),
            &content_types,
            None,
        )?;

        let mut graph = RecordGraph::new();
        let roots = add_roots(&mut graph, &injections);

        let relations = join_foreign_table(
            self.store,
            &JoinStep::new(
                content::TABLE,
                content_relation::TABLE,
                content_relation::FK_TO,
            )
            .via(content::PK),
            &injections,
            Some(&mut graph),
        )?;
        join_foreign_table(
            self.store,
            &JoinStep::new(content_relation::TABLE, content::TABLE, content::PK)
                .via(content_relation::FK_FROM),
            &relations,
            Some(&mut graph),
        )?;
        join_foreign_table(
            self.store,
            &JoinStep::new(content::TABLE, order::TABLE, order::FK_VIRAL_INJECTION)
                .via(content::PK),
            &injections,
            Some(&mut graph),
        )?;

        Ok(AssembledGraph { graph, roots })
    }

    pub fn parse_graph(
        &self,
        assembled: &AssembledGraph,
        subject_id: Option<&str>,
    ) -> Vec<SlimsViralInjectionData> {
        let mut injections = Vec::new();
        for root in &assembled.roots {
            let mut injection = assembled
                .graph
                .row(root)
                .map(injection_from_root)
                .unwrap_or_default();
            fold_descendants(&assembled.graph, root, &mut injection, dispatch);
            if assigned_to(&injection, subject_id) {
                injections.push(injection);
            }
        }
        injections
    }

    pub fn get_viral_injection_data(
        &self,
        subject_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<SlimsViralInjectionData>, SlimsGraphError> {
        validate_subject_id(subject_id)?;
        let dates = DateRange::parse(start_date, end_date)?;
        let assembled = self.get_graph(&dates)?;
        let injections = self.parse_graph(&assembled, subject_id);
        info!(
            roots = assembled.roots.len(),
            injections = injections.len(),
            "assembled viral injections"
        );
        Ok(injections)
    }
}

fn assigned_to(injection: &SlimsViralInjectionData, subject_id: Option<&str>) -> bool {
    let Some(subject_id) = subject_id else {
        return true;
    };
    injection
        .assigned_mice
        .as_ref()
        .is_some_and(|mice| mice.iter().any(|mouse| mouse == subject_id))
}

fn display(row: &Row, column: &str) -> Option<String> {
    row.display_value(column).map(str::to_string)
}

fn injection_from_root(row: &Row) -> SlimsViralInjectionData {
    SlimsViralInjectionData {
        content_category: display(row, content::CATEGORY),
        content_type: display(row, content::CONTENT_TYPE),
        content_created_on: row.instant_value(content::CREATED_ON),
        content_modified_on: row.instant_value(content::MODIFIED_ON),
        name: row.str_value(content::ID),
        viral_injection_buffer: display(row, content::VIRAL_INJECTION_BUFFER),
        volume: row.decimal_value(content::VOLUME_REQUIRED),
        volume_unit: row.unit(content::VOLUME_REQUIRED).map(str::to_string),
        labeling_protein: display(row, content::LABELING_PROTEIN),
        date_made: row.instant_value(content::DATE_MADE),
        intake_date: row.instant_value(content::INTAKE_DATE),
        storage_temperature: display(row, content::STORAGE_TEMPERATURE),
        special_storage_guidelines: row.display_value_list(content::SPECIAL_STORAGE_GUIDELINES),
        special_handling_guidelines: row.display_value_list(content::SPECIAL_HANDLING_GUIDELINES),
        ..Default::default()
    }
}

fn dispatch(kind: TableKind) -> Option<Handler<SlimsViralInjectionData>> {
    match kind {
        TableKind::Order => Some(handle_order),
        TableKind::Content => Some(handle_content),
        _ => None,
    }
}

fn handle_order(injection: &mut SlimsViralInjectionData, row: &Row) {
    injection.assigned_mice = row.display_value_list(order::ASSIGNED_MICE);
    injection.requested_for_date = row.instant_value(order::REQUESTED_FOR_DATE);
    injection.planned_injection_date = row.instant_value(order::PLANNED_ON_DATE);
    injection.planned_injection_time = row.instant_value(order::PLANNED_ON_TIME);
    injection.order_created_on = row.instant_value(order::CREATED_ON);
    injection.derivation_count = row.i64_value(order::DERIVED_COUNT);
    injection.ingredient_count = row.i64_value(order::INGREDIENT_COUNT);
    injection.mix_count = row.i64_value(order::MIX_COUNT);
}

fn handle_content(injection: &mut SlimsViralInjectionData, row: &Row) {
    if row.display_value(content::CONTENT_TYPE) != Some(content::VIRAL_SOLUTION) {
        return;
    }
    injection.viral_materials.push(SlimsViralMaterialData {
        content_category: display(row, content::CATEGORY),
        content_type: display(row, content::CONTENT_TYPE),
        content_created_on: row.instant_value(content::CREATED_ON),
        content_modified_on: row.instant_value(content::MODIFIED_ON),
        viral_solution_type: display(row, content::VIRAL_SOLUTION_TYPE),
        virus_name: row.str_value(content::VIRUS_NAME),
        lot_number: row.str_value(content::LOT_NUMBER),
        lab_team: display(row, content::LAB_TEAM),
        virus_type: display(row, content::VIRUS_TYPE),
        virus_serotype: display(row, content::VIRUS_SEROTYPE),
        virus_plasmid_number: row.str_value(content::VIRUS_PLASMID_NUMBER),
        name: row.str_value(content::ID),
        dose: row.decimal_value(content::DOSE),
        dose_unit: row.unit(content::DOSE).map(str::to_string),
        titer: row.decimal_value(content::TITER),
        titer_unit: row.unit(content::TITER).map(str::to_string),
        volume: row.decimal_value(content::VOLUME_REQUIRED),
        volume_unit: row.unit(content::VOLUME_REQUIRED).map(str::to_string),
        date_made: row.instant_value(content::DATE_MADE),
        intake_date: row.instant_value(content::INTAKE_DATE),
        storage_temperature: display(row, content::STORAGE_TEMPERATURE),
        special_storage_guidelines: row.display_value_list(content::SPECIAL_STORAGE_GUIDELINES),
        special_handling_guidelines: row.display_value_list(content::SPECIAL_HANDLING_GUIDELINES),
        mix_count: row.i64_value(content::MIX_COUNT),
        derivation_count: row.i64_value(content::DERIVED_COUNT),
        ingredient_count: row.i64_value(content::INGREDIENT_COUNT),
    });
}
