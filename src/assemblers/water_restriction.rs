use tracing::info;

use super::{AssembledGraph, DateRange, accepts, validate_subject_id};
use crate::{
    SlimsGraphError,
    criteria::Criteria,
    graph::RecordGraph,
    join::{JoinStep, add_roots, join_foreign_table},
    models::SlimsWaterRestrictionData,
    row::Row,
    schema::{TableKind, content, content_event},
    store::RecordStore,
    traversal::{Handler, fold_descendants},
};

pub const EVENT_TYPE_NAME: &str = "Water Restriction";

/// Water restriction events recorded against a mouse.
pub struct WaterRestrictionSessionHandler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> WaterRestrictionSessionHandler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn get_graph(&self, dates: &DateRange) -> Result<AssembledGraph, SlimsGraphError> {
        let events = self
            .store
            .fetch(content_event::TABLE, &root_criteria(dates))?;

        let mut graph = RecordGraph::new();
        let roots = add_roots(&mut graph, &events);

        join_foreign_table(
            self.store,
            &JoinStep::new(content_event::TABLE, content::TABLE, content::PK)
                .via(content_event::FK_CONTENT),
            &events,
            Some(&mut graph),
        )?;

        Ok(AssembledGraph { graph, roots })
    }

    pub fn parse_graph(
        &self,
        assembled: &AssembledGraph,
        subject_id: Option<&str>,
    ) -> Vec<SlimsWaterRestrictionData> {
        let mut events = Vec::new();
        for root in &assembled.roots {
            let mut event = assembled
                .graph
                .row(root)
                .map(event_from_root)
                .unwrap_or_default();
            fold_descendants(&assembled.graph, root, &mut event, dispatch);
            if accepts(subject_id, event.subject_id.as_deref()) {
                events.push(event);
            }
        }
        events
    }

    pub fn get_water_restriction_data(
        &self,
        subject_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<SlimsWaterRestrictionData>, SlimsGraphError> {
        validate_subject_id(subject_id)?;
        let dates = DateRange::parse(start_date, end_date)?;
        let assembled = self.get_graph(&dates)?;
        let events = self.parse_graph(&assembled, subject_id);
        info!(
            roots = assembled.roots.len(),
            events = events.len(),
            "assembled water restriction events"
        );
        Ok(events)
    }
}

/// Events of the water restriction type, narrowed to the creation window when one is given.
pub fn root_criteria(dates: &DateRange) -> Criteria {
    let event_type = Criteria::equals(content_event::EVENT_TYPE, EVENT_TYPE_NAME);
    match dates.criteria(content_event::CREATED_ON) {
        Some(window) => event_type.and_also(window),
        None => event_type,
    }
}

fn event_from_root(row: &Row) -> SlimsWaterRestrictionData {
    SlimsWaterRestrictionData {
        content_event_created_on: row.instant_value(content_event::CREATED_ON),
        start_date: row.instant_value(content_event::START_DATE),
        end_date: row.instant_value(content_event::END_DATE),
        assigned_by: row.str_value(content_event::ASSIGNED_BY),
        target_weight_fraction: row.decimal_value(content_event::TARGET_WEIGHT_FRACTION),
        baseline_weight: row.decimal_value(content_event::BASELINE_WEIGHT),
        weight_unit: row.unit(content_event::BASELINE_WEIGHT).map(str::to_string),
        subject_id: None,
    }
}

fn dispatch(kind: TableKind) -> Option<Handler<SlimsWaterRestrictionData>> {
    match kind {
        TableKind::Content => Some(handle_content),
        _ => None,
    }
}

fn handle_content(event: &mut SlimsWaterRestrictionData, row: &Row) {
    event.subject_id = row.str_value(content::BARCODE);
}
