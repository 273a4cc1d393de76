//! Domain assemblers. Each one runs a fixed join plan against the store, then folds the
//! descendants of every root into one aggregate.

pub mod ecephys;
pub mod histology;
pub mod imaging;
pub mod instrument;
pub mod viral_injection;
pub mod water_restriction;

pub use ecephys::{EcephysSessionHandler, sort_newest_first};
pub use histology::HistologySessionHandler;
pub use imaging::ImagingSessionHandler;
pub use instrument::InstrumentSessionHandler;
pub use viral_injection::ViralInjectionSessionHandler;
pub use water_restriction::WaterRestrictionSessionHandler;

use chrono::{DateTime, Utc};

use crate::{
    SlimsGraphError,
    coerce::parse_date,
    criteria::{Criteria, date_criteria},
    graph::{NodeKey, RecordGraph},
};

/// A built graph together with its roots in the order the store returned them.
#[derive(Debug, Default)]
pub struct AssembledGraph {
    pub graph: RecordGraph,
    pub roots: Vec<NodeKey>,
}

/// Creation-time window applied to the root query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Parses ISO-8601 bounds; either may be absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, SlimsGraphError> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    pub fn criteria(&self, field_name: &str) -> Option<Criteria> {
        date_criteria(self.start.as_ref(), self.end.as_ref(), field_name)
    }
}

pub(crate) fn validate_subject_id(subject_id: Option<&str>) -> Result<(), SlimsGraphError> {
    match subject_id {
        Some("") => Err(SlimsGraphError::validation("subject_id must not be empty!")),
        _ => Ok(()),
    }
}

/// `None` filter accepts everything; otherwise the value must be present and equal.
pub(crate) fn accepts(filter: Option<&str>, value: Option<&str>) -> bool {
    filter.is_none_or(|wanted| value == Some(wanted))
}
