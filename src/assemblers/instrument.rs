use serde_json::Value;
use tracing::{info, warn};

use crate::{
    SlimsGraphError, criteria::Criteria, schema::reference_data_record as rdrc,
    store::RecordStore,
};

/// Instrument definitions stored as JSON attachments on reference data records. No graph is
/// built; one query finds the records and each attachment is fetched directly.
pub struct InstrumentSessionHandler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> InstrumentSessionHandler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Parsed instrument attachments for every record named (or containing) `input_id`.
    pub fn get_instrument_data(
        &self,
        input_id: &str,
        partial_match: bool,
    ) -> Result<Vec<Value>, SlimsGraphError> {
        if input_id.is_empty() {
            return Err(SlimsGraphError::validation("input_id must not be empty!"));
        }
        let records = self
            .store
            .fetch(rdrc::TABLE, &instrument_criteria(input_id, partial_match))?;
        info!(input_id, records = records.len(), "found reference data records");

        let mut instruments = Vec::new();
        for record in &records {
            let Some(pointer) = record.i64_value(rdrc::INSTRUMENT_JSON_ATTACHMENT) else {
                warn!(input_id, pk = record.pk(), "no attachment found for reference data record");
                continue;
            };
            let content = self.store.fetch_attachment(pointer)?;
            match serde_json::from_slice::<Value>(&content) {
                Ok(instrument) => instruments.push(instrument),
                Err(err) => {
                    warn!(attachment = pointer, error = %err, "instrument attachment is not JSON");
                }
            }
        }
        Ok(instruments)
    }
}

/// Exact or substring match on the record name, restricted to records with an attachment.
pub fn instrument_criteria(input_id: &str, partial_match: bool) -> Criteria {
    let name = if partial_match {
        Criteria::contains(rdrc::NAME, input_id)
    } else {
        Criteria::equals(rdrc::NAME, input_id)
    };
    name.and_also(Criteria::greater_or_equal(rdrc::ATTACHMENT_COUNT, 1))
}
