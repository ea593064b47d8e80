//! Batch Ingestion

use crate::{Repository, RequestError};
use data_validator::{validate_batch, RawRecord};
use tracing::{debug, warn};

impl Repository {
    /// Validate a whole batch and append it.
    ///
    /// Nothing is written unless every element validates. Writes then happen
    /// in request order with no rollback on a mid-batch storage failure.
    pub async fn ingest(&self, raw: &[RawRecord]) -> Result<usize, RequestError> {
        let records = validate_batch(raw).map_err(|e| {
            warn!(batch_size = raw.len(), error = %e, "Rejected insert batch");
            e
        })?;

        self.append_all(&records).await?;
        debug!(inserted = records.len(), "Ingested batch");
        Ok(records.len())
    }
}
