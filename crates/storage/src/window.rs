//! Windowed Queries

use crate::{Repository, RequestError};
use data_validator::{normalize, TemperatureRecord};
use std::net::SocketAddr;
use tracing::info;

/// Limit value meaning "return every qualifying record"
pub const NO_LIMIT: i64 = -1;

/// Parameters of a windowed query as received from a client
#[derive(Debug, Clone, Default)]
pub struct WindowRequest {
    /// Address of the requesting client, logged only
    pub caller: Option<SocketAddr>,
    /// Lower bound, epoch-seconds or a calendar date. Defaults to the epoch origin.
    pub start_date: Option<String>,
    /// Maximum number of records. Absent or negative means unlimited.
    pub count: Option<i64>,
}

/// Query engine returning the newest `count` records since a start time,
/// oldest first
#[derive(Debug, Clone)]
pub struct WindowQuery {
    repository: Repository,
}

impl WindowQuery {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn query(&self, request: &WindowRequest) -> Result<Vec<TemperatureRecord>, RequestError> {
        let start = match request.start_date.as_deref() {
            Some(start_date) => normalize(start_date)?,
            None => 0,
        };
        let count = request.count.unwrap_or(NO_LIMIT);

        match request.caller {
            Some(caller) => info!(%caller, count, start, "Database query request"),
            None => info!(count, start, "Database query request"),
        }

        Ok(self.repository.range_from(start, count).await?)
    }
}
