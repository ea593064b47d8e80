//! Insert Routes

use axum::{body::Bytes, extract::{Query, State}, Json};
use data_validator::{RawRecord, Scalar, ValidationError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use storage::RequestError;
use tracing::debug;

use crate::{telemetry, ApiError, AppState};

/// Query parameters of `GET /add`.
///
/// Either `celsius` + `time` or `time` + `sensor` + `value`.
#[derive(Debug, Default, Deserialize)]
pub struct InsertParams {
    pub celsius: Option<String>,
    pub time: Option<String>,
    pub sensor: Option<String>,
    pub value: Option<String>,
}

impl From<InsertParams> for RawRecord {
    fn from(params: InsertParams) -> Self {
        RawRecord {
            celsius: params.celsius.map(Scalar::Text),
            time: params.time.map(Scalar::Text),
            sensor: params.sensor,
            value: params.value.map(Scalar::Text),
            sensors: None,
        }
    }
}

/// Body of `POST /add.json`: an array of records or one `{time, sensors}` object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InsertPayload {
    Batch(Vec<RawRecord>),
    Single(RawRecord),
}

impl InsertPayload {
    fn into_records(self) -> Vec<RawRecord> {
        match self {
            InsertPayload::Batch(records) => records,
            InsertPayload::Single(record) => vec![record],
        }
    }
}

/// Insert a single record from query parameters
pub async fn add(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsertParams>,
) -> Result<&'static str, ApiError> {
    ingest(&state, vec![params.into()]).await?;
    Ok("Success")
}

/// Insert a batch of records from a JSON body
pub async fn add_json(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let payload: InsertPayload = serde_json::from_slice(&body).map_err(|e| {
        telemetry::batch_rejected();
        ValidationError::InvalidFormat(format!("array have invalid format: {}", e))
    })?;

    ingest(&state, payload.into_records()).await?;
    Ok(Json(json!({ "result": "success" })))
}

async fn ingest(state: &AppState, records: Vec<RawRecord>) -> Result<usize, ApiError> {
    match state.repository.ingest(&records).await {
        Ok(inserted) => {
            telemetry::records_inserted(inserted);
            debug!(inserted, "Insert request stored");
            Ok(inserted)
        }
        Err(e) => {
            if matches!(e, RequestError::Validation(_)) {
                telemetry::batch_rejected();
            }
            Err(e.into())
        }
    }
}
