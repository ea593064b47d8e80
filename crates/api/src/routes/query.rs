//! Query Routes

use axum::{
    extract::{ConnectInfo, Query, State},
    Json,
};
use data_validator::{TemperatureRecord, ValidationError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use storage::{RequestError, WindowRequest};

use crate::{telemetry, ApiError, AppState};

/// Query parameters for the query endpoint
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryParams {
    /// Maximum number of records, negative for all
    pub count: Option<String>,
    /// Lower time bound, epoch-seconds or a date string
    pub start_date: Option<String>,
}

impl QueryParams {
    fn to_request(&self, caller: Option<SocketAddr>) -> Result<WindowRequest, ValidationError> {
        let count = match non_empty(&self.count) {
            Some(count) => Some(count.trim().parse::<i64>().map_err(|_| {
                ValidationError::InvalidNumber {
                    field: "count",
                    value: count.to_string(),
                }
            })?),
            None => None,
        };

        Ok(WindowRequest {
            caller,
            start_date: non_empty(&self.start_date).map(str::to_string),
            count,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Windowed query: newest `count` records since `start_date`, oldest first
pub async fn query(
    State(state): State<Arc<AppState>>,
    caller: Option<ConnectInfo<SocketAddr>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<TemperatureRecord>>, ApiError> {
    let caller = caller.map(|ConnectInfo(addr)| addr);

    let result = match params.to_request(caller) {
        Ok(request) => state.window.query(&request).await,
        Err(e) => Err(RequestError::Validation(e)),
    };

    match result {
        Ok(records) => {
            telemetry::query_served();
            Ok(Json(records))
        }
        Err(source) => Err(ApiError::Query {
            source,
            original: serde_json::to_string(&params).unwrap_or_default(),
        }),
    }
}
