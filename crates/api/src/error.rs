//! Request error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use data_validator::ValidationError;
use storage::{RequestError, StorageError};
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client sent something unusable
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Storage failed while serving a write
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// A windowed query failed. Carries the original parameters for diagnosis.
    #[error("{source}")]
    Query {
        source: RequestError,
        original: String,
    },
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Validation(e) => ApiError::Validation(e),
            RequestError::Storage(e) => ApiError::Storage(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::Query {
                source: RequestError::Validation(_),
                ..
            } => StatusCode::BAD_REQUEST,
            ApiError::Storage(_)
            | ApiError::Query {
                source: RequestError::Storage(_),
                ..
            } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(e) => format!("Invalid request: {}\n", e),
            ApiError::Storage(e) => format!("Internal server error:\n{}\n", e),
            ApiError::Query {
                source: source @ RequestError::Validation(_),
                original,
            } => format!(
                "Invalid request: {}\n\nOriginal query:\n{}\n",
                source, original
            ),
            ApiError::Query { source, original } => format!(
                "Error serving querying database.\n{}\n\nOriginal query:\n{}\n",
                source, original
            ),
        };

        if status.is_server_error() {
            error!(%status, error = %self, "Request failed");
        } else {
            warn!(%status, error = %self, "Request rejected");
        }

        (status, body).into_response()
    }
}
