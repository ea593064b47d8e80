//! Storage Layer
//!
//! Append-only SQLite store for temperature records, the windowed query
//! built on top of it, and the validate-then-append ingestion path.

mod ingest;
mod repository;
mod window;

pub use data_validator::{RawRecord, TemperatureRecord, ValidationError};
pub use repository::{Repository, TABLE_NAME};
pub use window::{WindowQuery, WindowRequest, NO_LIMIT};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::DatabaseError(err.to_string())
    }
}

/// Failure of an insert or query request
#[derive(Debug, Error)]
pub enum RequestError {
    /// Rejected input, nothing was written
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Storage failure, already written records stay durable
    #[error(transparent)]
    Storage(#[from] StorageError),
}
