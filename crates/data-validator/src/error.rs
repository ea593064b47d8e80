//! Validation Error Types

use thiserror::Error;

/// Errors raised while turning raw insert input into records
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required field absent or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Temperature is not a finite number
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Time matches neither epoch-seconds nor a calendar date
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// Request shape is unusable
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// More than one sensor value posted for a single timestamp
    #[error("Only one sensor value per timestamp is supported, got {0}")]
    UnsupportedSensorCount(usize),
}
