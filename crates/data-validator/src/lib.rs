//! Data Validation and Normalization
//!
//! Turns raw temperature submissions into canonical records: timestamp
//! normalization to epoch-seconds, per-record validation, and the trailing
//! moving average used when rendering a queried series.

mod error;
mod record;
mod smoothing;
mod timestamp;
mod validator;

pub use error::ValidationError;
pub use record::{RawRecord, Scalar, TemperatureRecord};
pub use smoothing::{smooth, MovingAverage, SMOOTHING_WINDOW};
pub use timestamp::normalize;
pub use validator::{validate, validate_batch};
