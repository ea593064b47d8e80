//! Record Types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A persisted temperature sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    /// Epoch-seconds, non-negative
    #[serde(rename = "time")]
    pub timestamp: i64,
    /// Temperature in degrees Celsius, always finite
    pub celsius: f64,
}

impl TemperatureRecord {
    pub fn new(timestamp: i64, celsius: f64) -> Self {
        Self { timestamp, celsius }
    }
}

/// A submitted field value. Clients send either JSON strings or JSON numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    /// Canonical text the parsers operate on
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
        }
    }

    /// Explicit presence check: only an empty or blank string counts as absent.
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// One element of an insert request before validation.
///
/// Covers the legacy `{celsius, time}` shape, the `time` + `sensor` + `value`
/// query form and the `{time, sensors: {name: value}}` JSON form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub celsius: Option<Scalar>,
    #[serde(default)]
    pub time: Option<Scalar>,
    #[serde(default)]
    pub sensor: Option<String>,
    #[serde(default)]
    pub value: Option<Scalar>,
    #[serde(default)]
    pub sensors: Option<BTreeMap<String, Scalar>>,
}

impl RawRecord {
    /// Legacy `{celsius, time}` submission
    pub fn legacy(celsius: impl Into<Scalar>, time: impl Into<Scalar>) -> Self {
        Self {
            celsius: Some(celsius.into()),
            time: Some(time.into()),
            ..Default::default()
        }
    }

    /// Single named sensor reading
    pub fn sensor(time: impl Into<Scalar>, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            time: Some(time.into()),
            sensor: Some(name.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }
}
