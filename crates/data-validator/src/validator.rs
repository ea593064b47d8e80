//! Record Validator for Insert Requests

use crate::error::ValidationError;
use crate::record::{RawRecord, Scalar, TemperatureRecord};
use crate::timestamp::normalize;
use tracing::debug;

/// Validate one raw submission into a record.
///
/// Presence is checked explicitly, so `0` is a legitimate temperature or
/// timestamp. Only absent fields and blank strings count as missing.
pub fn validate(raw: &RawRecord) -> Result<TemperatureRecord, ValidationError> {
    let celsius = temperature_field(raw)?;
    let time = present(raw.time.as_ref(), "time")?;

    let celsius = parse_celsius(celsius)?;
    let timestamp = normalize(&time.to_text())?;

    Ok(TemperatureRecord { timestamp, celsius })
}

/// Validate a whole batch. The first invalid element rejects the batch.
pub fn validate_batch(raw: &[RawRecord]) -> Result<Vec<TemperatureRecord>, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::InvalidFormat("empty batch".to_string()));
    }

    raw.iter()
        .enumerate()
        .map(|(index, item)| {
            validate(item).map_err(|e| {
                debug!(index, error = %e, "rejecting batch");
                e
            })
        })
        .collect()
}

/// Locate the temperature value: `celsius`, then `value`, then the single
/// entry of `sensors`.
fn temperature_field(raw: &RawRecord) -> Result<&Scalar, ValidationError> {
    if let Some(celsius) = raw.celsius.as_ref() {
        return present(Some(celsius), "celsius");
    }
    if let Some(value) = raw.value.as_ref() {
        if let Some(sensor) = raw.sensor.as_deref() {
            debug!(sensor, "sensor name is not persisted");
        }
        return present(Some(value), "value");
    }
    match raw.sensors.as_ref() {
        Some(sensors) if sensors.len() > 1 => {
            Err(ValidationError::UnsupportedSensorCount(sensors.len()))
        }
        Some(sensors) => present(sensors.values().next(), "sensors"),
        None => Err(ValidationError::MissingField("celsius")),
    }
}

fn present<'a>(
    value: Option<&'a Scalar>,
    field: &'static str,
) -> Result<&'a Scalar, ValidationError> {
    match value {
        Some(v) if !v.is_blank() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn parse_celsius(value: &Scalar) -> Result<f64, ValidationError> {
    let parsed = match value {
        Scalar::Integer(i) => Some(*i as f64),
        Scalar::Float(f) => Some(*f),
        Scalar::Text(s) => s.trim().parse::<f64>().ok(),
    };

    match parsed {
        Some(celsius) if celsius.is_finite() => Ok(celsius),
        _ => Err(ValidationError::InvalidNumber {
            field: "celsius",
            value: value.to_text(),
        }),
    }
}
