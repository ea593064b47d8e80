//! Timestamp Normalization
//!
//! Accepts raw epoch-seconds or a calendar date string and produces integer
//! epoch-seconds.

use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

/// Naive date-time layouts, interpreted as UTC
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layouts not covered by RFC 3339
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Normalize a timestamp string to epoch-seconds.
///
/// A string made only of ASCII digits is taken as epoch-seconds verbatim.
/// Anything else is parsed as a date, and sub-second precision is floored
/// away rather than rounded.
pub fn normalize(input: &str) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidTimestamp(input.to_string());

    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        return input.parse::<i64>().map_err(|_| invalid());
    }

    let millis = parse_date_millis(input).ok_or_else(invalid)?;
    let seconds = millis.div_euclid(1000);
    if seconds < 0 {
        return Err(invalid());
    }

    trace!(input, seconds, "normalized calendar timestamp");
    Ok(seconds)
}

fn parse_date_millis(input: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.timestamp_millis());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Some(dt.timestamp_millis());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
    }
    DateTime::parse_from_rfc2822(input)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_epoch_origin() {
        assert_eq!(normalize("0"), Ok(0));
        assert_eq!(normalize("1970-01-01T00:00:01Z"), Ok(1));
    }

    #[test]
    fn test_integer_seconds_passthrough() {
        assert_eq!(normalize("1700000000"), Ok(1_700_000_000));
    }

    #[test]
    fn test_padded_digits_are_not_epoch_seconds() {
        for input in [" 42", "42 ", " 42 ", "4 2"] {
            assert_eq!(
                normalize(input),
                Err(ValidationError::InvalidTimestamp(input.to_string()))
            );
        }
    }

    #[test]
    fn test_sub_second_precision_is_floored() {
        assert_eq!(normalize("1970-01-01T00:00:01.999Z"), Ok(1));
        assert_eq!(normalize("1970-01-01T00:00:02.001Z"), Ok(2));
    }

    #[test]
    fn test_offsets_and_naive_forms() {
        assert_eq!(normalize("1970-01-01T01:00:00+01:00"), Ok(0));
        assert_eq!(normalize("1970-01-01T01:00"), Ok(3600));
        assert_eq!(normalize("1970-01-01 00:01:00"), Ok(60));
        assert_eq!(normalize("1970-01-02"), Ok(86_400));
        assert_eq!(normalize("Thu, 01 Jan 1970 00:00:10 +0000"), Ok(10));
    }

    #[test]
    fn test_rejects_garbage() {
        for input in ["not-a-date", "", "-5", "12.5", "+10", "99999999999999999999999"] {
            assert!(
                matches!(normalize(input), Err(ValidationError::InvalidTimestamp(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_pre_epoch_dates() {
        assert!(normalize("1969-12-31T23:59:59Z").is_err());
    }

    proptest! {
        #[test]
        fn prop_digit_strings_are_identity(secs in 0i64..=i64::MAX) {
            prop_assert_eq!(normalize(&secs.to_string()), Ok(secs));
        }

        #[test]
        fn prop_rfc3339_matches_epoch(secs in 0i64..4_102_444_800, millis in 0i64..1000) {
            let dt = DateTime::from_timestamp(secs, (millis * 1_000_000) as u32).unwrap();
            let text = dt.to_rfc3339();
            prop_assert_eq!(normalize(&text), Ok(secs));
        }
    }
}
