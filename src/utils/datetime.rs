//! Timestamp parsing for request payloads.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::json;

use crate::error::AppError;

/// Format accepted for timestamps without an offset; read as UTC.
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses an RFC 3339 timestamp, or `YYYY-MM-DDTHH:MM:SS` interpreted as UTC.
///
/// # Errors
///
/// Returns [`AppError::InvalidArgument`] naming `field` if neither form matches.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, NAIVE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            AppError::invalid_argument(
                format!("Invalid {field}, expected RFC 3339 or {NAIVE_FORMAT}"),
                json!({ "field": field, "value": value }),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_timestamp("expiry_date", "2030-01-01T12:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let dt = parse_timestamp("expiry_date", "2030-01-01T12:00:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_timestamp("expiry_date", "next tuesday").unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument { .. }));
        assert!(err.to_string().contains("expiry_date"));
    }
}
