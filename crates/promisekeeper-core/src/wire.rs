//! Serde helpers for the JSON input boundary.
//!
//! Timestamps arrive from evidence providers in several ISO 8601 shapes:
//! full RFC 3339 (`2023-01-02T10:00:00Z`), naive date-times without an
//! offset (`2023-01-02T10:00:00`, what most tracker exports emit), and bare
//! dates (`2023-01-02`, taken as midnight UTC). Parsing happens exactly once,
//! here; a timestamp that matches none of these forms fails the whole
//! deserialization rather than degrading into a partial evaluation.
//! Serialization always emits RFC 3339.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::error::ValidationError;

/// Parse a timestamp in any accepted wire form.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(ValidationError::InvalidTimestamp {
        value: value.to_string(),
        message: "expected RFC 3339, naive ISO 8601, or YYYY-MM-DD".to_string(),
    })
}

/// Render a timestamp in the canonical output form.
pub fn format_instant(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serde adapter for `DateTime<Utc>` fields on wire types.
///
/// Use as `#[serde(with = "crate::wire::instant")]`.
pub mod instant {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_instant(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_instant(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_instant("2023-01-02T10:30:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 1, 2, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse_instant("2023-01-02T10:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 1, 2, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_datetime() {
        let parsed = parse_instant("2023-01-02T10:30:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 1, 2, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_datetime_with_fraction() {
        let parsed = parse_instant("2023-01-02T10:30:00.500").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let parsed = parse_instant("2023-01-02").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_instant("not-a-timestamp").is_err());
        assert!(parse_instant("2023-13-40").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let instant = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        assert_eq!(parse_instant(&format_instant(&instant)).unwrap(), instant);
    }
}
