//! Promise model: a time-bounded commitment with measurable parameters.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};
use crate::period::Granularity;

/// Default number of qualifying activities required per period.
pub const DEFAULT_FREQUENCY: u32 = 1;
/// Default bucketing granularity.
pub const DEFAULT_PERIOD: Granularity = Granularity::Week;
/// Default heart-rate threshold in bpm for duration promises.
pub const DEFAULT_HEART_RATE_THRESHOLD: f64 = 120.0;
/// Default minimum elevated duration in minutes for duration promises.
pub const DEFAULT_DURATION_MINUTES: f64 = 25.0;
/// Default maximum allowed gap in days for consistency promises.
pub const DEFAULT_MAX_GAP_DAYS: i64 = 7;

/// Kind of commitment a promise encodes.
///
/// The three rule-based kinds have deterministic evaluators; anything else
/// round-trips through [`PromiseKind::Other`] and is either handed to the
/// interpretive evaluator or reported as unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromiseKind {
    ExerciseFrequency,
    ExerciseDuration,
    ExerciseConsistency,
    #[serde(untagged)]
    Other(String),
}

impl PromiseKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ExerciseFrequency => "exercise_frequency",
            Self::ExerciseDuration => "exercise_duration",
            Self::ExerciseConsistency => "exercise_consistency",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for PromiseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single promise parameter: numeric, or a string (CLI surfaces and the
/// upstream contract pass parameters as string maps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric view of the value; string values parse leniently.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

/// Named promise parameters.
///
/// Accessors never fail: a missing key or an unusable value falls back to
/// the caller-supplied default. This keeps "missing parameter" a recovered
/// condition rather than an error, with the defaults documented on the
/// `DEFAULT_*` constants above.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, ParamValue>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric parameter with fallback.
    pub fn number(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).and_then(ParamValue::as_f64).unwrap_or(default)
    }

    /// Non-negative integer parameter with fallback (counts, frequencies).
    pub fn count(&self, key: &str, default: u32) -> u32 {
        self.0
            .get(key)
            .and_then(ParamValue::as_f64)
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as u32)
            .unwrap_or(default)
    }

    /// Whole-day parameter with fallback.
    pub fn days(&self, key: &str, default: i64) -> i64 {
        self.0
            .get(key)
            .and_then(ParamValue::as_f64)
            .filter(|n| n.is_finite())
            .map(|n| n as i64)
            .unwrap_or(default)
    }

    /// Granularity parameter with fallback.
    pub fn granularity(&self, key: &str, default: Granularity) -> Granularity {
        self.0
            .get(key)
            .and_then(ParamValue::as_str)
            .and_then(Granularity::parse)
            .unwrap_or(default)
    }
}

impl FromIterator<(String, ParamValue)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A structured, time-bounded commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promise {
    #[serde(rename = "type")]
    pub kind: PromiseKind,
    #[serde(with = "crate::wire::instant")]
    pub start: DateTime<Utc>,
    #[serde(with = "crate::wire::instant")]
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub parameters: Parameters,
}

impl Promise {
    /// Check structural invariants. `end >= start` is the only one not
    /// already enforced by the type system.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end < self.start {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Parse and validate a promise from its JSON wire form.
    ///
    /// Timestamp parsing happens here, once; a malformed timestamp or an
    /// inverted window is a hard error, distinct from a "not fulfilled"
    /// verdict.
    pub fn from_json(json: &str) -> Result<Self> {
        let promise: Self = serde_json::from_str(json)?;
        promise.validate().map_err(CoreError::Validation)?;
        Ok(promise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_round_trips_known_names() {
        let kind: PromiseKind = serde_json::from_str("\"exercise_frequency\"").unwrap();
        assert_eq!(kind, PromiseKind::ExerciseFrequency);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"exercise_frequency\"");
    }

    #[test]
    fn test_unknown_kind_becomes_other() {
        let kind: PromiseKind = serde_json::from_str("\"meditation_streak\"").unwrap();
        assert_eq!(kind, PromiseKind::Other("meditation_streak".to_string()));
        assert_eq!(kind.as_str(), "meditation_streak");
    }

    #[test]
    fn test_parameters_defaults_apply_when_missing() {
        let params = Parameters::new();
        assert_eq!(params.count("frequency", DEFAULT_FREQUENCY), 1);
        assert_eq!(
            params.number("heart_rate_threshold", DEFAULT_HEART_RATE_THRESHOLD),
            120.0
        );
        assert_eq!(params.days("max_gap_days", DEFAULT_MAX_GAP_DAYS), 7);
        assert_eq!(params.granularity("period", DEFAULT_PERIOD), Granularity::Week);
    }

    #[test]
    fn test_parameters_accept_numbers_as_strings() {
        let mut params = Parameters::new();
        params.insert("frequency", ParamValue::Text("3".to_string()));
        params.insert("duration_minutes", ParamValue::Text("30.5".to_string()));
        assert_eq!(params.count("frequency", 1), 3);
        assert_eq!(params.number("duration_minutes", 25.0), 30.5);
    }

    #[test]
    fn test_parameters_unusable_value_falls_back() {
        let mut params = Parameters::new();
        params.insert("frequency", ParamValue::Text("often".to_string()));
        params.insert("period", ParamValue::Text("fortnight".to_string()));
        assert_eq!(params.count("frequency", 1), 1);
        assert_eq!(params.granularity("period", Granularity::Week), Granularity::Week);
    }

    #[test]
    fn test_promise_from_json_with_naive_timestamps() {
        let promise = Promise::from_json(
            r#"{
                "type": "exercise_frequency",
                "start": "2023-01-02",
                "end": "2023-01-15T23:59:59",
                "parameters": {"frequency": 3, "period": "week"}
            }"#,
        )
        .unwrap();

        assert_eq!(promise.kind, PromiseKind::ExerciseFrequency);
        assert_eq!(promise.start, Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap());
        assert_eq!(promise.parameters.count("frequency", 1), 3);
    }

    #[test]
    fn test_promise_from_json_rejects_malformed_timestamp() {
        let result = Promise::from_json(
            r#"{"type": "exercise_frequency", "start": "soon", "end": "2023-01-15"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_promise_from_json_rejects_inverted_window() {
        let result = Promise::from_json(
            r#"{"type": "exercise_frequency", "start": "2023-02-01", "end": "2023-01-01"}"#,
        );
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::InvalidTimeRange { .. }))
        ));
    }

    #[test]
    fn test_promise_point_window_is_valid() {
        let promise = Promise::from_json(
            r#"{"type": "exercise_consistency", "start": "2023-01-01", "end": "2023-01-01"}"#,
        )
        .unwrap();
        assert_eq!(promise.start, promise.end);
    }
}
