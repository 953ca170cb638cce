//! Evidence model: time-stamped activity and physiological data.
//!
//! Evidence is constructed and owned entirely by the caller (an evidence
//! provider, a file, the simulator); the engine reads it and never mutates
//! it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One point sample of a measured signal, here heart rate in bpm.
///
/// A series is ordered ascending by timestamp; one series per evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSample {
    #[serde(with = "crate::wire::instant")]
    pub timestamp: DateTime<Utc>,
    pub heart_rate: f64,
}

/// A discrete recorded activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    #[serde(with = "crate::wire::instant")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "crate::wire::instant")]
    pub end_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub average_heart_rate: f64,
    pub activity_type: String,
}

/// A derived continuous span where the signal stayed at or above a
/// threshold. Never raw input: either precomputed by the caller or computed
/// by the [`ElevatedIntervalDetector`].
///
/// [`ElevatedIntervalDetector`]: crate::detector::ElevatedIntervalDetector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevatedInterval {
    #[serde(with = "crate::wire::instant")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "crate::wire::instant")]
    pub end_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub average_heart_rate: f64,
}

/// Everything an evaluation may consult.
///
/// `elevated_hr_periods` is optional; when absent, the duration evaluator
/// derives intervals from `heart_rate_data` itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default)]
    pub heart_rate_data: Vec<HeartRateSample>,
    #[serde(default)]
    pub exercise_sessions: Vec<ExerciseSession>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevated_hr_periods: Option<Vec<ElevatedInterval>>,
}

impl Evidence {
    /// Parse evidence from its JSON wire form. Timestamp parsing happens
    /// here, once; malformed timestamps fail the whole parse.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
