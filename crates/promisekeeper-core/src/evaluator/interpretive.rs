//! Interpretive evaluation behind a narrow reasoning seam.
//!
//! For promise kinds without a deterministic rule, judgment is delegated to
//! an external reasoning collaborator through the [`Interpreter`] trait.
//! The engine's own responsibilities stop at two things: condensing the
//! evidence into a compact, bounded [`EvidenceSummary`] (counts and
//! per-week aggregates, never raw samples), and validating the returned
//! confidence. Interpretive verdicts are inherently less certain than rule
//! verdicts, so their confidence is capped below 1.0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::evidence::Evidence;
use crate::period::{generate_periods, group_by_period, Granularity};
use crate::promise::{Promise, PromiseKind, DEFAULT_FREQUENCY};
use crate::verdict::{clamp_confidence, Verdict};

use super::PromiseEvaluator;

/// Upper bound on interpretive confidence; rule-based certainty (1.0) is
/// reserved for deterministic rules.
pub const MAX_INTERPRETIVE_CONFIDENCE: f64 = 0.99;

/// Session count for one week of the promise window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySessionCount {
    #[serde(with = "crate::wire::instant")]
    pub week_start: DateTime<Utc>,
    pub count: usize,
}

/// Elevated-interval aggregates for one week of the promise window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyElevatedSummary {
    #[serde(with = "crate::wire::instant")]
    pub week_start: DateTime<Utc>,
    pub count: usize,
    pub avg_duration_minutes: f64,
    pub avg_heart_rate: f64,
}

/// Compact, bounded-size representation of the evidence.
///
/// Size scales with the number of weeks in the promise window, never with
/// the number of raw samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSummary {
    pub session_count: usize,
    pub sessions_per_week: Vec<WeeklySessionCount>,
    pub elevated_interval_count: usize,
    pub elevated_per_week: Vec<WeeklyElevatedSummary>,
}

impl EvidenceSummary {
    /// Summarize evidence over the promise window, week by week.
    pub fn from_evidence(promise: &Promise, evidence: &Evidence) -> Self {
        let weeks = generate_periods(promise.start, promise.end, Granularity::Week);

        let session_buckets = group_by_period(
            &evidence.exercise_sessions,
            &weeks,
            Granularity::Week,
            |session| session.start_time,
        );
        let sessions_per_week = weeks
            .iter()
            .map(|week| WeeklySessionCount {
                week_start: week.start,
                count: session_buckets.get(&week.start).map_or(0, Vec::len),
            })
            .collect();

        let intervals = evidence.elevated_hr_periods.as_deref().unwrap_or(&[]);
        let interval_buckets =
            group_by_period(intervals, &weeks, Granularity::Week, |interval| {
                interval.start_time
            });
        let elevated_per_week = weeks
            .iter()
            .filter_map(|week| {
                let bucket = interval_buckets.get(&week.start)?;
                if bucket.is_empty() {
                    return None;
                }
                let count = bucket.len() as f64;
                Some(WeeklyElevatedSummary {
                    week_start: week.start,
                    count: bucket.len(),
                    avg_duration_minutes: bucket
                        .iter()
                        .map(|i| i.duration_minutes)
                        .sum::<f64>()
                        / count,
                    avg_heart_rate: bucket
                        .iter()
                        .map(|i| i.average_heart_rate)
                        .sum::<f64>()
                        / count,
                })
            })
            .collect();

        Self {
            session_count: evidence.exercise_sessions.len(),
            sessions_per_week,
            elevated_interval_count: intervals.len(),
            elevated_per_week,
        }
    }
}

/// What a reasoning backend returns for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub fulfilled: bool,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub details: Value,
}

/// Narrow capability interface to an external reasoning collaborator.
///
/// The engine only ever sees this trait; a production backend can be
/// substituted without touching any deterministic rule code.
pub trait Interpreter: Send + Sync {
    fn assess(&self, promise: &Promise, summary: &EvidenceSummary) -> Assessment;
}

/// Interpretive promise evaluator.
///
/// Suitable for promises with more complex or subjective criteria than the
/// deterministic rules cover.
pub struct InterpretiveEvaluator {
    interpreter: Box<dyn Interpreter>,
}

impl InterpretiveEvaluator {
    pub fn new(interpreter: Box<dyn Interpreter>) -> Self {
        Self { interpreter }
    }

    /// Evaluator backed by the built-in heuristic interpreter.
    pub fn heuristic() -> Self {
        Self::new(Box::new(HeuristicInterpreter))
    }
}

impl PromiseEvaluator for InterpretiveEvaluator {
    fn evaluate(&self, promise: &Promise, evidence: &Evidence) -> Verdict {
        let summary = EvidenceSummary::from_evidence(promise, evidence);
        let assessment = self.interpreter.assess(promise, &summary);

        let confidence =
            clamp_confidence(assessment.confidence).min(MAX_INTERPRETIVE_CONFIDENCE);
        Verdict {
            fulfilled: assessment.fulfilled,
            confidence,
            reasoning: assessment.reasoning,
            details: assessment.details,
        }
    }
}

/// Built-in reasoning backend with simple per-kind heuristics.
///
/// Stands in where no external backend is wired up; a real backend would do
/// a more sophisticated analysis over the same summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicInterpreter;

impl Interpreter for HeuristicInterpreter {
    fn assess(&self, promise: &Promise, summary: &EvidenceSummary) -> Assessment {
        match &promise.kind {
            PromiseKind::ExerciseFrequency => {
                let frequency = promise.parameters.count("frequency", DEFAULT_FREQUENCY);
                let fulfilled = summary.session_count >= frequency as usize;
                Assessment {
                    fulfilled,
                    confidence: 0.85,
                    reasoning: format!(
                        "The evidence shows {} exercise sessions against a target of \
                         {frequency} per period. {}",
                        summary.session_count,
                        if fulfilled {
                            "This meets the criteria."
                        } else {
                            "This does not meet the criteria."
                        }
                    ),
                    details: json!({
                        "sessions_found": summary.session_count,
                        "required_frequency": frequency,
                    }),
                }
            }
            PromiseKind::ExerciseDuration => {
                let fulfilled = summary.elevated_interval_count > 0;
                Assessment {
                    fulfilled,
                    confidence: 0.9,
                    reasoning: format!(
                        "The evidence shows {} periods of elevated heart rate. {}",
                        summary.elevated_interval_count,
                        if fulfilled {
                            "This meets the criteria."
                        } else {
                            "This does not meet the criteria."
                        }
                    ),
                    details: json!({
                        "qualifying_periods": summary.elevated_interval_count,
                    }),
                }
            }
            _ => Assessment {
                fulfilled: summary.session_count > 0,
                confidence: 0.7,
                reasoning: "The evidence shows activity patterns broadly consistent \
                            with the promise criteria."
                    .to_string(),
                details: json!({
                    "note": "heuristic assessment without a kind-specific rule",
                }),
            },
        }
    }
}
