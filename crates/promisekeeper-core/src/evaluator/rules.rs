//! Deterministic rule-based evaluation.
//!
//! One rule per promise kind:
//! - **Frequency**: at least N sessions in every period of the window
//! - **Duration**: at least N qualifying elevated-heart-rate intervals in
//!   every period
//! - **Consistency**: never more than N whole days between activities
//!
//! Rules are reproducible facts, so every verdict they produce carries
//! `confidence = 1.0`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::detector::ElevatedIntervalDetector;
use crate::evidence::{ElevatedInterval, Evidence};
use crate::period::{generate_periods, group_by_period};
use crate::promise::{
    Promise, PromiseKind, DEFAULT_DURATION_MINUTES, DEFAULT_FREQUENCY,
    DEFAULT_HEART_RATE_THRESHOLD, DEFAULT_MAX_GAP_DAYS, DEFAULT_PERIOD,
};
use crate::verdict::Verdict;

use super::PromiseEvaluator;

/// Rule-based promise evaluator.
///
/// Suitable for promises with clear, deterministic criteria; anything it
/// has no rule for becomes a failure verdict naming the unknown kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedEvaluator;

impl RuleBasedEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn evaluate_frequency(&self, promise: &Promise, evidence: &Evidence) -> Verdict {
        let frequency = promise.parameters.count("frequency", DEFAULT_FREQUENCY);
        let granularity = promise.parameters.granularity("period", DEFAULT_PERIOD);

        let periods = generate_periods(promise.start, promise.end, granularity);
        let buckets = group_by_period(
            &evidence.exercise_sessions,
            &periods,
            granularity,
            |session| session.start_time,
        );

        let mut reports = Vec::with_capacity(periods.len());
        let mut fulfilled_periods = 0usize;
        for period in &periods {
            let count = buckets.get(&period.start).map_or(0, Vec::len);
            let period_fulfilled = count >= frequency as usize;
            if period_fulfilled {
                fulfilled_periods += 1;
            }
            reports.push(CountedPeriod {
                period_start: period.start,
                period_end: period.end,
                sessions_count: count,
                required_count: frequency,
                fulfilled: period_fulfilled,
            });
        }

        let total_periods = periods.len();
        // Every period must satisfy the count; a single miss fails the
        // promise, while the percentage stays visible in the reasoning.
        let fulfilled = fulfilled_periods == total_periods;
        let percentage = ratio(fulfilled_periods, total_periods);

        let details = FrequencyDetails {
            periods: reports,
            total_periods,
            fulfilled_periods,
        };
        let reasoning = format!(
            "The promise required exercising {frequency} times per {period}. \
             You met this requirement in {fulfilled_periods} out of {total_periods} \
             {period}s ({percent:.0}%).",
            period = granularity.as_str(),
            percent = percentage * 100.0,
        );
        Verdict::compose(fulfilled, 1.0, reasoning, &details)
    }

    fn evaluate_duration(&self, promise: &Promise, evidence: &Evidence) -> Verdict {
        let threshold = promise
            .parameters
            .number("heart_rate_threshold", DEFAULT_HEART_RATE_THRESHOLD);
        let min_duration = promise
            .parameters
            .number("duration_minutes", DEFAULT_DURATION_MINUTES);
        let frequency = promise.parameters.count("frequency", DEFAULT_FREQUENCY);
        let granularity = promise.parameters.granularity("period", DEFAULT_PERIOD);

        // Prefer intervals the provider precomputed; otherwise derive them
        // from the raw series with the promise's own thresholds.
        let derived;
        let intervals: &[ElevatedInterval] = match &evidence.elevated_hr_periods {
            Some(precomputed) => precomputed,
            None => {
                derived = ElevatedIntervalDetector::new(threshold, min_duration)
                    .detect(&evidence.heart_rate_data);
                &derived
            }
        };

        let qualifying: Vec<&ElevatedInterval> = intervals
            .iter()
            .filter(|interval| {
                interval.average_heart_rate >= threshold
                    && interval.duration_minutes >= min_duration
            })
            .collect();

        let periods = generate_periods(promise.start, promise.end, granularity);
        // Bucketing keys on the interval's start time; an interval crossing
        // a period boundary belongs wholly to the period it started in.
        let buckets = group_by_period(&qualifying, &periods, granularity, |interval| {
            interval.start_time
        });

        let mut reports = Vec::with_capacity(periods.len());
        let mut fulfilled_periods = 0usize;
        for period in &periods {
            let count = buckets.get(&period.start).map_or(0, Vec::len);
            let period_fulfilled = count >= frequency as usize;
            if period_fulfilled {
                fulfilled_periods += 1;
            }
            reports.push(CountedPeriod {
                period_start: period.start,
                period_end: period.end,
                sessions_count: count,
                required_count: frequency,
                fulfilled: period_fulfilled,
            });
        }

        let total_periods = periods.len();
        let fulfilled = fulfilled_periods == total_periods;
        let percentage = ratio(fulfilled_periods, total_periods);

        let details = DurationDetails {
            periods: reports,
            total_periods,
            fulfilled_periods,
            qualifying_sessions: qualifying.len(),
        };
        let reasoning = format!(
            "The promise required exercising with a heart rate above {threshold} bpm \
             for at least {min_duration} minutes, {frequency} times per {period}. \
             You met this requirement in {fulfilled_periods} out of {total_periods} \
             {period}s ({percent:.0}%).",
            period = granularity.as_str(),
            percent = percentage * 100.0,
        );
        Verdict::compose(fulfilled, 1.0, reasoning, &details)
    }

    fn evaluate_consistency(&self, promise: &Promise, evidence: &Evidence) -> Verdict {
        let max_gap_days = promise.parameters.days("max_gap_days", DEFAULT_MAX_GAP_DAYS);

        let mut sessions: Vec<_> = evidence.exercise_sessions.iter().collect();
        sessions.sort_by_key(|session| session.start_time);

        // Walk window start -> sessions -> window end, recording every gap
        // of more than max_gap_days whole days.
        let mut gaps = Vec::new();
        let mut last_activity = promise.start;
        for session in &sessions {
            record_gap(&mut gaps, last_activity, session.start_time, max_gap_days);
            last_activity = session.end_time;
        }
        record_gap(&mut gaps, last_activity, promise.end, max_gap_days);

        let fulfilled = gaps.is_empty();
        let reasoning = format!(
            "The promise required never going more than {max_gap_days} days without \
             exercise. {}",
            if fulfilled {
                "No gaps were found.".to_string()
            } else {
                format!("Found {} gaps exceeding {max_gap_days} days.", gaps.len())
            }
        );
        let details = ConsistencyDetails {
            max_gap_days,
            gaps_found: gaps.len(),
            gaps,
        };
        Verdict::compose(fulfilled, 1.0, reasoning, &details)
    }
}

impl PromiseEvaluator for RuleBasedEvaluator {
    fn evaluate(&self, promise: &Promise, evidence: &Evidence) -> Verdict {
        match &promise.kind {
            PromiseKind::ExerciseFrequency => self.evaluate_frequency(promise, evidence),
            PromiseKind::ExerciseDuration => self.evaluate_duration(promise, evidence),
            PromiseKind::ExerciseConsistency => self.evaluate_consistency(promise, evidence),
            other => Verdict::unknown_kind(other),
        }
    }
}

fn record_gap(
    gaps: &mut Vec<GapReport>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    max_gap_days: i64,
) {
    let gap_days = (to - from).num_days();
    if gap_days > max_gap_days {
        gaps.push(GapReport {
            gap_start: from,
            gap_end: to,
            gap_days,
        });
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Per-period breakdown entry for frequency and duration rules.
#[derive(Debug, Serialize)]
struct CountedPeriod {
    #[serde(with = "crate::wire::instant")]
    period_start: DateTime<Utc>,
    #[serde(with = "crate::wire::instant")]
    period_end: DateTime<Utc>,
    sessions_count: usize,
    required_count: u32,
    fulfilled: bool,
}

#[derive(Debug, Serialize)]
struct FrequencyDetails {
    periods: Vec<CountedPeriod>,
    total_periods: usize,
    fulfilled_periods: usize,
}

#[derive(Debug, Serialize)]
struct DurationDetails {
    periods: Vec<CountedPeriod>,
    total_periods: usize,
    fulfilled_periods: usize,
    qualifying_sessions: usize,
}

#[derive(Debug, Serialize)]
struct GapReport {
    #[serde(with = "crate::wire::instant")]
    gap_start: DateTime<Utc>,
    #[serde(with = "crate::wire::instant")]
    gap_end: DateTime<Utc>,
    gap_days: i64,
}

#[derive(Debug, Serialize)]
struct ConsistencyDetails {
    max_gap_days: i64,
    gaps_found: usize,
    gaps: Vec<GapReport>,
}
