//! Deterministic mock fitness-data source.
//!
//! Stands in for a real tracker integration: generates a heart-rate series
//! with elevated morning and evening exercise windows, a realistic spread of
//! exercise sessions, and detector-derived elevated intervals. Everything is
//! driven by a seeded PCG generator, so the same seed and window always
//! reproduce the same evidence.

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

use crate::detector::ElevatedIntervalDetector;
use crate::evidence::{Evidence, ExerciseSession, HeartRateSample};
use crate::promise::{DEFAULT_DURATION_MINUTES, DEFAULT_HEART_RATE_THRESHOLD};

const ACTIVITY_TYPES: [&str; 4] = ["running", "cycling", "walking", "strength_training"];
const EXERCISE_HOURS: [u32; 5] = [7, 8, 17, 18, 19];

/// Configuration for evidence generation.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Heart-rate sample cadence in minutes.
    pub sample_interval_minutes: i64,
    /// Threshold used when deriving elevated intervals.
    pub elevated_threshold: f64,
    /// Minimum duration used when deriving elevated intervals.
    pub elevated_min_duration_minutes: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            sample_interval_minutes: 1,
            elevated_threshold: DEFAULT_HEART_RATE_THRESHOLD,
            elevated_min_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

/// Seeded generator of mock evidence.
#[derive(Debug, Clone)]
pub struct EvidenceSimulator {
    config: SimulatorConfig,
}

impl EvidenceSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(SimulatorConfig {
            seed,
            ..Default::default()
        })
    }

    /// Generate a full evidence payload for a time window.
    pub fn generate(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Evidence {
        let mut rng = Mcg128Xsl64::seed_from_u64(self.config.seed);

        let heart_rate_data = self.heart_rate_series(&mut rng, start, end);
        let exercise_sessions = self.exercise_sessions(&mut rng, start, end);
        let elevated_hr_periods = ElevatedIntervalDetector::new(
            self.config.elevated_threshold,
            self.config.elevated_min_duration_minutes,
        )
        .detect(&heart_rate_data);

        Evidence {
            heart_rate_data,
            exercise_sessions,
            elevated_hr_periods: Some(elevated_hr_periods),
        }
    }

    /// Heart rate at a fixed cadence, elevated during common exercise hours.
    fn heart_rate_series(
        &self,
        rng: &mut Mcg128Xsl64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<HeartRateSample> {
        let step = Duration::minutes(self.config.sample_interval_minutes.max(1));
        let mut samples = Vec::new();
        let mut current = start;

        while current <= end {
            let hour = current.hour();
            let heart_rate = if (6..9).contains(&hour) {
                rng.gen_range(100..=160)
            } else if (17..20).contains(&hour) {
                rng.gen_range(100..=150)
            } else {
                rng.gen_range(60..=80) + rng.gen_range(-5..=20)
            };
            samples.push(HeartRateSample {
                timestamp: current,
                heart_rate: f64::from(heart_rate),
            });
            current += step;
        }

        samples
    }

    /// Three to five sessions per week, at common exercise times.
    fn exercise_sessions(
        &self,
        rng: &mut Mcg128Xsl64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<ExerciseSession> {
        let days = (end - start).num_days() + 1;
        if days <= 0 {
            return Vec::new();
        }
        let per_week = rng.gen_range(3..=5);
        let num_sessions = (days as f64 / 7.0 * f64::from(per_week)) as i64;

        let mut sessions = Vec::new();
        for _ in 0..num_sessions {
            let day_offset = rng.gen_range(0..days);
            let hour = EXERCISE_HOURS[rng.gen_range(0..EXERCISE_HOURS.len())];
            let minute = rng.gen_range(0..=30);
            let session_start = (start + Duration::days(day_offset))
                .date_naive()
                .and_hms_opt(hour, minute, 0)
                .expect("exercise hour is a valid time")
                .and_utc();

            let duration_minutes = rng.gen_range(30..=90);
            let session_end = session_start + Duration::minutes(duration_minutes);
            if session_start < start || session_end > end {
                continue;
            }

            sessions.push(ExerciseSession {
                start_time: session_start,
                end_time: session_end,
                duration_minutes: duration_minutes as f64,
                average_heart_rate: f64::from(rng.gen_range(120..=160)),
                activity_type: ACTIVITY_TYPES[rng.gen_range(0..ACTIVITY_TYPES.len())]
                    .to_string(),
            });
        }

        sessions.sort_by_key(|session| session.start_time);
        sessions
    }
}
