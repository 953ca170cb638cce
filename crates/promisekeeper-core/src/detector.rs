//! Elevated-interval detection over point samples.
//!
//! Scans an ascending heart-rate series and emits the continuous runs that
//! stay at or above a threshold for at least a minimum duration.

use chrono::{DateTime, Utc};

use crate::evidence::{ElevatedInterval, HeartRateSample};

/// Detector for continuous above-threshold intervals.
pub struct ElevatedIntervalDetector {
    /// Signal threshold (bpm) a sample must reach to extend a run.
    threshold: f64,
    /// Minimum qualifying duration in minutes; the boundary is inclusive.
    min_duration_minutes: f64,
}

impl ElevatedIntervalDetector {
    pub fn new(threshold: f64, min_duration_minutes: f64) -> Self {
        Self {
            threshold,
            min_duration_minutes,
        }
    }

    /// Find qualifying elevated intervals in an ascending sample series.
    ///
    /// A sample at or above the threshold opens a run (or extends the open
    /// one); a sample below it closes the run. A run spans from its first
    /// elevated sample to its last elevated sample, and qualifies when that
    /// span is at least `min_duration_minutes` (`>=`, so an interval exactly
    /// at the boundary is emitted). The reported average covers the samples
    /// inside the span. An empty series, or one that never reaches the
    /// threshold, produces no intervals.
    pub fn detect(&self, samples: &[HeartRateSample]) -> Vec<ElevatedInterval> {
        let mut intervals = Vec::new();
        let mut open: Option<(DateTime<Utc>, DateTime<Utc>)> = None; // (first, last) elevated

        for sample in samples {
            if sample.heart_rate >= self.threshold {
                open = match open {
                    None => Some((sample.timestamp, sample.timestamp)),
                    Some((first, _)) => Some((first, sample.timestamp)),
                };
            } else if let Some((first, last)) = open.take() {
                self.close_run(samples, first, last, &mut intervals);
            }
        }

        if let Some((first, last)) = open {
            self.close_run(samples, first, last, &mut intervals);
        }

        intervals
    }

    fn close_run(
        &self,
        samples: &[HeartRateSample],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        intervals: &mut Vec<ElevatedInterval>,
    ) {
        let duration_minutes = (end - start).num_seconds() as f64 / 60.0;
        if duration_minutes < self.min_duration_minutes {
            return;
        }
        intervals.push(ElevatedInterval {
            start_time: start,
            end_time: end,
            duration_minutes,
            average_heart_rate: average_over(samples, start, end),
        });
    }
}

/// Mean of the samples whose timestamps fall within `[start, end]`.
fn average_over(samples: &[HeartRateSample], start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for sample in samples {
        if sample.timestamp >= start && sample.timestamp <= end {
            sum += sample.heart_rate;
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}
