//! Calendar period segmentation.
//!
//! Splits a promise window into contiguous calendar buckets (day / week /
//! month) and classifies timestamped items into them. Buckets are half-open
//! `[start, end)` and always begin at the canonical unit boundary containing
//! the window start — midnight, Monday midnight, or the first of the month —
//! not at the window start itself.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Calendar bucket size used for frequency-style checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Parse a wire-form period name (`"day"`, `"week"`, `"month"`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Start of the calendar unit containing `instant`.
    ///
    /// Day: midnight. Week: the most recent Monday, at midnight. Month: the
    /// first of the month, at midnight. This same rule keys both period
    /// generation and item bucketing, so the two always agree.
    pub fn unit_start(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let date = instant.date_naive();
        let start_date = match self {
            Self::Day => date,
            Self::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Self::Month => first_of_month(date.year(), date.month()),
        };
        start_date.and_time(NaiveTime::MIN).and_utc()
    }

    /// Start of the unit following the one beginning at `unit_start`.
    ///
    /// Months advance to the first of the next month rather than by a fixed
    /// day count, so variable month lengths never drift the boundary.
    pub fn advance(&self, unit_start: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Day => unit_start + Duration::days(1),
            Self::Week => unit_start + Duration::days(7),
            Self::Month => {
                let date = unit_start.date_naive();
                let (year, month) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                first_of_month(year, month).and_time(NaiveTime::MIN).and_utc()
            }
        }
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // month is always 1..=12 here
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is a valid date")
}

/// A single calendar bucket, half-open `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(with = "crate::wire::instant")]
    pub start: DateTime<Utc>,
    #[serde(with = "crate::wire::instant")]
    pub end: DateTime<Utc>,
}

impl Period {
    /// Whether `instant` falls inside this bucket.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Generate the ordered sequence of periods covering `[start, end]`.
///
/// The first period begins at the canonical unit boundary containing
/// `start`; generation continues while the cursor has not passed `end`, so
/// every calendar unit touching the window gets a bucket and even
/// `start == end` yields one period.
pub fn generate_periods(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut cursor = granularity.unit_start(start);

    while cursor <= end {
        let next = granularity.advance(cursor);
        periods.push(Period {
            start: cursor,
            end: next,
        });
        cursor = next;
    }

    periods
}

/// Classify items into the generated periods by their own timestamps.
///
/// Every generated period is present in the result, empty or not — empty
/// buckets still count toward frequency totals. An item whose unit-start key
/// matches no generated period is dropped from all buckets; out-of-window
/// evidence is ignored rather than misfiled.
pub fn group_by_period<'a, T, F>(
    items: &'a [T],
    periods: &[Period],
    granularity: Granularity,
    timestamp: F,
) -> BTreeMap<DateTime<Utc>, Vec<&'a T>>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut buckets: BTreeMap<DateTime<Utc>, Vec<&'a T>> =
        periods.iter().map(|p| (p.start, Vec::new())).collect();

    for item in items {
        let key = granularity.unit_start(timestamp(item));
        if let Some(bucket) = buckets.get_mut(&key) {
            bucket.push(item);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc_datetime(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
    }

    #[test]
    fn test_day_unit_start_is_midnight() {
        let instant = utc_datetime(2024, 3, 15, 14, 45);
        assert_eq!(
            Granularity::Day.unit_start(instant),
            utc_datetime(2024, 3, 15, 0, 0)
        );
    }

    #[test]
    fn test_week_unit_start_is_monday_midnight() {
        // 2024-03-15 is a Friday; the containing week starts Monday 03-11.
        let instant = utc_datetime(2024, 3, 15, 14, 45);
        assert_eq!(
            Granularity::Week.unit_start(instant),
            utc_datetime(2024, 3, 11, 0, 0)
        );
    }

    #[test]
    fn test_week_unit_start_of_monday_is_itself() {
        let monday = utc_datetime(2024, 3, 11, 9, 30);
        assert_eq!(
            Granularity::Week.unit_start(monday),
            utc_datetime(2024, 3, 11, 0, 0)
        );
    }

    #[test]
    fn test_month_unit_start_is_first_of_month() {
        let instant = utc_datetime(2024, 2, 29, 12, 0);
        assert_eq!(
            Granularity::Month.unit_start(instant),
            utc_datetime(2024, 2, 1, 0, 0)
        );
    }

    #[test]
    fn test_month_advance_handles_variable_lengths() {
        // January has 31 days, February 2024 has 29; a fixed day count would
        // drift here.
        let jan = utc_datetime(2024, 1, 1, 0, 0);
        let feb = Granularity::Month.advance(jan);
        assert_eq!(feb, utc_datetime(2024, 2, 1, 0, 0));
        let mar = Granularity::Month.advance(feb);
        assert_eq!(mar, utc_datetime(2024, 3, 1, 0, 0));
    }

    #[test]
    fn test_month_advance_across_year_boundary() {
        let dec = utc_datetime(2023, 12, 1, 0, 0);
        assert_eq!(
            Granularity::Month.advance(dec),
            utc_datetime(2024, 1, 1, 0, 0)
        );
    }

    #[test]
    fn test_generate_periods_covers_window_contiguously() {
        let start = utc_datetime(2024, 3, 13, 10, 0); // Wednesday
        let end = utc_datetime(2024, 3, 27, 10, 0);
        let periods = generate_periods(start, end, Granularity::Week);

        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].start, utc_datetime(2024, 3, 11, 0, 0));
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(periods.last().unwrap().end > end);
    }

    #[test]
    fn test_generate_periods_point_window_yields_one_period() {
        let instant = utc_datetime(2024, 3, 15, 12, 0);
        let periods = generate_periods(instant, instant, Granularity::Day);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start, utc_datetime(2024, 3, 15, 0, 0));
        assert_eq!(periods[0].end, utc_datetime(2024, 3, 16, 0, 0));
    }

    #[test]
    fn test_generate_periods_end_on_boundary_includes_touching_unit() {
        // The window end sits exactly on a day boundary; the unit starting
        // there still touches the closed window [start, end].
        let start = utc_datetime(2024, 3, 15, 6, 0);
        let end = utc_datetime(2024, 3, 17, 0, 0);
        let periods = generate_periods(start, end, Granularity::Day);
        assert_eq!(periods.len(), 3);
        assert_eq!(periods[2].start, end);
    }

    #[test]
    fn test_generate_month_periods() {
        let start = utc_datetime(2024, 1, 20, 0, 0);
        let end = utc_datetime(2024, 3, 5, 0, 0);
        let periods = generate_periods(start, end, Granularity::Month);

        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].start, utc_datetime(2024, 1, 1, 0, 0));
        assert_eq!(periods[0].end, utc_datetime(2024, 2, 1, 0, 0));
        assert_eq!(periods[1].end, utc_datetime(2024, 3, 1, 0, 0));
        assert_eq!(periods[2].end, utc_datetime(2024, 4, 1, 0, 0));
    }

    #[test]
    fn test_period_contains_is_half_open() {
        let period = Period {
            start: utc_datetime(2024, 3, 11, 0, 0),
            end: utc_datetime(2024, 3, 18, 0, 0),
        };
        assert!(period.contains(period.start));
        assert!(period.contains(utc_datetime(2024, 3, 17, 23, 59)));
        assert!(!period.contains(period.end));
    }

    #[test]
    fn test_group_by_period_keeps_empty_buckets() {
        let periods = generate_periods(
            utc_datetime(2024, 3, 11, 0, 0),
            utc_datetime(2024, 3, 24, 0, 0),
            Granularity::Week,
        );
        let items = vec![utc_datetime(2024, 3, 12, 8, 0)];
        let buckets = group_by_period(&items, &periods, Granularity::Week, |t| *t);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&utc_datetime(2024, 3, 11, 0, 0)].len(), 1);
        assert_eq!(buckets[&utc_datetime(2024, 3, 18, 0, 0)].len(), 0);
    }

    #[test]
    fn test_group_by_period_drops_items_outside_window() {
        let periods = generate_periods(
            utc_datetime(2024, 3, 11, 0, 0),
            utc_datetime(2024, 3, 17, 0, 0),
            Granularity::Week,
        );
        let items = vec![
            utc_datetime(2024, 3, 12, 8, 0),  // inside
            utc_datetime(2024, 2, 1, 8, 0),   // before the window
            utc_datetime(2024, 4, 10, 8, 0),  // after the window
        ];
        let buckets = group_by_period(&items, &periods, Granularity::Week, |t| *t);

        let total: usize = buckets.values().map(Vec::len).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_group_by_period_each_item_in_one_bucket() {
        let periods = generate_periods(
            utc_datetime(2024, 3, 1, 0, 0),
            utc_datetime(2024, 3, 10, 0, 0),
            Granularity::Day,
        );
        let items: Vec<_> = (1..=10)
            .map(|day| utc_datetime(2024, 3, day, 12, 0))
            .collect();
        let buckets = group_by_period(&items, &periods, Granularity::Day, |t| *t);

        let total: usize = buckets.values().map(Vec::len).sum();
        assert_eq!(total, items.len());
        for bucket in buckets.values() {
            assert!(bucket.len() <= 1);
        }
    }
}
