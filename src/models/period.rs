//! Date ranges and report buckets
//!
//! A [`DateRange`] is the optional `[from, to]` window a report is filtered to.
//! A [`Bucket`] is one day, ISO week, or month of a bucketed report.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional inclusive date window; an absent bound is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// A window with no bounds; every record passes
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether `from` lies after `to`, which matches nothing
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }

    /// Inclusive containment check for a known date
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    /// Containment for a record date that may be missing
    ///
    /// Undated records only pass an unbounded window.
    pub fn admits(&self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(date) => self.contains(date),
            None => self.is_unbounded(),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (None, None) => write!(f, "all dates"),
            (Some(from), None) => write!(f, "from {}", from),
            (None, Some(to)) => write!(f, "through {}", to),
            (Some(from), Some(to)) => write!(f, "{} to {}", from, to),
        }
    }
}

/// Granularity of a bucketed report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketSize {
    Day,
    Week,
    #[default]
    Month,
}

impl BucketSize {
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" | "d" => Ok(Self::Day),
            "week" | "weekly" | "w" => Ok(Self::Week),
            "month" | "monthly" | "m" => Ok(Self::Month),
            _ => Err(PeriodParseError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for BucketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
        }
    }
}

/// One bucket of a bucketed report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Bucket {
    /// Single day (e.g., "2025-01-15")
    Day(NaiveDate),

    /// ISO week (e.g., "2025-W03")
    Week { year: i32, week: u32 },

    /// Calendar month (e.g., "2025-01")
    Month { year: i32, month: u32 },
}

impl Bucket {
    /// The bucket of the given size that contains `date`
    pub fn containing(size: BucketSize, date: NaiveDate) -> Self {
        match size {
            BucketSize::Day => Self::Day(date),
            BucketSize::Week => {
                let iso = date.iso_week();
                Self::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            BucketSize::Month => Self::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    pub fn size(&self) -> BucketSize {
        match self {
            Self::Day(_) => BucketSize::Day,
            Self::Week { .. } => BucketSize::Week,
            Self::Month { .. } => BucketSize::Month,
        }
    }

    /// First day of the bucket
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Self::Day(date) => *date,
            Self::Week { year, week } => week_start(*year, *week),
            Self::Month { year, month } => {
                NaiveDate::from_ymd_opt(*year, *month, 1).unwrap_or(NaiveDate::MIN)
            }
        }
    }

    /// Last day of the bucket (inclusive)
    ///
    /// Clamped to `NaiveDate::MAX` at the end of the calendar.
    pub fn end_date(&self) -> NaiveDate {
        match self {
            Self::Day(date) => *date,
            Self::Week { .. } => self
                .start_date()
                .checked_add_days(Days::new(6))
                .unwrap_or(NaiveDate::MAX),
            Self::Month { .. } => self
                .next()
                .and_then(|next| next.start_date().pred_opt())
                .unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// The following bucket of the same size, `None` past the last
    /// representable date
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Day(date) => date.succ_opt().map(Self::Day),
            Self::Week { .. } => self
                .start_date()
                .checked_add_days(Days::new(7))
                .map(|date| Self::containing(BucketSize::Week, date)),
            Self::Month { year, month } => {
                let (year, month) = if *month == 12 {
                    (year.checked_add(1)?, 1)
                } else {
                    (*year, *month + 1)
                };
                NaiveDate::from_ymd_opt(year, month, 1)
                    .map(|first| Self::containing(BucketSize::Month, first))
            }
        }
    }

    /// Every bucket from `first` through `last` inclusive
    ///
    /// Returns `None` when the span holds more than `limit` buckets.
    pub fn span(first: Self, last: Self, limit: usize) -> Option<Vec<Self>> {
        let mut buckets = Vec::new();
        let mut current = Some(first);
        while let Some(bucket) = current.filter(|bucket| *bucket <= last) {
            if buckets.len() == limit {
                return None;
            }
            buckets.push(bucket);
            current = bucket.next();
        }
        Some(buckets)
    }
}

/// Monday of an ISO week
///
/// The first and last ISO weeks of the calendar may start outside the
/// representable range; those clamp to its ends.
fn week_start(year: i32, week: u32) -> NaiveDate {
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).unwrap_or_else(|| {
        if year > 0 {
            let back = NaiveDate::MAX.weekday().num_days_from_monday();
            NaiveDate::MAX
                .checked_sub_days(Days::new(u64::from(back)))
                .unwrap_or(NaiveDate::MAX)
        } else {
            NaiveDate::MIN
        }
    })
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Week { year, week } => write!(f, "{}-W{:02}", year, week),
            Self::Month { year, month } => write!(f, "{}-{:02}", year, month),
        }
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid bucket size: {}", s),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_range_contains_inclusive() {
        let range = DateRange::between(d(2025, 1, 1), d(2025, 1, 31));
        assert!(range.contains(d(2025, 1, 1)));
        assert!(range.contains(d(2025, 1, 31)));
        assert!(!range.contains(d(2025, 2, 1)));
        assert!(!range.contains(d(2024, 12, 31)));
    }

    #[test]
    fn test_half_open_ranges() {
        let from_only = DateRange::new(Some(d(2025, 1, 1)), None);
        assert!(from_only.contains(d(2099, 1, 1)));
        assert!(!from_only.contains(d(2024, 1, 1)));

        let to_only = DateRange::new(None, Some(d(2025, 1, 1)));
        assert!(to_only.contains(d(1990, 1, 1)));
        assert!(!to_only.contains(d(2025, 1, 2)));
    }

    #[test]
    fn test_undated_only_admitted_by_unbounded() {
        assert!(DateRange::unbounded().admits(None));
        assert!(!DateRange::new(Some(d(2025, 1, 1)), None).admits(None));
    }

    #[test]
    fn test_inverted_range() {
        let range = DateRange::between(d(2025, 2, 1), d(2025, 1, 1));
        assert!(range.is_inverted());
        assert!(!range.contains(d(2025, 1, 15)));
    }

    #[test]
    fn test_month_bucket_bounds() {
        let feb = Bucket::containing(BucketSize::Month, d(2024, 2, 10));
        assert_eq!(feb.start_date(), d(2024, 2, 1));
        assert_eq!(feb.end_date(), d(2024, 2, 29));
        assert_eq!(feb.to_string(), "2024-02");

        let dec = Bucket::Month { year: 2024, month: 12 };
        assert_eq!(dec.end_date(), d(2024, 12, 31));
        assert_eq!(dec.next(), Some(Bucket::Month { year: 2025, month: 1 }));
    }

    #[test]
    fn test_week_bucket_bounds() {
        // 2025-01-01 is a Wednesday in ISO week 2025-W01
        let week = Bucket::containing(BucketSize::Week, d(2025, 1, 1));
        assert_eq!(week, Bucket::Week { year: 2025, week: 1 });
        assert_eq!(week.start_date(), d(2024, 12, 30));
        assert_eq!(week.end_date(), d(2025, 1, 5));
        assert_eq!(week.to_string(), "2025-W01");

        let last_2020 = Bucket::Week { year: 2020, week: 53 };
        assert_eq!(last_2020.next(), Some(Bucket::Week { year: 2021, week: 1 }));
    }

    #[test]
    fn test_span_fills_gaps() {
        let span = Bucket::span(
            Bucket::Month { year: 2024, month: 11 },
            Bucket::Month { year: 2025, month: 2 },
            100,
        )
        .unwrap();
        let labels: Vec<String> = span.iter().map(|b| b.to_string()).collect();
        assert_eq!(labels, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn test_span_over_limit() {
        let first = Bucket::Day(d(2025, 1, 1));
        let last = Bucket::Day(d(2025, 1, 10));
        assert_eq!(Bucket::span(first, last, 10).map(|s| s.len()), Some(10));
        assert!(Bucket::span(first, last, 9).is_none());
    }

    #[test]
    fn test_buckets_at_end_of_calendar() {
        for size in [BucketSize::Day, BucketSize::Week, BucketSize::Month] {
            let bucket = Bucket::containing(size, NaiveDate::MAX);
            assert!(bucket.start_date() <= NaiveDate::MAX);
            assert_eq!(bucket.end_date(), NaiveDate::MAX);
            assert!(bucket.contains(NaiveDate::MAX));
            assert_eq!(bucket.next(), None);

            let span = Bucket::span(bucket, bucket, 10).unwrap();
            assert_eq!(span, vec![bucket]);
        }
    }

    #[test]
    fn test_buckets_at_start_of_calendar() {
        for size in [BucketSize::Day, BucketSize::Week, BucketSize::Month] {
            let bucket = Bucket::containing(size, NaiveDate::MIN);
            assert!(bucket.end_date() >= NaiveDate::MIN);
            assert!(bucket.next().is_some());
        }
    }

    #[test]
    fn test_bucket_size_parse() {
        assert_eq!(BucketSize::parse("Weekly").unwrap(), BucketSize::Week);
        assert_eq!(BucketSize::parse("d").unwrap(), BucketSize::Day);
        assert!(BucketSize::parse("fortnight").is_err());
    }
}
