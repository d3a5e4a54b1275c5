//! Time and timestamp helpers, and the half-open [`TimeRange`].

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// UTC timestamp used for quote boundaries, event times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Convert epoch milliseconds into a [`Timestamp`].
///
/// # Errors
///
/// Returns [`ValidationError::TimestampOutOfRange`] if chrono cannot
/// represent the value.
pub fn from_millis(millis: i64) -> Result<Timestamp, ValidationError> {
    DateTime::from_timestamp_millis(millis).ok_or(ValidationError::TimestampOutOfRange(millis))
}

/// Half-open interval `[start, end)`.
///
/// Ordered by start, then end, so a `BTreeSet` or sorted `Vec` of ranges
/// follows the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    start: Timestamp,
    end: Timestamp,
}

impl TimeRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTimeRange`] when `start >= end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::EmptyTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create a range from epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if either bound is unrepresentable or
    /// the range is empty.
    pub fn from_millis(start: i64, end: i64) -> Result<Self, ValidationError> {
        Self::new(from_millis(start)?, from_millis(end)?)
    }

    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether `instant` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether `other` lies entirely inside this range.
    #[must_use]
    pub fn contains_range(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether `other` starts exactly where this range ends.
    #[must_use]
    pub fn is_followed_by(&self, other: &Self) -> bool {
        self.end == other.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: i64, end: i64) -> TimeRange {
        TimeRange::from_millis(start, end).unwrap()
    }

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_reject_range_when_start_equals_end() {
        let result = TimeRange::from_millis(1000, 1000);
        assert!(matches!(
            result,
            Err(ValidationError::EmptyTimeRange { .. })
        ));
    }

    #[test]
    fn should_reject_range_when_start_after_end() {
        assert!(TimeRange::from_millis(2000, 1000).is_err());
    }

    #[test]
    fn should_include_start_and_exclude_end() {
        let r = range(1000, 2000);
        assert!(r.contains(from_millis(1000).unwrap()));
        assert!(r.contains(from_millis(1999).unwrap()));
        assert!(!r.contains(from_millis(2000).unwrap()));
        assert!(!r.contains(from_millis(999).unwrap()));
    }

    #[test]
    fn should_contain_sub_range_and_itself() {
        let outer = range(1000, 5000);
        assert!(outer.contains_range(&range(1000, 5000)));
        assert!(outer.contains_range(&range(2000, 3000)));
        assert!(!outer.contains_range(&range(500, 3000)));
        assert!(!outer.contains_range(&range(4000, 6000)));
    }

    #[test]
    fn should_compare_equal_only_when_both_bounds_match() {
        assert_eq!(range(1000, 2000), range(1000, 2000));
        assert_ne!(range(1000, 2000), range(1000, 3000));
    }

    #[test]
    fn should_order_by_start_then_end() {
        let mut ranges = vec![range(3000, 4000), range(1000, 3000), range(1000, 2000)];
        ranges.sort();
        assert_eq!(
            ranges,
            vec![range(1000, 2000), range(1000, 3000), range(3000, 4000)]
        );
    }

    #[test]
    fn should_detect_adjacent_ranges() {
        assert!(range(1000, 2000).is_followed_by(&range(2000, 3000)));
        assert!(!range(1000, 2000).is_followed_by(&range(2001, 3000)));
    }

    #[test]
    fn should_report_duration() {
        assert_eq!(range(0, 3_600_000).duration(), TimeDelta::hours(1));
    }
}
