use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// An inclusive calendar-date range, as used for rental periods.
///
/// Overlap semantics follow the glossary definition: `[a1, a2]` and
/// `[b1, b2]` overlap iff `a1 <= b2 && b1 <= a2` (both endpoints inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a date range, requiring a strict gap (`start < end`).
    ///
    /// Deliberately stricter than `start <= end`: the minimum rental
    /// duration is 2 inclusive calendar days, enforced here rather than
    /// reconciled silently with the weaker `total_days >= 1` reading.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start >= end {
            return Err(DateRangeError::NotStrictlyOrdered { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of calendar days covered, counting both endpoints.
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Inclusive-endpoint overlap test.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DateRangeError {
    #[error("start date ({start}) must be strictly before end date ({end})")]
    NotStrictlyOrdered { start: NaiveDate, end: NaiveDate },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_requires_strict_order() {
        assert!(DateRange::new(date(2025, 3, 1), date(2025, 3, 1)).is_err());
        assert!(DateRange::new(date(2025, 3, 5), date(2025, 3, 1)).is_err());
        assert!(DateRange::new(date(2025, 3, 1), date(2025, 3, 2)).is_ok());
    }

    #[test]
    fn test_total_days_inclusive() {
        let r = DateRange::new(date(2025, 3, 1), date(2025, 3, 8)).unwrap();
        assert_eq!(r.total_days(), 8);
    }

    #[test]
    fn test_total_days_k_plus_one() {
        for k in 1..=10i64 {
            let r = DateRange::new(date(2025, 1, 1), date(2025, 1, 1) + Duration::days(k)).unwrap();
            assert_eq!(r.total_days(), k + 1);
        }
    }

    #[test]
    fn test_overlap_inclusive_endpoints() {
        let a = DateRange::new(date(2025, 3, 1), date(2025, 3, 5)).unwrap();
        let b = DateRange::new(date(2025, 3, 5), date(2025, 3, 9)).unwrap();
        assert!(a.overlaps(&b));

        let c = DateRange::new(date(2025, 3, 6), date(2025, 3, 9)).unwrap();
        assert!(!a.overlaps(&c));
    }
}
