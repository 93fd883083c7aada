use crate::booking::BookingStatus;
use serde::{Deserialize, Serialize};
use shared::types::DateRange;

/// One row of the availability projection: a booking's date range and
/// status, as rendered for client-side calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub range: DateRange,
    pub status: BookingStatus,
}

/// Pure projection: from the full set of an item's bookings, keep only the
/// active ones whose range intersects `window` (or all active ones, if no
/// window is given), ordered by start date.
///
/// No I/O — the caller is responsible for loading `bookings` from storage.
pub fn project_availability(
    bookings: &[AvailabilityEntry],
    window: Option<DateRange>,
) -> Vec<AvailabilityEntry> {
    let mut projected: Vec<AvailabilityEntry> = bookings
        .iter()
        .copied()
        .filter(|entry| entry.status.is_active())
        .filter(|entry| match window {
            Some(w) => w.overlaps(&entry.range),
            None => true,
        })
        .collect();

    projected.sort_by_key(|entry| entry.range.start);
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range(y1: i32, m1: u32, d1: u32, y2: i32, m2: u32, d2: u32) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(y1, m1, d1).unwrap(),
            NaiveDate::from_ymd_opt(y2, m2, d2).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_terminal_bookings_excluded() {
        let bookings = vec![
            AvailabilityEntry {
                range: range(2025, 3, 1, 2025, 3, 5),
                status: BookingStatus::Pending,
            },
            AvailabilityEntry {
                range: range(2025, 4, 1, 2025, 4, 5),
                status: BookingStatus::Cancelled,
            },
        ];

        let result = project_availability(&bookings, None);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, BookingStatus::Pending);
    }

    #[test]
    fn test_window_filters_non_overlapping() {
        let bookings = vec![
            AvailabilityEntry {
                range: range(2025, 3, 1, 2025, 3, 5),
                status: BookingStatus::Approved,
            },
            AvailabilityEntry {
                range: range(2025, 6, 1, 2025, 6, 5),
                status: BookingStatus::Approved,
            },
        ];

        let window = range(2025, 2, 20, 2025, 3, 10);
        let result = project_availability(&bookings, Some(window));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].range.start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_results_ordered_by_start() {
        let bookings = vec![
            AvailabilityEntry {
                range: range(2025, 5, 1, 2025, 5, 5),
                status: BookingStatus::PaymentPending,
            },
            AvailabilityEntry {
                range: range(2025, 1, 1, 2025, 1, 5),
                status: BookingStatus::Pending,
            },
        ];

        let result = project_availability(&bookings, None);
        assert!(result[0].range.start < result[1].range.start);
    }
}
