//! Calendar helpers shared by the generators.
//!
//! Every date axis in the output (stay nights, inventory, rates, market rows)
//! is produced by [`DateRange`], so month and year rollovers are handled by
//! chrono in exactly one place.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::data::datasets::Booking;

/// Ordered iterator over consecutive calendar days.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DateRange {
    next: Option<NaiveDate>,
    last: Option<NaiveDate>,
}

impl DateRange {
    /// Days in `[start, end]`. Empty when `start > end`.
    pub fn inclusive(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: Some(start),
            last: (start <= end).then_some(end),
        }
    }

    /// Days in `[start, end)`. Empty when `start >= end`.
    pub fn half_open(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: Some(start),
            last: if start < end { end.pred_opt() } else { None },
        }
    }

    fn remaining(&self) -> usize {
        match (self.next, self.last) {
            (Some(next), Some(last)) if next <= last => (last - next).num_days() as usize + 1,
            _ => 0,
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        let last = self.last?;
        if current > last {
            return None;
        }
        self.next = current.succ_opt();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}

/// Inclusive `[start, end]` window of calendar days.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn days(&self) -> DateRange {
        DateRange::inclusive(self.start, self.end)
    }

    pub fn len_days(&self) -> usize {
        self.days().len()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Position of `date` on the window's day axis.
    pub fn offset_of(&self, date: NaiveDate) -> Option<usize> {
        self.contains(date)
            .then(|| (date - self.start).num_days() as usize)
    }
}

/// Whole calendar months from `reference` to `date`; negative for past months.
pub fn months_between(reference: NaiveDate, date: NaiveDate) -> i32 {
    (date.year() - reference.year()) * 12 + (date.month() as i32 - reference.month() as i32)
}

/// Occupied nights of a booking: `[arrival, departure)` paired with its room type.
///
/// The departure day itself is not an occupied night.
pub fn stay_nights(booking: &Booking) -> impl Iterator<Item = (NaiveDate, &str)> + '_ {
    DateRange::half_open(booking.arrival_date, booking.departure_date)
        .map(move |night| (night, booking.room_type.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn inclusive_range_crosses_year_boundary() {
        let days: Vec<_> = DateRange::inclusive(date(2024, 12, 30), date(2025, 1, 2)).collect();
        assert_eq!(
            days,
            vec![
                date(2024, 12, 30),
                date(2024, 12, 31),
                date(2025, 1, 1),
                date(2025, 1, 2)
            ]
        );
    }

    #[test]
    fn half_open_range_excludes_end_and_handles_leap_day() {
        let days: Vec<_> = DateRange::half_open(date(2024, 2, 28), date(2024, 3, 1)).collect();
        assert_eq!(days, vec![date(2024, 2, 28), date(2024, 2, 29)]);
    }

    #[test]
    fn degenerate_ranges_are_empty() {
        assert_eq!(DateRange::half_open(date(2024, 1, 1), date(2024, 1, 1)).count(), 0);
        assert_eq!(DateRange::inclusive(date(2024, 1, 2), date(2024, 1, 1)).count(), 0);
        assert_eq!(DateRange::inclusive(date(2024, 1, 1), date(2024, 1, 1)).count(), 1);
    }

    #[test]
    fn size_hint_matches_iteration() {
        let mut range = DateRange::inclusive(date(2023, 1, 1), date(2023, 12, 31));
        assert_eq!(range.len(), 365);
        range.next();
        assert_eq!(range.len(), 364);
    }

    #[test]
    fn months_between_counts_calendar_months() {
        assert_eq!(months_between(date(2025, 11, 20), date(2025, 11, 1)), 0);
        assert_eq!(months_between(date(2025, 11, 20), date(2026, 2, 1)), 3);
        assert_eq!(months_between(date(2025, 11, 20), date(2025, 8, 31)), -3);
    }

    #[test]
    fn window_offsets() {
        let window = DateWindow::new(date(2024, 1, 30), date(2024, 2, 2));
        assert_eq!(window.len_days(), 4);
        assert_eq!(window.offset_of(date(2024, 2, 1)), Some(2));
        assert_eq!(window.offset_of(date(2024, 2, 3)), None);
    }

    #[test]
    fn stay_nights_excludes_departure_day() {
        let booking = Booking {
            booking_id: "BKG00001".to_string(),
            booking_date: date(2024, 1, 10),
            arrival_date: date(2024, 1, 31),
            departure_date: date(2024, 2, 2),
            room_type: "Suite".to_string(),
            rate_plan: "BAR".to_string(),
            booked_rate: 100.0,
            nights: 2,
            guests: 1,
            channel: "Website".to_string(),
            is_member: false,
            is_cancelled: false,
            revenue: 200.0,
        };
        let nights: Vec<_> = stay_nights(&booking).collect();
        assert_eq!(
            nights,
            vec![(date(2024, 1, 31), "Suite"), (date(2024, 2, 1), "Suite")]
        );
    }
}
