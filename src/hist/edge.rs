use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::core::{
    date_to_midnight, datetime_to_unix_seconds, naive_to_unix_seconds, unix_seconds_to_datetime,
    unix_seconds_to_naive,
};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Coordinate type usable as a histogram bin boundary.
///
/// Every edge maps onto a numeric axis coordinate. Time-valued edges use
/// seconds since the Unix epoch, so bin widths of time bins are in seconds.
pub trait BinEdge: Copy + PartialOrd + fmt::Debug {
    /// Type of a bin center. Dates widen to date-times because a center can
    /// fall between two midnights.
    type Center: BinEdge;

    /// Spacing of the grid that counted edges must sit on, in axis units;
    /// `None` for continuous coordinates.
    const AXIS_GRID: Option<f64> = None;

    fn to_axis(self) -> f64;

    fn from_axis(value: f64) -> Option<Self>;

    fn is_finite(self) -> bool {
        self.to_axis().is_finite()
    }

    /// Center between two adjacent edges.
    fn midpoint(left: Self, right: Self) -> Self::Center;
}

impl BinEdge for f64 {
    type Center = f64;

    fn to_axis(self) -> f64 {
        self
    }

    fn from_axis(value: f64) -> Option<Self> {
        Some(value)
    }

    fn midpoint(left: Self, right: Self) -> Self::Center {
        left + (right - left) / 2.0
    }
}

impl BinEdge for NaiveDateTime {
    type Center = NaiveDateTime;

    fn to_axis(self) -> f64 {
        naive_to_unix_seconds(self)
    }

    fn from_axis(value: f64) -> Option<Self> {
        unix_seconds_to_naive(value)
    }

    fn is_finite(self) -> bool {
        true
    }

    // Elapsed-time arithmetic: half the interval added to the left edge.
    fn midpoint(left: Self, right: Self) -> Self::Center {
        left + (right - left) / 2
    }
}

impl BinEdge for DateTime<Utc> {
    type Center = DateTime<Utc>;

    fn to_axis(self) -> f64 {
        datetime_to_unix_seconds(self)
    }

    fn from_axis(value: f64) -> Option<Self> {
        unix_seconds_to_datetime(value)
    }

    fn is_finite(self) -> bool {
        true
    }

    fn midpoint(left: Self, right: Self) -> Self::Center {
        left + (right - left) / 2
    }
}

impl BinEdge for NaiveDate {
    type Center = NaiveDateTime;

    const AXIS_GRID: Option<f64> = Some(SECONDS_PER_DAY);

    fn to_axis(self) -> f64 {
        naive_to_unix_seconds(date_to_midnight(self))
    }

    /// Floors to the calendar date containing the instant.
    fn from_axis(value: f64) -> Option<Self> {
        unix_seconds_to_naive(value).map(|time| time.date())
    }

    fn is_finite(self) -> bool {
        true
    }

    fn midpoint(left: Self, right: Self) -> Self::Center {
        <NaiveDateTime as BinEdge>::midpoint(date_to_midnight(left), date_to_midnight(right))
    }
}

#[cfg(test)]
mod tests {
    use super::BinEdge;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn date_midpoint_lands_on_midnight_between_even_span() {
        let center = NaiveDate::midpoint(date(2020, 1, 1), date(2020, 1, 3));
        assert_eq!(center, date(2020, 1, 2).and_hms_opt(0, 0, 0).expect("midnight"));
    }

    #[test]
    fn date_midpoint_of_single_day_is_noon() {
        let center = NaiveDate::midpoint(date(2020, 2, 28), date(2020, 2, 29));
        assert_eq!(center, date(2020, 2, 28).and_hms_opt(12, 0, 0).expect("noon"));
    }

    #[test]
    fn date_axis_is_unix_seconds_of_midnight() {
        assert_eq!(date(1970, 1, 2).to_axis(), 86_400.0);
        assert_eq!(NaiveDate::from_axis(86_400.0 * 1.5), Some(date(1970, 1, 2)));
    }

    #[test]
    fn numeric_edges_reject_nan() {
        assert!(!f64::NAN.is_finite());
        assert!(!BinEdge::is_finite(f64::INFINITY));
        assert!(BinEdge::is_finite(3.0_f64));
    }
}
