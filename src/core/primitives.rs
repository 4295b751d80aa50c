use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) / NANOS_PER_SECOND
}

#[must_use]
pub fn naive_to_unix_seconds(time: NaiveDateTime) -> f64 {
    datetime_to_unix_seconds(time.and_utc())
}

/// Converts fractional Unix seconds back to a UTC timestamp.
///
/// Returns `None` for non-finite input or values outside chrono's range.
#[must_use]
pub fn unix_seconds_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let mut nanos = ((seconds - whole) * NANOS_PER_SECOND).round();
    let mut whole = whole;
    if nanos >= NANOS_PER_SECOND {
        whole += 1.0;
        nanos = 0.0;
    }
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(whole as i64, nanos as u32)
}

#[must_use]
pub fn unix_seconds_to_naive(seconds: f64) -> Option<NaiveDateTime> {
    unix_seconds_to_datetime(seconds).map(|time| time.naive_utc())
}

/// Length of a time delta in fractional seconds.
#[must_use]
pub fn time_delta_to_seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / NANOS_PER_SECOND
}

#[must_use]
pub fn date_to_midnight(date: NaiveDate) -> NaiveDateTime {
    NaiveDateTime::from(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn unix_seconds_round_trip_keeps_sub_second_precision() {
        let time = NaiveDate::from_ymd_opt(2021, 6, 15)
            .and_then(|date| date.and_hms_milli_opt(10, 30, 5, 250))
            .expect("valid time");
        let seconds = naive_to_unix_seconds(time);
        assert_eq!(unix_seconds_to_naive(seconds), Some(time));
    }

    #[test]
    fn negative_deltas_convert_to_negative_seconds() {
        let delta = TimeDelta::milliseconds(-1_500);
        assert!((time_delta_to_seconds(delta) + 1.5).abs() <= 1e-9);
    }

    #[test]
    fn non_finite_seconds_have_no_timestamp() {
        assert!(unix_seconds_to_datetime(f64::NAN).is_none());
        assert!(unix_seconds_to_datetime(f64::INFINITY).is_none());
    }
}
