use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{date_to_midnight, time_delta_to_seconds};
use crate::error::{ManateeError, ManateeResult};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Quantity logged for a counting activity on one date.
///
/// Entries order by date, then quantity, then error; the note only breaks
/// remaining ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountingEntry {
    pub date: NaiveDate,
    pub n: f64,
    #[serde(default)]
    pub error: f64,
    #[serde(default)]
    pub note: String,
}

impl CountingEntry {
    pub fn new(date: NaiveDate, n: f64) -> ManateeResult<Self> {
        Self::with_error(date, n, 0.0)
    }

    pub fn with_error(date: NaiveDate, n: f64, error: f64) -> ManateeResult<Self> {
        let entry = Self {
            date,
            n,
            error,
            note: String::new(),
        };
        entry.validate()?;
        Ok(entry)
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub(crate) fn validate(&self) -> ManateeResult<()> {
        if !self.n.is_finite() {
            return Err(ManateeError::InvalidData(format!(
                "entry quantity must be finite, got {}",
                self.n
            )));
        }
        if !self.error.is_finite() || self.error < 0.0 {
            return Err(ManateeError::InvalidData(format!(
                "entry error must be finite and >= 0, got {}",
                self.error
            )));
        }
        Ok(())
    }

    fn sort_key(&self) -> (NaiveDate, OrderedFloat<f64>, OrderedFloat<f64>, &str) {
        (
            self.date,
            OrderedFloat(self.n),
            OrderedFloat(self.error),
            self.note.as_str(),
        )
    }
}

impl PartialEq for CountingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for CountingEntry {}

impl PartialOrd for CountingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CountingEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Tracked interval of a timing activity, ordered by start then end.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimingEntry {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub note: String,
}

impl TimingEntry {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> ManateeResult<Self> {
        let entry = Self {
            start,
            end,
            note: String::new(),
        };
        entry.validate()?;
        Ok(entry)
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub(crate) fn validate(&self) -> ManateeResult<()> {
        if self.end < self.start {
            return Err(ManateeError::InvalidData(format!(
                "timing entry ends ({}) before it starts ({})",
                self.end, self.start
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Hours of this interval falling inside `[from, to]`; zero when disjoint.
    #[must_use]
    pub fn overlap_hours(&self, from: NaiveDateTime, to: NaiveDateTime) -> f64 {
        let overlap = self.end.min(to) - self.start.max(from);
        if overlap < TimeDelta::zero() {
            0.0
        } else {
            time_delta_to_seconds(overlap) / SECONDS_PER_HOUR
        }
    }

    /// Hours of this interval falling on `date`, from midnight up to one
    /// microsecond before the next midnight.
    #[must_use]
    pub fn overlap_hours_on(&self, date: NaiveDate) -> f64 {
        let from = date_to_midnight(date);
        let to = from + TimeDelta::days(1) - TimeDelta::microseconds(1);
        self.overlap_hours(from, to)
    }
}
