use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::error::{ManateeError, ManateeResult};
use crate::log::activity::validate_name;
use crate::log::{ActivityKind, CountingActivity, CountingEntry, TimingActivity, TimingEntry};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CountingRecord {
    activity: CountingActivity,
    #[serde(default)]
    entries: Vec<CountingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TimingRecord {
    activity: TimingActivity,
    #[serde(default)]
    entries: Vec<TimingEntry>,
}

/// In-memory log of counting and timing activities and their entries.
///
/// Activities are keyed and iterated by name; a name belongs to exactly one
/// kind. Each activity keeps its entries sorted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivityLog {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    counting: BTreeMap<String, CountingRecord>,
    #[serde(default)]
    timing: BTreeMap<String, TimingRecord>,
}

impl ActivityLog {
    #[must_use]
    pub fn new(title: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            user: user.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counting.is_empty() && self.timing.is_empty()
    }

    pub fn activity_kind(&self, name: &str) -> ManateeResult<ActivityKind> {
        if self.counting.contains_key(name) {
            Ok(ActivityKind::Counting)
        } else if self.timing.contains_key(name) {
            Ok(ActivityKind::Timing)
        } else {
            Err(ManateeError::UnknownActivity(name.to_owned()))
        }
    }

    #[must_use]
    pub fn contains_activity(&self, name: &str) -> bool {
        self.activity_kind(name).is_ok()
    }

    pub fn add_counting_activity(&mut self, activity: CountingActivity) -> ManateeResult<()> {
        self.ensure_name_free(&activity.name)?;
        debug!(name = %activity.name, unit = %activity.unit, "add counting activity");
        self.counting.insert(
            activity.name.clone(),
            CountingRecord {
                activity,
                entries: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn add_timing_activity(&mut self, activity: TimingActivity) -> ManateeResult<()> {
        self.ensure_name_free(&activity.name)?;
        debug!(name = %activity.name, "add timing activity");
        self.timing.insert(
            activity.name.clone(),
            TimingRecord {
                activity,
                entries: Vec::new(),
            },
        );
        Ok(())
    }

    /// Removes an activity together with all of its entries.
    pub fn remove_activity(&mut self, name: &str) -> ManateeResult<ActivityKind> {
        let kind = self.activity_kind(name)?;
        let removed = match kind {
            ActivityKind::Counting => self
                .counting
                .remove(name)
                .map_or(0, |record| record.entries.len()),
            ActivityKind::Timing => self
                .timing
                .remove(name)
                .map_or(0, |record| record.entries.len()),
        };
        info!(name, %kind, entries = removed, "removed activity");
        Ok(kind)
    }

    pub fn rename_activity(&mut self, name: &str, new_name: impl Into<String>) -> ManateeResult<()> {
        let new_name: String = new_name.into();
        let kind = self.activity_kind(name)?;
        if new_name == name {
            return Ok(());
        }
        self.ensure_name_free(&new_name)?;
        match kind {
            ActivityKind::Counting => {
                if let Some(mut record) = self.counting.remove(name) {
                    record.activity.name.clone_from(&new_name);
                    self.counting.insert(new_name.clone(), record);
                }
            }
            ActivityKind::Timing => {
                if let Some(mut record) = self.timing.remove(name) {
                    record.activity.name.clone_from(&new_name);
                    self.timing.insert(new_name.clone(), record);
                }
            }
        }
        debug!(from = name, to = %new_name, "renamed activity");
        Ok(())
    }

    pub fn counting_activity(&self, name: &str) -> ManateeResult<&CountingActivity> {
        self.counting_record(name).map(|record| &record.activity)
    }

    pub fn timing_activity(&self, name: &str) -> ManateeResult<&TimingActivity> {
        self.timing_record(name).map(|record| &record.activity)
    }

    /// Counting activities in name order.
    pub fn counting_activities(&self) -> impl Iterator<Item = &CountingActivity> {
        self.counting.values().map(|record| &record.activity)
    }

    /// Timing activities in name order.
    pub fn timing_activities(&self) -> impl Iterator<Item = &TimingActivity> {
        self.timing.values().map(|record| &record.activity)
    }

    pub fn counting_entries(&self, name: &str) -> ManateeResult<&[CountingEntry]> {
        self.counting_record(name).map(|record| record.entries.as_slice())
    }

    pub fn timing_entries(&self, name: &str) -> ManateeResult<&[TimingEntry]> {
        self.timing_record(name).map(|record| record.entries.as_slice())
    }

    /// Inserts `entry` after any equal entries, keeping the activity sorted.
    pub fn add_counting_entry(&mut self, name: &str, entry: CountingEntry) -> ManateeResult<()> {
        entry.validate()?;
        let record = self.counting_record_mut(name)?;
        let index = record.entries.partition_point(|existing| existing <= &entry);
        trace!(name, date = %entry.date, n = entry.n, index, "add counting entry");
        record.entries.insert(index, entry);
        Ok(())
    }

    pub fn add_timing_entry(&mut self, name: &str, entry: TimingEntry) -> ManateeResult<()> {
        entry.validate()?;
        let record = self.timing_record_mut(name)?;
        let index = record.entries.partition_point(|existing| existing <= &entry);
        trace!(name, start = %entry.start, end = %entry.end, index, "add timing entry");
        record.entries.insert(index, entry);
        Ok(())
    }

    /// Removes the first entry equal to `entry`; returns whether one was found.
    pub fn remove_counting_entry(
        &mut self,
        name: &str,
        entry: &CountingEntry,
    ) -> ManateeResult<bool> {
        let record = self.counting_record_mut(name)?;
        let found = record.entries.iter().position(|existing| existing == entry);
        if let Some(index) = found {
            record.entries.remove(index);
        }
        trace!(name, removed = found.is_some(), "remove counting entry");
        Ok(found.is_some())
    }

    pub fn remove_timing_entry(&mut self, name: &str, entry: &TimingEntry) -> ManateeResult<bool> {
        let record = self.timing_record_mut(name)?;
        let found = record.entries.iter().position(|existing| existing == entry);
        if let Some(index) = found {
            record.entries.remove(index);
        }
        trace!(name, removed = found.is_some(), "remove timing entry");
        Ok(found.is_some())
    }

    /// Switches a counting activity to `new_unit`, where one old unit equals
    /// `factor` new units. Quantities and errors of every entry are rescaled.
    pub fn change_units(
        &mut self,
        name: &str,
        new_unit: impl Into<String>,
        factor: f64,
    ) -> ManateeResult<()> {
        if !factor.is_finite() || factor == 0.0 {
            return Err(ManateeError::InvalidData(format!(
                "unit conversion factor must be finite and non-zero, got {factor}"
            )));
        }
        let record = self.counting_record_mut(name)?;
        for entry in &mut record.entries {
            entry.n *= factor;
            entry.error *= factor.abs();
        }
        if factor < 0.0 {
            record.entries.sort();
        }
        let old_unit = std::mem::replace(&mut record.activity.unit, new_unit.into());
        info!(
            name,
            from = %old_unit,
            to = %record.activity.unit,
            factor,
            entries = record.entries.len(),
            "changed activity units"
        );
        Ok(())
    }

    /// First and last date over every counting entry in the log.
    #[must_use]
    pub fn counting_date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.counting
            .values()
            .flat_map(|record| record.entries.iter())
            .fold(None, |span, entry| match span {
                None => Some((entry.date, entry.date)),
                Some((first, last)) => Some((first.min(entry.date), last.max(entry.date))),
            })
    }

    /// Earliest start and latest end over every timing entry in the log.
    #[must_use]
    pub fn timing_time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.timing
            .values()
            .flat_map(|record| record.entries.iter())
            .fold(None, |span, entry| match span {
                None => Some((entry.start, entry.end)),
                Some((first, last)) => Some((first.min(entry.start), last.max(entry.end))),
            })
    }

    pub fn to_json_pretty(&self) -> ManateeResult<String> {
        serde_json::to_string_pretty(self).map_err(ManateeError::from)
    }

    /// Restores a log written by [`ActivityLog::to_json_pretty`].
    ///
    /// Names, entries and the one-kind-per-name rule are checked, and entries
    /// are re-sorted.
    pub fn from_json(json: &str) -> ManateeResult<Self> {
        let mut log: Self = serde_json::from_str(json)?;
        for (key, record) in &mut log.counting {
            ensure_key_matches(key, &record.activity.name)?;
            for entry in &record.entries {
                entry.validate()?;
            }
            record.entries.sort();
        }
        for (key, record) in &mut log.timing {
            ensure_key_matches(key, &record.activity.name)?;
            if log.counting.contains_key(key) {
                return Err(ManateeError::DuplicateActivity { name: key.clone() });
            }
            for entry in &record.entries {
                entry.validate()?;
            }
            record.entries.sort();
        }
        debug!(
            counting = log.counting.len(),
            timing = log.timing.len(),
            "loaded activity log snapshot"
        );
        Ok(log)
    }

    fn ensure_name_free(&self, name: &str) -> ManateeResult<()> {
        validate_name(name)?;
        if self.contains_activity(name) {
            return Err(ManateeError::DuplicateActivity {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    fn counting_record(&self, name: &str) -> ManateeResult<&CountingRecord> {
        match self.counting.get(name) {
            Some(record) => Ok(record),
            None => Err(self.missing(name, ActivityKind::Counting)),
        }
    }

    fn timing_record(&self, name: &str) -> ManateeResult<&TimingRecord> {
        match self.timing.get(name) {
            Some(record) => Ok(record),
            None => Err(self.missing(name, ActivityKind::Timing)),
        }
    }

    fn counting_record_mut(&mut self, name: &str) -> ManateeResult<&mut CountingRecord> {
        if !self.counting.contains_key(name) {
            return Err(self.missing(name, ActivityKind::Counting));
        }
        self.counting
            .get_mut(name)
            .ok_or_else(|| ManateeError::UnknownActivity(name.to_owned()))
    }

    fn timing_record_mut(&mut self, name: &str) -> ManateeResult<&mut TimingRecord> {
        if !self.timing.contains_key(name) {
            return Err(self.missing(name, ActivityKind::Timing));
        }
        self.timing
            .get_mut(name)
            .ok_or_else(|| ManateeError::UnknownActivity(name.to_owned()))
    }

    /// Error for `name` not being an activity of kind `expected`.
    fn missing(&self, name: &str, expected: ActivityKind) -> ManateeError {
        match self.activity_kind(name) {
            Ok(actual) => ManateeError::ActivityKindMismatch {
                name: name.to_owned(),
                expected: expected.as_str(),
                actual: actual.as_str(),
            },
            Err(err) => err,
        }
    }
}

fn ensure_key_matches(key: &str, name: &str) -> ManateeResult<()> {
    validate_name(name)?;
    if key != name {
        return Err(ManateeError::InvalidData(format!(
            "activity stored under `{key}` is named `{name}`"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ActivityLog;
    use crate::log::{CountingActivity, TimingActivity};

    #[test]
    fn blank_names_are_rejected() {
        let mut log = ActivityLog::default();
        assert!(log.add_counting_activity(CountingActivity::new("  ")).is_err());
        assert!(log.add_timing_activity(TimingActivity::new("")).is_err());
        assert!(log.is_empty());
    }

    #[test]
    fn snapshot_with_mismatched_key_is_rejected() {
        let json = r#"{
            "title": "t",
            "user": "u",
            "counting": {"a": {"activity": {"name": "b", "unit": "none"}, "entries": []}},
            "timing": {}
        }"#;
        assert!(ActivityLog::from_json(json).is_err());
    }
}
