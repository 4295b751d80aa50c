use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

use crate::core::{date_to_midnight, time_delta_to_seconds};
use crate::error::{ManateeError, ManateeResult};
use crate::hist::BinnedSeries;
use crate::log::{ActivityKind, ActivityLog, CountingEntry, TimingEntry};
use crate::summary::DateBinning;

const SECONDS_PER_DAY: f64 = 86_400.0;
const ENTRY_HOUR: i64 = 12;

/// Whole days spanned by each bin; every bin must cover at least one day.
fn bin_days(edges: &[NaiveDateTime]) -> ManateeResult<Vec<f64>> {
    edges
        .windows(2)
        .map(|pair| {
            let days = (time_delta_to_seconds(pair[1] - pair[0]) / SECONDS_PER_DAY).floor();
            if days < 1.0 {
                Err(ManateeError::InvalidBins(format!(
                    "bin [{}, {}) is shorter than one day",
                    pair[0], pair[1]
                )))
            } else {
                Ok(days)
            }
        })
        .collect()
}

/// Per-day average quantity of counting entries in each bin.
///
/// An entry belongs to the bin containing noon of its date. Values are
/// `Σ n / days` and errors `sqrt(Σ error² / days)`.
pub fn counting_amounts(
    entries: &[CountingEntry],
    edges: &[NaiveDateTime],
) -> ManateeResult<BinnedSeries<NaiveDateTime>> {
    let days = bin_days(edges)?;
    let mut values = vec![0.0; days.len()];
    let mut variances = vec![0.0; days.len()];
    for entry in entries {
        let at = date_to_midnight(entry.date) + TimeDelta::hours(ENTRY_HOUR);
        let index = edges.partition_point(|edge| *edge <= at);
        if index == 0 || index == edges.len() {
            continue;
        }
        let bin = index - 1;
        values[bin] += entry.n / days[bin];
        variances[bin] += entry.error * entry.error / days[bin];
    }
    let errors = variances.into_iter().map(f64::sqrt).collect();
    BinnedSeries::new(edges.to_vec(), values, errors)
}

/// Per-day average hours tracked in each bin; errors are zero.
pub fn timing_amounts(
    entries: &[TimingEntry],
    edges: &[NaiveDateTime],
) -> ManateeResult<BinnedSeries<NaiveDateTime>> {
    let days = bin_days(edges)?;
    let values = edges
        .windows(2)
        .zip(&days)
        .map(|(pair, days)| {
            entries
                .iter()
                .map(|entry| entry.overlap_hours(pair[0], pair[1]))
                .sum::<f64>()
                / days
        })
        .collect();
    BinnedSeries::without_errors(edges.to_vec(), values)
}

/// Display divisor for a summary: `ceil(0.1 * max(value + error))`, at least 1.
#[must_use]
pub fn display_scale(series: &BinnedSeries<NaiveDateTime>) -> f64 {
    let peak = series
        .values()
        .iter()
        .zip(series.errors())
        .map(|(value, error)| value + error)
        .filter(|peak| peak.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    (0.1 * peak).ceil().max(1.0)
}

/// Legend label of a summary drawn at `scale`, e.g. `push-ups (1 / 3 reps)`.
#[must_use]
pub fn amount_label(name: &str, unit: &str, scale: f64) -> String {
    if scale == 1.0 {
        format!("{name} ({unit})")
    } else {
        format!("{name} (1 / {scale:.0} {unit})")
    }
}

impl ActivityLog {
    /// Date-binned per-day amounts of one activity.
    ///
    /// Counting activities sum quantities; timing activities sum tracked
    /// hours. Returns `None` when the activity has no entries.
    pub fn amount_summary(
        &self,
        name: &str,
        binning: DateBinning,
    ) -> ManateeResult<Option<BinnedSeries<NaiveDateTime>>> {
        let series = match self.activity_kind(name)? {
            ActivityKind::Counting => {
                let entries = self.counting_entries(name)?;
                let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
                    return Ok(None);
                };
                let edges = binning.date_edges(first.date, last.date)?;
                counting_amounts(entries, &edges)?
            }
            ActivityKind::Timing => {
                let entries = self.timing_entries(name)?;
                let Some(first) = entries.first() else {
                    return Ok(None);
                };
                let last_end = entries
                    .iter()
                    .map(|entry| entry.end)
                    .max()
                    .unwrap_or(first.end);
                let edges = binning.date_edges(first.start.date(), last_end.date())?;
                timing_amounts(entries, &edges)?
            }
        };
        debug!(name, ?binning, bins = series.bin_count(), "built amount summary");
        Ok(Some(series))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{amount_label, bin_days};
    use crate::core::date_to_midnight;

    #[test]
    fn bins_shorter_than_a_day_are_rejected() {
        let day = NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid date");
        let midnight = date_to_midnight(day);
        let noon = day.and_hms_opt(12, 0, 0).expect("valid time");
        assert!(bin_days(&[midnight, noon]).is_err());
    }

    #[test]
    fn unscaled_label_shows_plain_unit() {
        assert_eq!(amount_label("run", "km", 1.0), "run (km)");
        assert_eq!(amount_label("run", "km", 3.0), "run (1 / 3 km)");
    }
}
