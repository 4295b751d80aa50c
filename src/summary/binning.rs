use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::date_to_midnight;
use crate::error::{ManateeError, ManateeResult};

/// Calendar grouping of days into summary bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateBinning {
    /// Consecutive bins of `n` days starting at the first date.
    EveryDays(u32),
    /// Monday-aligned weeks.
    Weekly,
    /// Calendar months.
    Monthly,
}

impl Default for DateBinning {
    fn default() -> Self {
        Self::EveryDays(1)
    }
}

impl DateBinning {
    /// Midnight edges covering `first..=last`.
    ///
    /// The first edge is `first` (rewound to Monday for weekly bins and to
    /// the 1st for monthly bins); edges are appended until one lies past
    /// midnight of `last`.
    pub fn date_edges(self, first: NaiveDate, last: NaiveDate) -> ManateeResult<Vec<NaiveDateTime>> {
        if last < first {
            return Err(ManateeError::InvalidData(format!(
                "date range ends ({last}) before it starts ({first})"
            )));
        }
        let start = match self {
            Self::EveryDays(0) => {
                return Err(ManateeError::InvalidBins(
                    "days per bin must be > 0".to_owned(),
                ));
            }
            Self::EveryDays(_) => first,
            Self::Weekly => first
                .checked_sub_days(Days::new(u64::from(first.weekday().num_days_from_monday())))
                .ok_or_else(|| out_of_range(first))?,
            Self::Monthly => first.with_day(1).ok_or_else(|| out_of_range(first))?,
        };

        let last_midnight = date_to_midnight(last);
        let mut edge = start;
        let mut edges = vec![date_to_midnight(edge)];
        while date_to_midnight(edge) <= last_midnight {
            edge = self.next_edge(edge).ok_or_else(|| out_of_range(edge))?;
            edges.push(date_to_midnight(edge));
        }
        Ok(edges)
    }

    fn next_edge(self, edge: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::EveryDays(days) => edge.checked_add_days(Days::new(u64::from(days))),
            Self::Weekly => edge.checked_add_days(Days::new(7)),
            Self::Monthly => edge.checked_add_months(Months::new(1)),
        }
    }
}

fn out_of_range(date: NaiveDate) -> ManateeError {
    ManateeError::InvalidBins(format!("bin edge near {date} is out of the calendar range"))
}
