use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{date_to_midnight, time_delta_to_seconds};
use crate::error::ManateeResult;
use crate::hist::BinEdge;
use crate::log::{ActivityKind, ActivityLog, CountingEntry, TimingEntry};
use crate::plot::{Artist, AxisTarget, PlotSurface};
use crate::render::Color;

/// Number of opacity steps counting blocks are rounded down to.
pub const ALPHA_LEVELS: u32 = 20;
/// Opacity of every timing block.
pub const TIMING_BLOCK_ALPHA: f64 = 0.6;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const LANE_PITCH: f64 = 2.0;

/// One day-wide filled block of the calendar plot.
///
/// The y span is in hours of the day for timing blocks and a lane below the
/// hour axis for counting blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayBlock {
    pub day: NaiveDate,
    pub y_low: f64,
    pub y_high: f64,
    pub alpha: f64,
}

impl DayBlock {
    /// Horizontal extent in axis units, midnight to the next midnight.
    #[must_use]
    pub fn x_range(self) -> (f64, f64) {
        let start = self.day.to_axis();
        (start, start + SECONDS_PER_DAY)
    }
}

/// Blocks of one activity, as laid out by [`ActivityLog::block_summary`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityBlocks {
    pub name: String,
    pub kind: ActivityKind,
    pub blocks: Vec<DayBlock>,
}

/// Vertical span of counting lane `lane` out of `lane_count`.
///
/// Lanes are two units tall with a one unit gap, stacked below zero so the
/// last lane ends at `-1`.
#[must_use]
pub fn counting_lane(lane: usize, lane_count: usize) -> (f64, f64) {
    let offset = LANE_PITCH * lane_count.saturating_sub(lane + 1) as f64;
    (-offset - 3.0, -offset - 1.0)
}

/// One block per entry, shaded by its share of the largest quantity.
///
/// Entries whose share falls outside `[0, 1]` get no block.
#[must_use]
pub fn counting_blocks(entries: &[CountingEntry], lane: (f64, f64)) -> Vec<DayBlock> {
    let max = entries
        .iter()
        .map(|entry| entry.n)
        .fold(f64::NEG_INFINITY, f64::max);
    entries
        .iter()
        .filter_map(|entry| {
            Some(DayBlock {
                day: entry.date,
                y_low: lane.0,
                y_high: lane.1,
                alpha: bucket_alpha(entry.n / max)?,
            })
        })
        .collect()
}

/// Hour-of-day spans of every interval, split at each midnight it crosses.
#[must_use]
pub fn timing_blocks(entries: &[TimingEntry]) -> Vec<DayBlock> {
    let mut blocks = Vec::new();
    for entry in entries {
        let mut day = entry.start.date();
        loop {
            let midnight = date_to_midnight(day);
            let next_midnight = day.succ_opt().map(date_to_midnight);
            let piece_end = next_midnight.map_or(entry.end, |next| entry.end.min(next));
            let y_low = hours_since(midnight, entry.start.max(midnight));
            let y_high = hours_since(midnight, piece_end);
            if y_high > y_low {
                blocks.push(DayBlock {
                    day,
                    y_low,
                    y_high,
                    alpha: TIMING_BLOCK_ALPHA,
                });
            }
            match next_midnight {
                Some(next) if next < entry.end => day = next.date(),
                _ => break,
            }
        }
    }
    blocks
}

/// Adds `blocks` to the `target` axes as filled rectangles in `color`.
pub fn draw_blocks(
    surface: &mut PlotSurface,
    target: AxisTarget,
    blocks: &[DayBlock],
    color: Color,
) {
    let axes = surface.axes_mut(target);
    for block in blocks {
        let (x0, x1) = block.x_range();
        axes.include_x(x0);
        axes.include_x(x1);
        axes.include_y(block.y_low);
        axes.include_y(block.y_high);
        axes.add_artist(Artist::Block {
            x0,
            x1,
            y0: block.y_low,
            y1: block.y_high,
            color: color.with_alpha(block.alpha),
            zorder: 0.0,
        });
    }
}

fn bucket_alpha(fraction: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&fraction) {
        return None;
    }
    let levels = f64::from(ALPHA_LEVELS);
    Some((fraction * levels).floor() / levels)
}

fn hours_since(midnight: NaiveDateTime, time: NaiveDateTime) -> f64 {
    time_delta_to_seconds(time - midnight) / SECONDS_PER_HOUR
}

impl ActivityLog {
    /// Calendar blocks of every activity.
    ///
    /// Counting activities take one lane each in name order, including
    /// activities without entries; timing activities follow.
    pub fn block_summary(&self) -> ManateeResult<Vec<ActivityBlocks>> {
        let lane_count = self.counting_activities().count();
        let mut summary = Vec::new();
        for (lane, activity) in self.counting_activities().enumerate() {
            let entries = self.counting_entries(&activity.name)?;
            summary.push(ActivityBlocks {
                name: activity.name.clone(),
                kind: ActivityKind::Counting,
                blocks: counting_blocks(entries, counting_lane(lane, lane_count)),
            });
        }
        for activity in self.timing_activities() {
            let entries = self.timing_entries(&activity.name)?;
            summary.push(ActivityBlocks {
                name: activity.name.clone(),
                kind: ActivityKind::Timing,
                blocks: timing_blocks(entries),
            });
        }
        debug!(
            activities = summary.len(),
            blocks = summary.iter().map(|entry| entry.blocks.len()).sum::<usize>(),
            "built block summary"
        );
        Ok(summary)
    }
}
