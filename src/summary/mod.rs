//! Date-binned per-day amounts and calendar blocks of logged activities.

mod amounts;
mod binning;
mod blocks;

pub use amounts::{amount_label, counting_amounts, display_scale, timing_amounts};
pub use binning::DateBinning;
pub use blocks::{
    ALPHA_LEVELS, ActivityBlocks, DayBlock, TIMING_BLOCK_ALPHA, counting_blocks, counting_lane,
    draw_blocks, timing_blocks,
};
