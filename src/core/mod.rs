pub mod primitives;
pub mod scale;
pub mod types;

pub use primitives::{
    date_to_midnight, datetime_to_unix_seconds, naive_to_unix_seconds, time_delta_to_seconds,
    unix_seconds_to_datetime, unix_seconds_to_naive,
};
pub use scale::{AxisMode, AxisScale, AxisTuning};
pub use types::{PlotRect, Viewport};
