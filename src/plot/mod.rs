//! Styled, batched drawing of binned series onto a two-axis plot surface.

mod legend;
mod plotter;
pub mod style;
mod surface;

pub use legend::{Legend, LegendConfig, LegendEntry, LegendPlacement};
pub use plotter::{DrawnSeries, PlotEntry, Plotter, PlotterConfig};
pub use style::{DEFAULT_COLOR_CYCLE, SeriesStyle, StyleOverrides, StyleValue};
pub use surface::{Artist, AxisTarget, Axes, PlotSurface, Stroke, SurfaceLayout};
