//! manatee: binned activity statistics and their plots.
//!
//! The crate keeps a strict split between the numeric histogram core, the
//! activity log it summarizes, the styled plotting layer and backend-agnostic
//! rendering.

pub mod core;
pub mod error;
pub mod hist;
pub mod log;
pub mod plot;
pub mod render;
pub mod summary;
pub mod telemetry;

pub use error::{ManateeError, ManateeResult};
pub use hist::{BinSpec, BinnedSeries, Binner, Histogram};
pub use log::ActivityLog;
pub use plot::{PlotSurface, Plotter, PlotterConfig, SeriesStyle};
