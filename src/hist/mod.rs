//! Binned series, histograms and the histogram builder.

mod binned;
mod binner;
mod edge;
mod histogram;

pub use binned::BinnedSeries;
pub use binner::{BinSpec, Binner};
pub use edge::BinEdge;
pub use histogram::Histogram;
