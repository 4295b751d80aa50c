use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ManateeError, ManateeResult};
use crate::hist::binned::validate_edges;
use crate::hist::{BinEdge, BinnedSeries, Histogram};

/// Placeholder sample used to derive edges when no usable sample remains.
const PLACEHOLDER_AXIS_VALUE: f64 = 1.0;

/// Half-width added on each side of a degenerate `lo == hi` range.
const DEGENERATE_RANGE_PAD: f64 = 0.5;

/// How bin edges are chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BinSpec<X = f64> {
    /// `bins` equal-width bins (in axis space) over `range`, or over the
    /// sample min/max when no range is given. Edge types with an axis grid
    /// (calendar dates) get whole-step widths and at least one step of range.
    Count { bins: usize, range: Option<(X, X)> },
    /// Explicit, strictly increasing edges.
    Edges(Vec<X>),
}

impl<X: BinEdge> BinSpec<X> {
    #[must_use]
    pub fn count(bins: usize) -> Self {
        Self::Count { bins, range: None }
    }

    #[must_use]
    pub fn count_in(bins: usize, lo: X, hi: X) -> Self {
        Self::Count {
            bins,
            range: Some((lo, hi)),
        }
    }

    #[must_use]
    pub fn edges(edges: Vec<X>) -> Self {
        Self::Edges(edges)
    }

    /// Resolves the concrete edges for samples spanning `[data_min, data_max]`
    /// in axis space.
    fn resolve(&self, data_min: f64, data_max: f64) -> ManateeResult<Vec<X>> {
        let edges = match self {
            Self::Edges(edges) => edges.clone(),
            Self::Count { bins, range } => {
                if *bins == 0 {
                    return Err(ManateeError::InvalidBins(
                        "bin count must be > 0".to_owned(),
                    ));
                }
                let (mut lo, mut hi) = match range {
                    Some((lo, hi)) => (lo.to_axis(), hi.to_axis()),
                    None => (data_min, data_max),
                };
                if !lo.is_finite() || !hi.is_finite() {
                    return Err(ManateeError::InvalidBins(format!(
                        "bin range must be finite, got ({lo}, {hi})"
                    )));
                }
                if lo > hi {
                    return Err(ManateeError::InvalidBins(
                        "bin range max must not be smaller than min".to_owned(),
                    ));
                }
                let axis_edges = match X::AXIS_GRID {
                    Some(step) => grid_edges(lo, hi, *bins, step),
                    None => {
                        if lo == hi {
                            lo -= DEGENERATE_RANGE_PAD;
                            hi += DEGENERATE_RANGE_PAD;
                        }
                        linspace(lo, hi, *bins)
                    }
                };
                axis_edges
                    .into_iter()
                    .map(|value| {
                        X::from_axis(value).ok_or_else(|| {
                            ManateeError::InvalidBins(format!(
                                "edge {value} cannot be represented on this axis"
                            ))
                        })
                    })
                    .collect::<ManateeResult<Vec<X>>>()?
            }
        };
        validate_edges(&edges)?;
        Ok(edges)
    }
}

impl Default for BinSpec<f64> {
    fn default() -> Self {
        Self::count(50)
    }
}

/// Builds [`Histogram`]s from raw samples and optional weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Binner<X = f64> {
    spec: BinSpec<X>,
}

impl Default for Binner<f64> {
    fn default() -> Self {
        Self::new(BinSpec::default())
    }
}

impl<X: BinEdge> Binner<X> {
    #[must_use]
    pub fn new(spec: BinSpec<X>) -> Self {
        Self { spec }
    }

    #[must_use]
    pub fn spec(&self) -> &BinSpec<X> {
        &self.spec
    }

    pub fn hist_unweighted(&self, samples: &[X]) -> ManateeResult<Histogram<X>> {
        self.hist(samples, None)
    }

    /// Bins `samples`, each weighted by the matching entry of `weights`
    /// (unit weights when `None`).
    ///
    /// Pairs where either the sample or the weight is non-finite are dropped.
    /// Values are summed weights; errors are `sqrt(Σ w²)` per bin. When no
    /// pair survives, the edges come from a single zero-weight placeholder
    /// sample and every value and error is zero. Samples outside the outer
    /// edges are ignored; the last bin is closed on the right.
    pub fn hist(&self, samples: &[X], weights: Option<&[f64]>) -> ManateeResult<Histogram<X>> {
        if let Some(weights) = weights {
            if weights.len() != samples.len() {
                return Err(ManateeError::InvalidData(format!(
                    "expected {} weights, got {}",
                    samples.len(),
                    weights.len()
                )));
            }
        }

        let pairs: Vec<(f64, f64)> = samples
            .iter()
            .enumerate()
            .map(|(i, sample)| (*sample, weights.map_or(1.0, |weights| weights[i])))
            .filter(|(sample, weight)| sample.is_finite() && weight.is_finite())
            .map(|(sample, weight)| (sample.to_axis(), weight))
            .collect();
        let dropped_non_finite = samples.len() - pairs.len();

        if pairs.is_empty() {
            let edges = self
                .spec
                .resolve(PLACEHOLDER_AXIS_VALUE, PLACEHOLDER_AXIS_VALUE)?;
            let bin_count = edges.len() - 1;
            debug!(
                samples = samples.len(),
                dropped_non_finite,
                bins = bin_count,
                "built empty histogram from placeholder edges"
            );
            return Ok(Histogram::from_series(BinnedSeries::from_parts(
                edges,
                vec![0.0; bin_count],
                vec![0.0; bin_count],
            )));
        }

        let (data_min, data_max) = pairs.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), (sample, _)| (min.min(*sample), max.max(*sample)),
        );
        let edges = self.spec.resolve(data_min, data_max)?;
        let axis_edges: Vec<f64> = edges.iter().map(|edge| edge.to_axis()).collect();
        let bin_count = edges.len() - 1;
        let first = axis_edges[0];
        let last = axis_edges[bin_count];

        let mut values = vec![0.0; bin_count];
        let mut sum_w2 = vec![0.0; bin_count];
        let mut out_of_range = 0usize;
        for (sample, weight) in &pairs {
            if *sample < first || *sample > last {
                out_of_range += 1;
                continue;
            }
            let index = axis_edges
                .partition_point(|edge| *edge <= *sample)
                .saturating_sub(1)
                .min(bin_count - 1);
            values[index] += weight;
            sum_w2[index] += weight * weight;
        }
        if out_of_range > 0 {
            trace!(out_of_range, first, last, "dropped samples outside bin range");
        }

        let errors = sum_w2.into_iter().map(f64::sqrt).collect();
        debug!(
            samples = samples.len(),
            dropped_non_finite,
            out_of_range,
            bins = bin_count,
            "built histogram"
        );
        Ok(Histogram::from_series(BinnedSeries::from_parts(
            edges, values, errors,
        )))
    }
}

fn linspace(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let step_count = bins as f64;
    (0..=bins)
        .map(|i| {
            if i == bins {
                hi
            } else {
                lo + (hi - lo) * (i as f64 / step_count)
            }
        })
        .collect()
}

/// Edges on a grid of `step` starting at the step containing `lo`. The range
/// covers at least one step and each bin spans a whole number of steps, so
/// the last edge may lie past `hi`.
fn grid_edges(lo: f64, hi: f64, bins: usize, step: f64) -> Vec<f64> {
    let first = (lo / step).floor();
    let span = ((hi / step).floor() - first).max(1.0);
    let width = (span / bins as f64).ceil().max(1.0);
    (0..=bins)
        .map(|i| (first + width * i as f64) * step)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{BinSpec, Binner, grid_edges, linspace};

    #[test]
    fn linspace_ends_exactly_on_upper_bound() {
        let edges = linspace(0.0, 1.0, 3);
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0], 0.0);
        assert_eq!(edges[3], 1.0);
    }

    #[test]
    fn sample_on_last_edge_lands_in_last_bin() {
        let binner = Binner::new(BinSpec::count_in(2, 0.0, 2.0));
        let hist = binner.hist_unweighted(&[2.0, 0.0]).expect("hist");
        assert_eq!(hist.values(), &[1.0, 1.0]);
    }

    #[test]
    fn grid_edges_round_width_up_to_whole_steps() {
        assert_eq!(grid_edges(0.0, 10.0, 4, 2.0), vec![0.0, 4.0, 8.0, 12.0, 16.0]);
        assert_eq!(grid_edges(3.0, 3.0, 2, 2.0), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn zero_bins_are_rejected() {
        let binner = Binner::new(BinSpec::count(0));
        assert!(binner.hist_unweighted(&[1.0]).is_err());
    }
}
