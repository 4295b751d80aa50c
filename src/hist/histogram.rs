use std::ops::{Add, Deref, Div, Mul, Sub};

use serde::Serialize;

use crate::error::ManateeResult;
use crate::hist::{BinEdge, BinnedSeries};

/// Binned weighted counts.
///
/// Dereferences to [`BinnedSeries`], so bin-wise multiplication and division
/// against another series (`try_mul`, `try_div`) yield a plain series. Adding
/// or subtracting a scalar also yields a plain series, while scaling by a
/// scalar and combining two histograms keep the histogram type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Histogram<X: BinEdge = f64> {
    series: BinnedSeries<X>,
}

impl<X: BinEdge> Histogram<X> {
    pub fn new(bins: Vec<X>, values: Vec<f64>, errors: Vec<f64>) -> ManateeResult<Self> {
        BinnedSeries::new(bins, values, errors).map(Self::from_series)
    }

    #[must_use]
    pub fn from_series(series: BinnedSeries<X>) -> Self {
        Self { series }
    }

    #[must_use]
    pub fn as_series(&self) -> &BinnedSeries<X> {
        &self.series
    }

    #[must_use]
    pub fn into_series(self) -> BinnedSeries<X> {
        self.series
    }

    pub fn try_add(&self, other: &Self) -> ManateeResult<Self> {
        self.series.try_add(&other.series).map(Self::from_series)
    }

    pub fn try_sub(&self, other: &Self) -> ManateeResult<Self> {
        self.series.try_sub(&other.series).map(Self::from_series)
    }

    /// Sum of the bin values.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.series.values().iter().sum()
    }

    /// Sum of value times bin width.
    #[must_use]
    pub fn integral(&self) -> f64 {
        self.series
            .values()
            .iter()
            .zip(self.series.bin_widths())
            .map(|(value, width)| value * width)
            .sum()
    }

    /// Copy normalized so the values sum to 1.
    #[must_use]
    pub fn sum_normed(&self) -> Self {
        self / self.sum()
    }

    /// Copy normalized so the integral is 1.
    #[must_use]
    pub fn integral_normed(&self) -> Self {
        self / self.integral()
    }

    /// Running sum from the left. Errors are not propagated and stay zero.
    #[must_use]
    pub fn cumulative_right(&self) -> BinnedSeries<X> {
        let values = running_sum(self.series.values());
        zero_error_series(self.series.bins(), values)
    }

    /// Total minus the running sum from the left. Errors stay zero.
    #[must_use]
    pub fn cumulative_left(&self) -> BinnedSeries<X> {
        let total = self.sum();
        let values = running_sum(self.series.values())
            .into_iter()
            .map(|partial| total - partial)
            .collect();
        zero_error_series(self.series.bins(), values)
    }

    /// Fraction of `base` kept in `self`, bin by bin.
    ///
    /// `self` is the kept subset and `base` the superset. Values follow
    /// `try_div`; errors use binomial propagation over the kept and rejected
    /// counts instead of the independent-ratio rule.
    pub fn efficiency(&self, base: &Self) -> ManateeResult<BinnedSeries<X>> {
        let rejected = base.try_sub(self)?;
        let ratio = self.series.try_div(&base.series)?;

        let errors = self
            .series
            .values()
            .iter()
            .zip(self.series.errors())
            .zip(rejected.values().iter().zip(rejected.errors()))
            .map(|((kept, kept_error), (rejected, rejected_error))| {
                let total_squared = (kept + rejected).powi(2);
                let kept_term = rejected / total_squared * kept_error;
                let rejected_term = -kept / total_squared * rejected_error;
                (kept_term.powi(2) + rejected_term.powi(2)).sqrt()
            })
            .collect();

        Ok(ratio.with_errors(errors))
    }
}

impl<X: BinEdge> Deref for Histogram<X> {
    type Target = BinnedSeries<X>;

    fn deref(&self) -> &Self::Target {
        &self.series
    }
}

impl<X: BinEdge> From<Histogram<X>> for BinnedSeries<X> {
    fn from(hist: Histogram<X>) -> Self {
        hist.series
    }
}

impl<X: BinEdge> Add<f64> for &Histogram<X> {
    type Output = BinnedSeries<X>;

    fn add(self, rhs: f64) -> Self::Output {
        &self.series + rhs
    }
}

impl<X: BinEdge> Sub<f64> for &Histogram<X> {
    type Output = BinnedSeries<X>;

    fn sub(self, rhs: f64) -> Self::Output {
        &self.series - rhs
    }
}

impl<X: BinEdge> Mul<f64> for &Histogram<X> {
    type Output = Histogram<X>;

    fn mul(self, rhs: f64) -> Self::Output {
        Histogram::from_series(&self.series * rhs)
    }
}

impl<X: BinEdge> Div<f64> for &Histogram<X> {
    type Output = Histogram<X>;

    fn div(self, rhs: f64) -> Self::Output {
        Histogram::from_series(&self.series / rhs)
    }
}

impl<X: BinEdge> Mul<&Histogram<X>> for f64 {
    type Output = Histogram<X>;

    fn mul(self, rhs: &Histogram<X>) -> Self::Output {
        rhs * self
    }
}

fn running_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, value| {
            *acc += value;
            Some(*acc)
        })
        .collect()
}

fn zero_error_series<X: BinEdge>(bins: &[X], values: Vec<f64>) -> BinnedSeries<X> {
    let errors = vec![0.0; values.len()];
    BinnedSeries::from_parts(bins.to_vec(), values, errors)
}
