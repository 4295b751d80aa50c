use std::ops::{Add, Div, Mul, Sub};

use serde::Serialize;

use crate::error::{ManateeError, ManateeResult};
use crate::hist::BinEdge;

/// Sequence of bin edges with one value and one error per bin.
///
/// Invariants: `values.len() == errors.len() == bins.len() - 1`, edges are
/// strictly increasing, errors are non-negative (NaN is tolerated because
/// ratio arithmetic may produce it). Every operation returns a new series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedSeries<X: BinEdge = f64> {
    bins: Vec<X>,
    values: Vec<f64>,
    errors: Vec<f64>,
}

impl<X: BinEdge> BinnedSeries<X> {
    pub fn new(bins: Vec<X>, values: Vec<f64>, errors: Vec<f64>) -> ManateeResult<Self> {
        validate_edges(&bins)?;
        let bin_count = bins.len() - 1;
        if values.len() != bin_count {
            return Err(ManateeError::InvalidData(format!(
                "expected {bin_count} values for {} bin edges, got {}",
                bins.len(),
                values.len()
            )));
        }
        if errors.len() != bin_count {
            return Err(ManateeError::InvalidData(format!(
                "expected {bin_count} errors for {} bin edges, got {}",
                bins.len(),
                errors.len()
            )));
        }
        if errors.iter().any(|error| *error < 0.0) {
            return Err(ManateeError::InvalidData(
                "bin errors must be >= 0".to_owned(),
            ));
        }

        Ok(Self {
            bins,
            values,
            errors,
        })
    }

    /// Creates a series whose errors are all zero.
    pub fn without_errors(bins: Vec<X>, values: Vec<f64>) -> ManateeResult<Self> {
        let errors = vec![0.0; values.len()];
        Self::new(bins, values, errors)
    }

    /// Assembles a series from parts that already satisfy the invariants.
    pub(crate) fn from_parts(bins: Vec<X>, values: Vec<f64>, errors: Vec<f64>) -> Self {
        debug_assert_eq!(values.len() + 1, bins.len());
        debug_assert_eq!(errors.len(), values.len());
        Self {
            bins,
            values,
            errors,
        }
    }

    #[must_use]
    pub fn bins(&self) -> &[X] {
        &self.bins
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.values.len()
    }

    /// Whether both series share exactly the same bin edges.
    #[must_use]
    pub fn bins_match(&self, other: &Self) -> bool {
        self.bins.len() == other.bins.len()
            && self
                .bins
                .iter()
                .zip(&other.bins)
                .all(|(left, right)| left == right)
    }

    #[must_use]
    pub fn bin_centers(&self) -> Vec<X::Center> {
        self.bins
            .windows(2)
            .map(|pair| X::midpoint(pair[0], pair[1]))
            .collect()
    }

    /// Bin widths in axis units (seconds for time-valued edges).
    #[must_use]
    pub fn bin_widths(&self) -> Vec<f64> {
        self.bins
            .windows(2)
            .map(|pair| pair[1].to_axis() - pair[0].to_axis())
            .collect()
    }

    pub fn try_add(&self, other: &Self) -> ManateeResult<Self> {
        self.ensure_compatible(other)?;
        Ok(self.combine(other, |v1, v2| v1 + v2, |_, e1, _, e2| e1.hypot(e2)))
    }

    /// Subtracts `other` bin by bin.
    ///
    /// Errors combine as a quadrature sum, the same as for addition.
    pub fn try_sub(&self, other: &Self) -> ManateeResult<Self> {
        self.ensure_compatible(other)?;
        Ok(self.combine(other, |v1, v2| v1 - v2, |_, e1, _, e2| e1.hypot(e2)))
    }

    /// Multiplies bin by bin, propagating relative errors in quadrature.
    pub fn try_mul(&self, other: &Self) -> ManateeResult<Self> {
        self.ensure_compatible(other)?;
        Ok(self.combine(other, |v1, v2| v1 * v2, relative_error(|v1, v2| v1 * v2)))
    }

    /// Divides bin by bin, propagating relative errors in quadrature.
    ///
    /// Empty bins are not guarded: NaN and infinities propagate.
    pub fn try_div(&self, other: &Self) -> ManateeResult<Self> {
        self.ensure_compatible(other)?;
        Ok(self.combine(other, |v1, v2| v1 / v2, relative_error(|v1, v2| v1 / v2)))
    }

    pub(crate) fn ensure_compatible(&self, other: &Self) -> ManateeResult<()> {
        if self.bins_match(other) {
            Ok(())
        } else {
            Err(ManateeError::IncompatibleBins {
                left: self.bins.len(),
                right: other.bins.len(),
            })
        }
    }

    pub(crate) fn with_errors(mut self, errors: Vec<f64>) -> Self {
        debug_assert_eq!(errors.len(), self.values.len());
        self.errors = errors;
        self
    }

    fn combine(
        &self,
        other: &Self,
        value_op: impl Fn(f64, f64) -> f64,
        error_op: impl Fn(f64, f64, f64, f64) -> f64,
    ) -> Self {
        let mut values = Vec::with_capacity(self.values.len());
        let mut errors = Vec::with_capacity(self.values.len());
        for i in 0..self.values.len() {
            let (v1, e1) = (self.values[i], self.errors[i]);
            let (v2, e2) = (other.values[i], other.errors[i]);
            values.push(value_op(v1, v2));
            errors.push(error_op(v1, e1, v2, e2));
        }
        Self::from_parts(self.bins.clone(), values, errors)
    }

    pub(crate) fn shifted(&self, offset: f64) -> Self {
        Self::from_parts(
            self.bins.clone(),
            self.values.iter().map(|value| value + offset).collect(),
            self.errors.clone(),
        )
    }

    pub(crate) fn scaled(&self, factor: f64) -> Self {
        Self::from_parts(
            self.bins.clone(),
            self.values.iter().map(|value| value * factor).collect(),
            self.errors.iter().map(|error| error * factor.abs()).collect(),
        )
    }

    pub(crate) fn divided(&self, divisor: f64) -> Self {
        Self::from_parts(
            self.bins.clone(),
            self.values.iter().map(|value| value / divisor).collect(),
            self.errors.iter().map(|error| error / divisor.abs()).collect(),
        )
    }
}

fn relative_error(
    value_op: impl Fn(f64, f64) -> f64,
) -> impl Fn(f64, f64, f64, f64) -> f64 {
    move |v1, e1, v2, e2| {
        let value = value_op(v1, v2);
        (value * ((e1 / v1).powi(2) + (e2 / v2).powi(2)).sqrt()).abs()
    }
}

pub(crate) fn validate_edges<X: BinEdge>(bins: &[X]) -> ManateeResult<()> {
    if bins.len() < 2 {
        return Err(ManateeError::InvalidBins(
            "at least two bin edges are required".to_owned(),
        ));
    }
    if bins.iter().any(|edge| !edge.is_finite()) {
        return Err(ManateeError::InvalidBins(
            "bin edges must be finite".to_owned(),
        ));
    }
    // `!(a < b)` also rejects unordered pairs.
    if bins.windows(2).any(|pair| !(pair[0] < pair[1])) {
        return Err(ManateeError::InvalidBins(
            "bin edges must increase strictly".to_owned(),
        ));
    }
    Ok(())
}

macro_rules! impl_scalar_ops {
    ($target:ty) => {
        impl<X: BinEdge> Add<f64> for $target {
            type Output = BinnedSeries<X>;

            fn add(self, rhs: f64) -> Self::Output {
                self.shifted(rhs)
            }
        }

        impl<X: BinEdge> Sub<f64> for $target {
            type Output = BinnedSeries<X>;

            fn sub(self, rhs: f64) -> Self::Output {
                self.shifted(-rhs)
            }
        }

        impl<X: BinEdge> Mul<f64> for $target {
            type Output = BinnedSeries<X>;

            fn mul(self, rhs: f64) -> Self::Output {
                self.scaled(rhs)
            }
        }

        impl<X: BinEdge> Div<f64> for $target {
            type Output = BinnedSeries<X>;

            fn div(self, rhs: f64) -> Self::Output {
                self.divided(rhs)
            }
        }

        impl<X: BinEdge> Mul<$target> for f64 {
            type Output = BinnedSeries<X>;

            fn mul(self, rhs: $target) -> Self::Output {
                rhs.scaled(self)
            }
        }
    };
}

impl_scalar_ops!(BinnedSeries<X>);
impl_scalar_ops!(&BinnedSeries<X>);

#[cfg(test)]
mod tests {
    use super::BinnedSeries;
    use crate::error::ManateeError;

    fn series(values: &[f64], errors: &[f64]) -> BinnedSeries {
        let bins = (0..=values.len()).map(|i| i as f64).collect();
        BinnedSeries::new(bins, values.to_vec(), errors.to_vec()).expect("valid series")
    }

    #[test]
    fn constructor_rejects_length_mismatch() {
        let err = BinnedSeries::new(vec![0.0, 1.0, 2.0], vec![1.0], vec![0.0])
            .expect_err("values too short");
        assert!(matches!(err, ManateeError::InvalidData(_)));
    }

    #[test]
    fn constructor_rejects_non_monotonic_edges() {
        let err = BinnedSeries::without_errors(vec![0.0, 2.0, 2.0], vec![1.0, 1.0])
            .expect_err("duplicate edge");
        assert!(matches!(err, ManateeError::InvalidBins(_)));
    }

    #[test]
    fn constructor_rejects_negative_errors() {
        let err = BinnedSeries::new(vec![0.0, 1.0], vec![1.0], vec![-0.5])
            .expect_err("negative error");
        assert!(format!("{err}").contains(">= 0"));
    }

    #[test]
    fn mismatched_bins_are_reported() {
        let a = series(&[1.0, 2.0], &[0.0, 0.0]);
        let b = BinnedSeries::without_errors(vec![0.0, 1.0, 3.0], vec![1.0, 2.0]).expect("series");
        let err = a.try_add(&b).expect_err("bins differ");
        assert!(matches!(err, ManateeError::IncompatibleBins { .. }));
    }

    #[test]
    fn subtraction_combines_errors_in_quadrature() {
        let a = series(&[5.0], &[3.0]);
        let b = series(&[2.0], &[4.0]);
        let diff = a.try_sub(&b).expect("compatible");
        assert_eq!(diff.values(), &[3.0]);
        assert!((diff.errors()[0] - 5.0).abs() <= 1e-12);
    }

    #[test]
    fn scalar_multiplication_uses_absolute_factor_for_errors() {
        let a = series(&[2.0, -1.0], &[0.5, 0.25]);
        let scaled = &a * -2.0;
        assert_eq!(scaled.values(), &[-4.0, 2.0]);
        assert_eq!(scaled.errors(), &[1.0, 0.5]);
        assert_eq!(-2.0 * &a, scaled);
    }

    #[test]
    fn scalar_shift_keeps_errors() {
        let a = series(&[2.0, 3.0], &[0.5, 0.25]);
        let shifted = &a - 1.0;
        assert_eq!(shifted.values(), &[1.0, 2.0]);
        assert_eq!(shifted.errors(), a.errors());
    }

    #[test]
    fn division_by_empty_bin_propagates_non_finite_values() {
        let a = series(&[1.0], &[1.0]);
        let b = series(&[0.0], &[0.0]);
        let ratio = a.try_div(&b).expect("compatible");
        assert!(ratio.values()[0].is_infinite());
        assert!(!ratio.errors()[0].is_finite());
    }

    #[test]
    fn numeric_centers_and_widths_follow_edges() {
        let s = BinnedSeries::without_errors(vec![0.0, 1.0, 4.0], vec![1.0, 1.0]).expect("series");
        assert_eq!(s.bin_centers(), vec![0.5, 2.5]);
        assert_eq!(s.bin_widths(), vec![1.0, 3.0]);
    }
}
