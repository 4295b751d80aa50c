use serde::{Deserialize, Serialize};

use crate::error::{ManateeError, ManateeResult};

/// Mapping mode of one plot axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisMode {
    /// Uniform spacing in raw data units.
    #[default]
    Linear,
    /// Uniform spacing in decade (`log10`) units; only values > 0 are mappable.
    Log,
}

impl AxisMode {
    /// Transforms a raw value into the axis' uniform space.
    ///
    /// Returns `None` when the value cannot be placed on this axis.
    #[must_use]
    pub fn transform(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self {
            Self::Linear => Some(value),
            Self::Log if value > 0.0 => Some(value.log10()),
            Self::Log => None,
        }
    }

    #[must_use]
    pub fn invert(self, transformed: f64) -> f64 {
        match self {
            Self::Linear => transformed,
            Self::Log => 10f64.powf(transformed),
        }
    }

    /// Whether `value` participates in autoscaling on this axis.
    #[must_use]
    pub fn accepts(self, value: f64) -> bool {
        self.transform(value).is_some()
    }
}

/// Padding applied when fitting an axis to data limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTuning {
    pub lower_padding_ratio: f64,
    pub upper_padding_ratio: f64,
}

impl Default for AxisTuning {
    fn default() -> Self {
        Self {
            lower_padding_ratio: 0.05,
            upper_padding_ratio: 0.05,
        }
    }
}

impl AxisTuning {
    #[must_use]
    pub fn flush() -> Self {
        Self {
            lower_padding_ratio: 0.0,
            upper_padding_ratio: 0.0,
        }
    }

    fn validate(self) -> ManateeResult<Self> {
        if !self.lower_padding_ratio.is_finite()
            || !self.upper_padding_ratio.is_finite()
            || self.lower_padding_ratio < 0.0
            || self.upper_padding_ratio < 0.0
        {
            return Err(ManateeError::InvalidData(
                "axis padding ratios must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Maps one data axis onto a pixel interval.
///
/// The pixel interval runs from `pixel_start` (domain start) to `pixel_end`
/// (domain end); a Y axis passes `bottom, top` so larger values map upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    mode: AxisMode,
    transformed_start: f64,
    transformed_end: f64,
    pixel_start: f64,
    pixel_end: f64,
}

impl AxisScale {
    pub fn new(
        mode: AxisMode,
        domain_start: f64,
        domain_end: f64,
        pixel_start: f64,
        pixel_end: f64,
    ) -> ManateeResult<Self> {
        let transformed_start = mode.transform(domain_start).ok_or_else(|| {
            ManateeError::InvalidData(format!(
                "axis domain start {domain_start} is not representable in {mode:?} mode"
            ))
        })?;
        let transformed_end = mode.transform(domain_end).ok_or_else(|| {
            ManateeError::InvalidData(format!(
                "axis domain end {domain_end} is not representable in {mode:?} mode"
            ))
        })?;
        if transformed_start == transformed_end {
            return Err(ManateeError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !pixel_start.is_finite() || !pixel_end.is_finite() || pixel_start == pixel_end {
            return Err(ManateeError::InvalidData(
                "scale pixel range must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            mode,
            transformed_start,
            transformed_end,
            pixel_start,
            pixel_end,
        })
    }

    /// Fits a scale to raw data limits, widening degenerate limits and applying
    /// padding in transformed space.
    pub fn fit(
        mode: AxisMode,
        limits: (f64, f64),
        tuning: AxisTuning,
        pixel_start: f64,
        pixel_end: f64,
    ) -> ManateeResult<Self> {
        let tuning = tuning.validate()?;
        let (lo, hi) = limits;
        let lo_t = mode.transform(lo).ok_or_else(|| {
            ManateeError::InvalidData(format!("axis limit {lo} is not mappable in {mode:?} mode"))
        })?;
        let hi_t = mode.transform(hi).ok_or_else(|| {
            ManateeError::InvalidData(format!("axis limit {hi} is not mappable in {mode:?} mode"))
        })?;
        let (mut lo_t, mut hi_t) = if lo_t <= hi_t { (lo_t, hi_t) } else { (hi_t, lo_t) };
        if lo_t == hi_t {
            let half = if lo_t == 0.0 { 0.5 } else { lo_t.abs() * 0.05 };
            lo_t -= half;
            hi_t += half;
        }
        let span = hi_t - lo_t;
        lo_t -= span * tuning.lower_padding_ratio;
        hi_t += span * tuning.upper_padding_ratio;

        Self::new(
            mode,
            mode.invert(lo_t),
            mode.invert(hi_t),
            pixel_start,
            pixel_end,
        )
    }

    #[must_use]
    pub fn mode(self) -> AxisMode {
        self.mode
    }

    /// Raw-unit domain covered by this scale.
    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (
            self.mode.invert(self.transformed_start),
            self.mode.invert(self.transformed_end),
        )
    }

    /// Maps a raw value to a pixel coordinate, or `None` if not mappable.
    #[must_use]
    pub fn to_pixel(self, value: f64) -> Option<f64> {
        let transformed = self.mode.transform(value)?;
        let normalized =
            (transformed - self.transformed_start) / (self.transformed_end - self.transformed_start);
        Some(self.pixel_start + normalized * (self.pixel_end - self.pixel_start))
    }

    pub fn from_pixel(self, pixel: f64) -> ManateeResult<f64> {
        if !pixel.is_finite() {
            return Err(ManateeError::InvalidData("pixel must be finite".to_owned()));
        }
        let normalized = (pixel - self.pixel_start) / (self.pixel_end - self.pixel_start);
        Ok(self.mode.invert(
            self.transformed_start + normalized * (self.transformed_end - self.transformed_start),
        ))
    }
}
