use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::AxisMode;
use crate::error::ManateeResult;
use crate::hist::{BinEdge, BinnedSeries};
use crate::plot::legend::{Legend, LegendConfig, LegendEntry};
use crate::plot::style::{SeriesStyle, StyleOverrides};
use crate::plot::surface::{Artist, AxisTarget, PlotSurface, Stroke};
use crate::render::Color;

/// Z-order offset of the half-bin connectors relative to their series.
const CONNECTOR_ZORDER_OFFSET: f64 = 0.01;
/// The log-y floor sits at this fraction of the smallest positive value.
const LOG_FLOOR_FRACTION: f64 = 0.1;

/// Axis behavior of a [`Plotter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlotterConfig {
    /// Log y scale on the main axes.
    pub log: bool,
    /// Log y scale on the twin axes; follows `log` when unset.
    pub twin_log: Option<bool>,
    /// Treat x values as decades and draw `10^x` on a log x axis.
    pub expx: bool,
}

impl PlotterConfig {
    #[must_use]
    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    #[must_use]
    pub fn with_twin_log(mut self, twin_log: bool) -> Self {
        self.twin_log = Some(twin_log);
        self
    }

    #[must_use]
    pub fn with_expx(mut self, expx: bool) -> Self {
        self.expx = expx;
        self
    }

    #[must_use]
    pub fn resolved_twin_log(self) -> bool {
        self.twin_log.unwrap_or(self.log)
    }

    #[must_use]
    pub fn log_for(self, target: AxisTarget) -> bool {
        match target {
            AxisTarget::Main => self.log,
            AxisTarget::Twin => self.resolved_twin_log(),
        }
    }
}

/// One queued series with its resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotEntry<X: BinEdge = f64> {
    pub series: BinnedSeries<X>,
    pub style: SeriesStyle,
    pub target: AxisTarget,
}

/// Handle describing a series after it was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnSeries {
    pub label: String,
    pub color: Color,
    pub target: AxisTarget,
}

/// Collects series and draws them onto a [`PlotSurface`] in one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Plotter<X: BinEdge = f64> {
    config: PlotterConfig,
    entries: Vec<PlotEntry<X>>,
}

impl<X: BinEdge> Default for Plotter<X> {
    fn default() -> Self {
        Self::new(PlotterConfig::default())
    }
}

impl<X: BinEdge> Plotter<X> {
    #[must_use]
    pub fn new(config: PlotterConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> PlotterConfig {
        self.config
    }

    #[must_use]
    pub fn entries(&self) -> &[PlotEntry<X>] {
        &self.entries
    }

    /// Queues `series` for drawing against `target`.
    ///
    /// The entry style is `style` with `overrides` applied, or a fresh style
    /// built from `overrides` when no base style is given.
    pub fn add(
        &mut self,
        series: impl Into<BinnedSeries<X>>,
        target: AxisTarget,
        style: Option<&SeriesStyle>,
        overrides: StyleOverrides,
    ) {
        let style = match style {
            Some(style) => style.copy_with(overrides),
            None => SeriesStyle::from_overrides(overrides),
        };
        self.entries.push(PlotEntry {
            series: series.into(),
            style,
            target,
        });
    }

    /// Draws every queued entry onto `surface`.
    ///
    /// Lines are drawn steps-mid through the bin centers with connectors out
    /// to the outer bin edges. On log axes the lower y limit is floored at
    /// the larger of the autoscaled minimum and
    /// `min(previous minimum, 0.1 * smallest positive value)` so that error
    /// bars reaching toward zero do not stretch the axis. A legend is attached
    /// when `legend` is given, listing every series with a non-empty label.
    pub fn finish(
        &self,
        surface: &mut PlotSurface,
        legend: Option<LegendConfig>,
    ) -> ManateeResult<Vec<DrawnSeries>> {
        let mut drawn = Vec::with_capacity(self.entries.len());
        let mut legend_entries = Vec::new();

        for entry in &self.entries {
            let log = self.config.log_for(entry.target);
            let axes = surface.axes_mut(entry.target);
            let prev_ymin = if axes.has_data() {
                axes.y_limits().0
            } else {
                f64::INFINITY
            };
            if log {
                axes.set_y_mode(AxisMode::Log);
            }

            let style = &entry.style;
            let series = &entry.series;
            let to_display = |axis_value: f64| {
                if self.config.expx {
                    10f64.powf(axis_value)
                } else {
                    axis_value
                }
            };
            let xs: Vec<f64> = series
                .bin_centers()
                .into_iter()
                .map(|center| to_display(center.to_axis()))
                .collect();
            let edges: Vec<f64> = series
                .bins()
                .iter()
                .map(|edge| to_display(edge.to_axis()))
                .collect();
            let ys = series.values();

            let mut color = style.color().unwrap_or_else(|| axes.next_color());
            if let Some(alpha) = style.alpha() {
                color = color.with_alpha(alpha);
            }
            let zorder = style.zorder();

            for (x, y) in xs.iter().zip(ys) {
                axes.include_x(*x);
                axes.include_y(*y);
            }

            if style.line() {
                let stroke = Stroke::new(style.line_width(), color).with_style(style.line_style());
                axes.add_artist(Artist::Polyline {
                    points: steps_mid(&xs, ys),
                    stroke,
                    zorder,
                });
                let last = xs.len() - 1;
                let connectors = [
                    [(xs[0], ys[0]), (edges[0], ys[0])],
                    [(edges[last + 1], ys[last]), (xs[last], ys[last])],
                ];
                for [from, to] in connectors {
                    axes.add_artist(Artist::Polyline {
                        points: vec![from, to],
                        stroke,
                        zorder: zorder - CONNECTOR_ZORDER_OFFSET,
                    });
                }
                axes.include_x(edges[0]);
                axes.include_x(edges[last + 1]);
            }

            if style.errorbars() {
                let stroke = Stroke::new(style.error_line_width(), color);
                let cap_half_width_px = if style.errorcaps() {
                    style.cap_size()
                } else {
                    0.0
                };
                for ((x, y), error) in xs.iter().zip(ys).zip(series.errors()) {
                    let (low, high) = (y - error, y + error);
                    axes.include_y(low);
                    axes.include_y(high);
                    axes.add_artist(Artist::ErrorBar {
                        x: *x,
                        low,
                        high,
                        stroke,
                        cap_half_width_px,
                        zorder,
                    });
                }
            }

            if let Some(shape) = style.marker_shape() {
                let size_px = style.marker_size();
                for (x, y) in xs.iter().zip(ys) {
                    axes.add_artist(Artist::Marker {
                        x: *x,
                        y: *y,
                        shape,
                        size_px,
                        color,
                        zorder,
                    });
                }
            }

            if log {
                let min_positive = ys
                    .iter()
                    .copied()
                    .filter(|y| y.is_finite() && *y > 0.0)
                    .reduce(f64::min);
                if let Some(min_positive) = min_positive {
                    let min_accepted = prev_ymin.min(LOG_FLOOR_FRACTION * min_positive);
                    let new_ymin = axes.y_limits().0;
                    axes.set_y_floor(new_ymin.max(min_accepted))?;
                }
            }

            let label = style.label().unwrap_or_default().to_owned();
            if !label.is_empty() {
                legend_entries.push(LegendEntry {
                    label: label.clone(),
                    color,
                    line: style.line().then(|| style.line_style()),
                    line_width: style.line_width(),
                    marker: style.marker_shape(),
                });
            }
            debug!(
                label = %label,
                target = ?entry.target,
                bins = series.bin_count(),
                log,
                "drew series"
            );
            drawn.push(DrawnSeries {
                label,
                color,
                target: entry.target,
            });
        }

        if self.config.expx {
            surface.set_x_mode(AxisMode::Log);
        }
        if let Some(config) = legend {
            surface.set_legend(Some(Legend::new(config, legend_entries)));
        }
        Ok(drawn)
    }
}

/// Vertices of a steps-mid line: each value is held flat from halfway to the
/// previous center to halfway to the next one.
fn steps_mid(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(xs.len() * 2);
    for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
        if i > 0 {
            let mid = (xs[i - 1] + x) / 2.0;
            points.push((mid, ys[i - 1]));
            points.push((mid, *y));
        }
        points.push((*x, *y));
    }
    points
}
