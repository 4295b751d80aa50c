use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AxisMode, AxisScale, AxisTuning, PlotRect, Viewport};
use crate::error::{ManateeError, ManateeResult};
use crate::plot::legend::Legend;
use crate::plot::style::DEFAULT_COLOR_CYCLE;
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, MarkerPrimitive, MarkerShape, RectPrimitive,
    RenderFrame, Renderer,
};

/// Which y axis of a [`PlotSurface`] a series is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisTarget {
    #[default]
    Main,
    /// Secondary y axis sharing the main x axis.
    Twin,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
    pub style: LineStrokeStyle,
}

impl Stroke {
    #[must_use]
    pub fn new(width: f64, color: Color) -> Self {
        Self {
            width,
            color,
            style: LineStrokeStyle::Solid,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: LineStrokeStyle) -> Self {
        self.style = style;
        self
    }
}

/// A drawable item in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Polyline {
        points: Vec<(f64, f64)>,
        stroke: Stroke,
        zorder: f64,
    },
    /// Vertical bar from `low` to `high` at `x`, with optional caps.
    ErrorBar {
        x: f64,
        low: f64,
        high: f64,
        stroke: Stroke,
        cap_half_width_px: f64,
        zorder: f64,
    },
    Marker {
        x: f64,
        y: f64,
        shape: MarkerShape,
        size_px: f64,
        color: Color,
        zorder: f64,
    },
    /// Filled rectangle spanning `x0..x1` and `y0..y1`.
    Block {
        x0: f64,
        x1: f64,
        y0: f64,
        y1: f64,
        color: Color,
        zorder: f64,
    },
}

impl Artist {
    #[must_use]
    pub fn zorder(&self) -> f64 {
        match self {
            Self::Polyline { zorder, .. }
            | Self::ErrorBar { zorder, .. }
            | Self::Marker { zorder, .. }
            | Self::Block { zorder, .. } => *zorder,
        }
    }
}

/// Running min/max of the values drawn along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DataExtent {
    min: f64,
    max: f64,
    min_positive: f64,
}

impl Default for DataExtent {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            min_positive: f64::INFINITY,
        }
    }
}

impl DataExtent {
    fn include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        if value > 0.0 {
            self.min_positive = self.min_positive.min(value);
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            min_positive: self.min_positive.min(other.min_positive),
        }
    }

    /// Limits of the values placeable on an axis in `mode`.
    fn limits(self, mode: AxisMode) -> Option<(f64, f64)> {
        match mode {
            AxisMode::Linear if self.min <= self.max => Some((self.min, self.max)),
            AxisMode::Log if self.min_positive <= self.max => Some((self.min_positive, self.max)),
            _ => None,
        }
    }
}

fn default_limits(mode: AxisMode) -> (f64, f64) {
    match mode {
        AxisMode::Linear => (0.0, 1.0),
        AxisMode::Log => (1.0, 10.0),
    }
}

/// One y axis with the artists drawn against it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axes {
    y_mode: AxisMode,
    x_extent: DataExtent,
    y_extent: DataExtent,
    y_floor: Option<f64>,
    artists: Vec<Artist>,
    color_index: usize,
}

impl Axes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn y_mode(&self) -> AxisMode {
        self.y_mode
    }

    pub fn set_y_mode(&mut self, mode: AxisMode) {
        self.y_mode = mode;
    }

    #[must_use]
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data_y_limits().is_some()
    }

    /// Raw y limits of the drawn data placeable on this axis, ignoring the floor.
    #[must_use]
    pub fn data_y_limits(&self) -> Option<(f64, f64)> {
        self.y_extent.limits(self.y_mode)
    }

    /// Current y limits: the data limits with the lower bound replaced by the
    /// floor when one is set.
    #[must_use]
    pub fn y_limits(&self) -> (f64, f64) {
        let (data_lo, data_hi) = self
            .data_y_limits()
            .unwrap_or_else(|| default_limits(self.y_mode));
        match self.y_floor {
            Some(floor) if floor < data_hi => (floor, data_hi),
            Some(floor) => (floor, floor.max(data_hi) * 10.0),
            None => (data_lo, data_hi),
        }
    }

    #[must_use]
    pub fn y_floor(&self) -> Option<f64> {
        self.y_floor
    }

    pub fn set_y_floor(&mut self, floor: f64) -> ManateeResult<()> {
        if !self.y_mode.accepts(floor) {
            return Err(ManateeError::InvalidData(format!(
                "y floor {floor} is not placeable on a {:?} axis",
                self.y_mode
            )));
        }
        self.y_floor = Some(floor);
        Ok(())
    }

    pub fn include_x(&mut self, value: f64) {
        self.x_extent.include(value);
    }

    pub fn include_y(&mut self, value: f64) {
        self.y_extent.include(value);
    }

    pub fn add_artist(&mut self, artist: Artist) {
        self.artists.push(artist);
    }

    /// Next color of this axes' cycle.
    pub fn next_color(&mut self) -> Color {
        let color = DEFAULT_COLOR_CYCLE[self.color_index % DEFAULT_COLOR_CYCLE.len()];
        self.color_index += 1;
        color
    }
}

/// Pixel layout of a [`PlotSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceLayout {
    pub left_margin_px: f64,
    pub right_margin_px: f64,
    /// Right margin used instead of `right_margin_px` once a twin axis exists.
    pub twin_right_margin_px: f64,
    pub top_margin_px: f64,
    pub bottom_margin_px: f64,
    pub frame_color: Color,
    pub frame_width_px: f64,
    pub background: Color,
    pub y_tuning: AxisTuning,
}

impl Default for SurfaceLayout {
    fn default() -> Self {
        Self {
            left_margin_px: 56.0,
            right_margin_px: 16.0,
            twin_right_margin_px: 56.0,
            top_margin_px: 16.0,
            bottom_margin_px: 32.0,
            frame_color: Color::rgb(0.0, 0.0, 0.0),
            frame_width_px: 1.0,
            background: Color::rgb(1.0, 1.0, 1.0),
            y_tuning: AxisTuning::default(),
        }
    }
}

impl SurfaceLayout {
    #[must_use]
    pub fn with_margins(mut self, left: f64, right: f64, top: f64, bottom: f64) -> Self {
        self.left_margin_px = left;
        self.right_margin_px = right;
        self.top_margin_px = top;
        self.bottom_margin_px = bottom;
        self
    }

    #[must_use]
    pub fn with_y_tuning(mut self, y_tuning: AxisTuning) -> Self {
        self.y_tuning = y_tuning;
        self
    }
}

/// Drawing surface: a main axes, an optional twin axes sharing x, and a legend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotSurface {
    main: Axes,
    twin: Option<Axes>,
    x_mode: AxisMode,
    legend: Option<Legend>,
    layout: SurfaceLayout,
}

impl PlotSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layout(mut self, layout: SurfaceLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn layout(&self) -> SurfaceLayout {
        self.layout
    }

    #[must_use]
    pub fn main(&self) -> &Axes {
        &self.main
    }

    #[must_use]
    pub fn twin(&self) -> Option<&Axes> {
        self.twin.as_ref()
    }

    #[must_use]
    pub fn axes(&self, target: AxisTarget) -> Option<&Axes> {
        match target {
            AxisTarget::Main => Some(&self.main),
            AxisTarget::Twin => self.twin.as_ref(),
        }
    }

    /// Mutable axes for `target`; the twin axes is created on first use.
    pub fn axes_mut(&mut self, target: AxisTarget) -> &mut Axes {
        match target {
            AxisTarget::Main => &mut self.main,
            AxisTarget::Twin => self.twin.get_or_insert_with(Axes::new),
        }
    }

    #[must_use]
    pub fn x_mode(&self) -> AxisMode {
        self.x_mode
    }

    pub fn set_x_mode(&mut self, mode: AxisMode) {
        self.x_mode = mode;
    }

    /// Shared x limits over both axes.
    #[must_use]
    pub fn x_limits(&self) -> (f64, f64) {
        let extent = self
            .twin
            .iter()
            .fold(self.main.x_extent, |extent, twin| extent.merge(twin.x_extent));
        extent
            .limits(self.x_mode)
            .unwrap_or_else(|| default_limits(self.x_mode))
    }

    #[must_use]
    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn set_legend(&mut self, legend: Option<Legend>) {
        self.legend = legend;
    }

    #[must_use]
    pub fn plot_rect(&self, viewport: Viewport) -> PlotRect {
        let right_margin = if self.twin.is_some() {
            self.layout.twin_right_margin_px
        } else {
            self.layout.right_margin_px
        };
        PlotRect {
            left: self.layout.left_margin_px,
            top: self.layout.top_margin_px,
            right: f64::from(viewport.width) - right_margin,
            bottom: f64::from(viewport.height) - self.layout.bottom_margin_px,
        }
    }

    /// Maps every artist to pixel space, in ascending z-order.
    pub fn compose(&self, viewport: Viewport) -> ManateeResult<RenderFrame> {
        if !viewport.is_valid() {
            return Err(ManateeError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let rect = self.plot_rect(viewport);
        if !rect.is_valid() {
            return Err(ManateeError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let x_scale = AxisScale::fit(
            self.x_mode,
            self.x_limits(),
            AxisTuning::flush(),
            rect.left,
            rect.right,
        )?;

        let mut layers: Vec<(f64, AxisScale, &Artist)> = Vec::new();
        for axes in std::iter::once(&self.main).chain(self.twin.iter()) {
            let mut tuning = self.layout.y_tuning;
            if axes.y_floor.is_some() {
                tuning.lower_padding_ratio = 0.0;
            }
            let y_scale = AxisScale::fit(axes.y_mode, axes.y_limits(), tuning, rect.bottom, rect.top)?;
            layers.extend(
                axes.artists
                    .iter()
                    .map(|artist| (artist.zorder(), y_scale, artist)),
            );
        }
        layers.sort_by(|left, right| left.0.total_cmp(&right.0));

        let mut frame = RenderFrame::new(viewport).with_rect(
            RectPrimitive::new(
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                self.layout.background,
            )
            .with_border(self.layout.frame_width_px, self.layout.frame_color),
        );

        for (_, y_scale, artist) in &layers {
            draw_artist(artist, x_scale, *y_scale, rect, &mut frame);
        }

        if let Some(legend) = &self.legend {
            legend.draw(rect, &mut frame);
        }

        debug!(
            width = viewport.width,
            height = viewport.height,
            artists = layers.len(),
            lines = frame.lines.len(),
            markers = frame.markers.len(),
            "composed plot surface"
        );
        Ok(frame)
    }

    /// Composes the surface and hands the frame to `renderer`.
    pub fn render<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        viewport: Viewport,
    ) -> ManateeResult<()> {
        let frame = self.compose(viewport)?;
        renderer.render(&frame)
    }
}

fn draw_artist(
    artist: &Artist,
    x_scale: AxisScale,
    y_scale: AxisScale,
    rect: PlotRect,
    frame: &mut RenderFrame,
) {
    match artist {
        Artist::Polyline { points, stroke, .. } => {
            let mapped: Vec<Option<(f64, f64)>> = points
                .iter()
                .map(|(x, y)| {
                    let px = x_scale.to_pixel(*x)?;
                    let py = y_scale.to_pixel(*y)?;
                    Some((px, rect.clamp_y(py)))
                })
                .collect();
            for pair in mapped.windows(2) {
                if let [Some((x1, y1)), Some((x2, y2))] = pair {
                    frame.lines.push(
                        LinePrimitive::new(*x1, *y1, *x2, *y2, stroke.width, stroke.color)
                            .with_stroke_style(stroke.style),
                    );
                }
            }
        }
        Artist::ErrorBar {
            x,
            low,
            high,
            stroke,
            cap_half_width_px,
            ..
        } => {
            let Some(px) = x_scale.to_pixel(*x) else {
                return;
            };
            let Some(high_px) = y_scale.to_pixel(*high) else {
                return;
            };
            let low_px = y_scale.to_pixel(*low).unwrap_or(rect.bottom);
            let (low_px, high_px) = (rect.clamp_y(low_px), rect.clamp_y(high_px));
            frame
                .lines
                .push(LinePrimitive::new(px, low_px, px, high_px, stroke.width, stroke.color));
            if *cap_half_width_px > 0.0 {
                for cap_y in [low_px, high_px] {
                    frame.lines.push(LinePrimitive::new(
                        px - cap_half_width_px,
                        cap_y,
                        px + cap_half_width_px,
                        cap_y,
                        stroke.width,
                        stroke.color,
                    ));
                }
            }
        }
        Artist::Marker {
            x,
            y,
            shape,
            size_px,
            color,
            ..
        } => {
            let (Some(px), Some(py)) = (x_scale.to_pixel(*x), y_scale.to_pixel(*y)) else {
                return;
            };
            if py < rect.top || py > rect.bottom {
                return;
            }
            frame
                .markers
                .push(MarkerPrimitive::new(px, py, *size_px, *shape, *color));
        }
        Artist::Block {
            x0,
            x1,
            y0,
            y1,
            color,
            ..
        } => {
            let (Some(px0), Some(px1)) = (x_scale.to_pixel(*x0), x_scale.to_pixel(*x1)) else {
                return;
            };
            let (Some(py0), Some(py1)) = (y_scale.to_pixel(*y0), y_scale.to_pixel(*y1)) else {
                return;
            };
            let (py0, py1) = (rect.clamp_y(py0), rect.clamp_y(py1));
            frame.rects.push(RectPrimitive::new(
                px0.min(px1),
                py0.min(py1),
                (px1 - px0).abs(),
                (py1 - py0).abs(),
                *color,
            ));
        }
    }
}
