use serde::{Deserialize, Serialize};

use crate::core::PlotRect;
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, MarkerPrimitive, MarkerShape, RectPrimitive, RenderFrame,
    TextHAlign, TextPrimitive,
};

const SAMPLE_LENGTH_PX: f64 = 20.0;
const PADDING_PX: f64 = 6.0;
const SAMPLE_TEXT_GAP_PX: f64 = 6.0;
// Rough glyph advance used to size the legend box without a text backend.
const CHAR_WIDTH_RATIO: f64 = 0.6;
const ROW_HEIGHT_RATIO: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LegendPlacement {
    #[default]
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    #[serde(default)]
    pub placement: LegendPlacement,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    #[serde(default = "default_background")]
    pub background: Color,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            placement: LegendPlacement::default(),
            font_size_px: default_font_size_px(),
            text_color: default_text_color(),
            background: default_background(),
        }
    }
}

impl LegendConfig {
    #[must_use]
    pub fn with_placement(mut self, placement: LegendPlacement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn with_font_size_px(mut self, font_size_px: f64) -> Self {
        self.font_size_px = font_size_px;
        self
    }
}

fn default_font_size_px() -> f64 {
    11.0
}

fn default_text_color() -> Color {
    Color::rgb(0.0, 0.0, 0.0)
}

fn default_background() -> Color {
    Color::rgba(1.0, 1.0, 1.0, 0.8)
}

/// Label and sample glyph of one drawn series.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub line: Option<LineStrokeStyle>,
    pub line_width: f64,
    pub marker: Option<MarkerShape>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub config: LegendConfig,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    #[must_use]
    pub fn new(config: LegendConfig, entries: Vec<LegendEntry>) -> Self {
        Self { config, entries }
    }

    /// Appends the legend box, samples and labels inside `plot`.
    pub(crate) fn draw(&self, plot: PlotRect, frame: &mut RenderFrame) {
        if self.entries.is_empty() {
            return;
        }
        let font = self.config.font_size_px;
        let row_height = font * ROW_HEIGHT_RATIO;
        let longest = self
            .entries
            .iter()
            .map(|entry| entry.label.chars().count())
            .max()
            .unwrap_or(0);
        let width = PADDING_PX * 2.0
            + SAMPLE_LENGTH_PX
            + SAMPLE_TEXT_GAP_PX
            + longest as f64 * font * CHAR_WIDTH_RATIO;
        let height = PADDING_PX * 2.0 + row_height * self.entries.len() as f64;

        let (left, top) = match self.config.placement {
            LegendPlacement::UpperRight => (plot.right - PADDING_PX - width, plot.top + PADDING_PX),
            LegendPlacement::UpperLeft => (plot.left + PADDING_PX, plot.top + PADDING_PX),
            LegendPlacement::LowerLeft => {
                (plot.left + PADDING_PX, plot.bottom - PADDING_PX - height)
            }
            LegendPlacement::LowerRight => (
                plot.right - PADDING_PX - width,
                plot.bottom - PADDING_PX - height,
            ),
        };

        frame.rects.push(
            RectPrimitive::new(left, top, width, height, self.config.background)
                .with_border(1.0, Color::rgba(0.0, 0.0, 0.0, 0.3)),
        );

        for (row, entry) in self.entries.iter().enumerate() {
            let row_top = top + PADDING_PX + row_height * row as f64;
            let center_y = row_top + row_height / 2.0;
            let sample_left = left + PADDING_PX;
            if let Some(stroke_style) = entry.line {
                frame.lines.push(
                    LinePrimitive::new(
                        sample_left,
                        center_y,
                        sample_left + SAMPLE_LENGTH_PX,
                        center_y,
                        entry.line_width,
                        entry.color,
                    )
                    .with_stroke_style(stroke_style),
                );
            }
            if let Some(shape) = entry.marker {
                frame.markers.push(MarkerPrimitive::new(
                    sample_left + SAMPLE_LENGTH_PX / 2.0,
                    center_y,
                    font * 0.6,
                    shape,
                    entry.color,
                ));
            }
            frame.texts.push(TextPrimitive::new(
                entry.label.clone(),
                sample_left + SAMPLE_LENGTH_PX + SAMPLE_TEXT_GAP_PX,
                center_y - font / 2.0,
                font,
                self.config.text_color,
                TextHAlign::Left,
            ));
        }
    }
}
