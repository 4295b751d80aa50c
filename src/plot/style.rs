use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::render::{Color, LineStrokeStyle, MarkerShape};

pub const LABEL: &str = "label";
pub const COLOR: &str = "color";
pub const ALPHA: &str = "alpha";
pub const LINE_WIDTH: &str = "linewidth";
pub const LINE_WIDTH_SHORT: &str = "lw";
pub const LINE_STYLE: &str = "linestyle";
pub const LINE_STYLE_SHORT: &str = "ls";
pub const ZORDER: &str = "zorder";
pub const MARKER: &str = "marker";
pub const MARKER_SIZE: &str = "markersize";
pub const ERROR_LINE_WIDTH: &str = "elinewidth";
pub const CAP_SIZE: &str = "capsize";

/// Marker code meaning "draw no marker".
pub const NO_MARKER: &str = "None";

const DEFAULT_LINE_WIDTH: f64 = 1.5;
const DEFAULT_MARKER_SIZE: f64 = 6.0;
const DEFAULT_CAP_SIZE: f64 = 3.0;
const DEFAULT_MARKER: &str = "o";

/// Colors handed out, in order, to series without an explicit color.
pub const DEFAULT_COLOR_CYCLE: [Color; 10] = [
    Color::rgb(0.122, 0.467, 0.706),
    Color::rgb(1.0, 0.498, 0.055),
    Color::rgb(0.173, 0.627, 0.173),
    Color::rgb(0.839, 0.153, 0.157),
    Color::rgb(0.580, 0.404, 0.741),
    Color::rgb(0.549, 0.337, 0.294),
    Color::rgb(0.890, 0.467, 0.761),
    Color::rgb(0.498, 0.498, 0.498),
    Color::rgb(0.737, 0.741, 0.133),
    Color::rgb(0.090, 0.745, 0.812),
];

/// One rendering option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StyleValue {
    Flag(bool),
    Number(f64),
    Text(String),
    Color(Color),
}

impl StyleValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Color value, or a `#rrggbb` / `#rrggbbaa` text value.
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Text(text) => parse_hex_color(text),
            _ => None,
        }
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Color> for StyleValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

/// Display options for one series.
///
/// The four switches own derived option entries: disabling markers writes
/// `marker = "None"`, enabling them inserts `marker = "o"` unless a shape is
/// already chosen; disabling error bars writes a vanishing `elinewidth`;
/// disabling caps writes `capsize = 0`. Enabling bars or caps removes the
/// corresponding entry so defaults apply again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    line: bool,
    markers: bool,
    errorbars: bool,
    errorcaps: bool,
    #[serde(default)]
    options: IndexMap<String, StyleValue>,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesStyle {
    /// Line on; markers, error bars and caps off.
    #[must_use]
    pub fn new() -> Self {
        let mut style = Self {
            line: true,
            markers: false,
            errorbars: false,
            errorcaps: false,
            options: IndexMap::new(),
        };
        style.set_markers(false);
        style.set_errorbars(false);
        style.set_errorcaps(false);
        style
    }

    #[must_use]
    pub fn from_overrides(overrides: StyleOverrides) -> Self {
        let mut style = Self::new();
        style.update(overrides);
        style
    }

    #[must_use]
    pub fn line(&self) -> bool {
        self.line
    }

    #[must_use]
    pub fn markers(&self) -> bool {
        self.markers
    }

    #[must_use]
    pub fn errorbars(&self) -> bool {
        self.errorbars
    }

    #[must_use]
    pub fn errorcaps(&self) -> bool {
        self.errorcaps
    }

    pub fn set_line(&mut self, line: bool) {
        self.line = line;
    }

    pub fn set_markers(&mut self, markers: bool) {
        self.markers = markers;
        if markers {
            let has_shape = self
                .options
                .get(MARKER)
                .and_then(StyleValue::as_text)
                .is_some_and(|code| code != NO_MARKER);
            if !has_shape {
                self.options
                    .insert(MARKER.to_owned(), StyleValue::from(DEFAULT_MARKER));
            }
        } else {
            self.options
                .insert(MARKER.to_owned(), StyleValue::from(NO_MARKER));
        }
    }

    pub fn set_errorbars(&mut self, errorbars: bool) {
        self.errorbars = errorbars;
        if errorbars {
            self.options.shift_remove(ERROR_LINE_WIDTH);
        } else {
            self.options.insert(
                ERROR_LINE_WIDTH.to_owned(),
                StyleValue::Number(f64::MIN_POSITIVE),
            );
        }
    }

    pub fn set_errorcaps(&mut self, errorcaps: bool) {
        self.errorcaps = errorcaps;
        if errorcaps {
            self.options.shift_remove(CAP_SIZE);
        } else {
            self.options
                .insert(CAP_SIZE.to_owned(), StyleValue::Number(0.0));
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: bool) -> Self {
        self.set_line(line);
        self
    }

    #[must_use]
    pub fn with_markers(mut self, markers: bool) -> Self {
        self.set_markers(markers);
        self
    }

    #[must_use]
    pub fn with_errorbars(mut self, errorbars: bool) -> Self {
        self.set_errorbars(errorbars);
        self
    }

    #[must_use]
    pub fn with_errorcaps(mut self, errorcaps: bool) -> Self {
        self.set_errorcaps(errorcaps);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.set_option(key, value);
        self
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn remove_option(&mut self, key: &str) -> Option<StyleValue> {
        self.options.shift_remove(key)
    }

    #[must_use]
    pub fn option(&self, key: &str) -> Option<&StyleValue> {
        self.options.get(key)
    }

    #[must_use]
    pub fn options(&self) -> &IndexMap<String, StyleValue> {
        &self.options
    }

    /// Applies switch overrides first, then merges raw options, so an
    /// explicit option wins over the entry a switch derives.
    pub fn update(&mut self, overrides: StyleOverrides) {
        let StyleOverrides {
            line,
            markers,
            errorbars,
            errorcaps,
            options,
        } = overrides;
        if let Some(line) = line {
            self.set_line(line);
        }
        if let Some(markers) = markers {
            self.set_markers(markers);
        }
        if let Some(errorbars) = errorbars {
            self.set_errorbars(errorbars);
        }
        if let Some(errorcaps) = errorcaps {
            self.set_errorcaps(errorcaps);
        }
        self.options.extend(options);
    }

    /// Clone with `overrides` applied.
    #[must_use]
    pub fn copy_with(&self, overrides: StyleOverrides) -> Self {
        let mut style = self.clone();
        style.update(overrides);
        style
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.option(LABEL).and_then(StyleValue::as_text)
    }

    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.option(COLOR).and_then(StyleValue::as_color)
    }

    #[must_use]
    pub fn alpha(&self) -> Option<f64> {
        self.option(ALPHA)
            .and_then(StyleValue::as_number)
            .map(|alpha| alpha.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn line_width(&self) -> f64 {
        self.number_option(&[LINE_WIDTH, LINE_WIDTH_SHORT])
            .filter(|width| *width > 0.0)
            .unwrap_or(DEFAULT_LINE_WIDTH)
    }

    #[must_use]
    pub fn line_style(&self) -> LineStrokeStyle {
        [LINE_STYLE, LINE_STYLE_SHORT]
            .iter()
            .find_map(|key| self.option(key).and_then(StyleValue::as_text))
            .and_then(LineStrokeStyle::parse)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn zorder(&self) -> f64 {
        self.number_option(&[ZORDER]).unwrap_or(0.0)
    }

    /// Marker glyph to draw, or `None` when markers are disabled.
    #[must_use]
    pub fn marker_shape(&self) -> Option<MarkerShape> {
        self.option(MARKER)
            .and_then(StyleValue::as_text)
            .and_then(MarkerShape::parse)
    }

    #[must_use]
    pub fn marker_size(&self) -> f64 {
        self.number_option(&[MARKER_SIZE])
            .filter(|size| *size > 0.0)
            .unwrap_or(DEFAULT_MARKER_SIZE)
    }

    #[must_use]
    pub fn error_line_width(&self) -> f64 {
        self.number_option(&[ERROR_LINE_WIDTH])
            .filter(|width| *width > 0.0)
            .unwrap_or_else(|| self.line_width())
    }

    /// Half-length in pixels of error bar caps; zero draws no caps.
    #[must_use]
    pub fn cap_size(&self) -> f64 {
        self.number_option(&[CAP_SIZE])
            .filter(|size| *size >= 0.0)
            .unwrap_or(DEFAULT_CAP_SIZE)
    }

    fn number_option(&self, keys: &[&str]) -> Option<f64> {
        keys.iter()
            .find_map(|key| self.option(key).and_then(StyleValue::as_number))
            .filter(|value| value.is_finite())
    }
}

/// Partial style used to derive one style from another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverrides {
    pub line: Option<bool>,
    pub markers: Option<bool>,
    pub errorbars: Option<bool>,
    pub errorcaps: Option<bool>,
    pub options: IndexMap<String, StyleValue>,
}

impl StyleOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn line(mut self, line: bool) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn markers(mut self, markers: bool) -> Self {
        self.markers = Some(markers);
        self
    }

    #[must_use]
    pub fn errorbars(mut self, errorbars: bool) -> Self {
        self.errorbars = Some(errorbars);
        self
    }

    #[must_use]
    pub fn errorcaps(mut self, errorcaps: bool) -> Self {
        self.errorcaps = Some(errorcaps);
        self
    }

    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn label(self, label: impl Into<String>) -> Self {
        self.option(LABEL, StyleValue::Text(label.into()))
    }

    #[must_use]
    pub fn color(self, color: Color) -> Self {
        self.option(COLOR, color)
    }
}

fn parse_hex_color(text: &str) -> Option<Color> {
    let hex = text.strip_prefix('#')?;
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let channel = |index: usize| {
        u8::from_str_radix(&hex[index..index + 2], 16)
            .ok()
            .map(|value| f64::from(value) / 255.0)
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
    Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
}
