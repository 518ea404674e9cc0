//! Text measurement capability.
//!
//! The layout engine only needs to know how big a short string is when drawn
//! with a given style. `TextMeasure` is that seam; `MonospaceMeasure` is the
//! deterministic implementation and `TextEngine` (see `text_engine`) shapes
//! real fonts.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::primitives::{Color, Size};

// Layout metrics derived from cosmic-text for JetBrains Mono at 14px base size.
pub const CHAR_WIDTH: f32 = 8.4;
pub const LINE_HEIGHT: f32 = 18.0;
pub const BASE_FONT_SIZE: f32 = 14.0;

/// Style used to draw a glyph inside a slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Glyph color.
    #[serde(default = "default_text_color")]
    pub color: Color,
}

fn default_font_size() -> f32 {
    24.0
}

fn default_text_color() -> Color {
    Color::BLACK
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            color: default_text_color(),
        }
    }
}

impl TextStyle {
    pub fn new(font_size: f32, color: Color) -> Self {
        Self { font_size, color }
    }

    /// Line height for this style, scaled from the base metrics.
    pub fn line_height(&self) -> f32 {
        self.font_size * (LINE_HEIGHT / BASE_FONT_SIZE)
    }
}

/// Measures the bounding box of a string drawn with a style.
pub trait TextMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> Size;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        (**self).measure(text, style)
    }
}

/// Fixed-advance measurement: unicode display columns times the cell width.
///
/// CJK glyphs count as two cells, combining marks as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasure;

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        let scale = style.font_size / BASE_FONT_SIZE;
        let cols = UnicodeWidthStr::width(text) as f32;
        Size::new(cols * CHAR_WIDTH * scale, style.line_height())
    }
}
