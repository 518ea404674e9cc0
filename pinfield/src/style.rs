//! Slot styles.
//!
//! The set of visual variants is closed: `Underline`, `BoxTight` and
//! `BoxLoose`. The layout engine matches on `SlotStyle` exhaustively, so adding
//! a variant is a compile error everywhere geometry is computed.

use serde::{Deserialize, Serialize};

use crate::error::{PinFieldError, Result};
use crate::primitives::Color;
use crate::text_measure::TextStyle;

/// Default mask glyph.
pub const DEFAULT_OBSCURE_GLYPH: &str = "●";

// =========================================================================
// ObscureSpec
// =========================================================================

/// Masking of rendered glyphs.
///
/// The glyph is guaranteed non-empty and single-line; the only way to build
/// one is through `new` (or deserializing, which goes through `new`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ObscureSpecDoc")]
pub struct ObscureSpec {
    enabled: bool,
    glyph: String,
}

#[derive(Deserialize)]
struct ObscureSpecDoc {
    #[serde(default)]
    enabled: bool,
    #[serde(default = "default_glyph")]
    glyph: String,
}

fn default_glyph() -> String {
    DEFAULT_OBSCURE_GLYPH.to_string()
}

impl TryFrom<ObscureSpecDoc> for ObscureSpec {
    type Error = PinFieldError;

    fn try_from(doc: ObscureSpecDoc) -> Result<Self> {
        ObscureSpec::new(doc.enabled, doc.glyph)
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

impl ObscureSpec {
    pub fn new(enabled: bool, glyph: impl Into<String>) -> Result<Self> {
        let glyph = glyph.into();
        if glyph.is_empty() {
            return Err(PinFieldError::EmptyObscureGlyph);
        }
        if glyph.contains(is_line_break) {
            return Err(PinFieldError::MultiLineObscureGlyph(glyph));
        }
        Ok(Self { enabled, glyph })
    }

    /// Masking enabled with the given glyph.
    pub fn masked(glyph: impl Into<String>) -> Result<Self> {
        Self::new(true, glyph)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }
}

impl Default for ObscureSpec {
    fn default() -> Self {
        Self {
            enabled: false,
            glyph: default_glyph(),
        }
    }
}

// =========================================================================
// HintSpec
// =========================================================================

/// Placeholder characters drawn in slots that have no input yet.
///
/// Slot `i` shows the hint's `i`-th character, if there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintSpec {
    pub text: String,
    #[serde(default = "hint_text_style")]
    pub style: TextStyle,
}

fn hint_text_style() -> TextStyle {
    TextStyle {
        color: Color::GREY,
        ..TextStyle::default()
    }
}

impl HintSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: hint_text_style(),
        }
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }
}

// =========================================================================
// Variant parameters
// =========================================================================

/// One underline segment per slot, separated by `gap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnderlineStyle {
    pub color: Color,
    pub entered_color: Option<Color>,
    /// Thickness of the underline; it is drawn at `height - line_height`.
    pub line_height: f32,
    pub gap: f32,
    pub text_style: TextStyle,
    pub obscure: ObscureSpec,
    pub hint: Option<HintSpec>,
}

impl Default for UnderlineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            entered_color: None,
            line_height: 2.0,
            gap: 16.0,
            text_style: TextStyle::default(),
            obscure: ObscureSpec::default(),
            hint: None,
        }
    }
}

/// A single bordered strip divided into slots by separators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxTightStyle {
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub radius: f32,
    pub solid_color: Option<Color>,
    pub text_style: TextStyle,
    pub obscure: ObscureSpec,
    pub hint: Option<HintSpec>,
}

impl Default for BoxTightStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            stroke_width: 1.0,
            radius: 0.0,
            solid_color: None,
            text_style: TextStyle::default(),
            obscure: ObscureSpec::default(),
            hint: None,
        }
    }
}

/// Separate boxes with a gap between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxLooseStyle {
    pub stroke_color: Color,
    pub entered_color: Option<Color>,
    pub stroke_width: f32,
    pub radius: f32,
    pub gap: f32,
    pub solid_color: Option<Color>,
    pub text_style: TextStyle,
    pub obscure: ObscureSpec,
    pub hint: Option<HintSpec>,
}

impl Default for BoxLooseStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            entered_color: None,
            stroke_width: 1.0,
            radius: 0.0,
            gap: 16.0,
            solid_color: None,
            text_style: TextStyle::default(),
            obscure: ObscureSpec::default(),
            hint: None,
        }
    }
}

// =========================================================================
// SlotStyle
// =========================================================================

/// Visual variant of the pin field, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotStyle {
    Underline(UnderlineStyle),
    BoxTight(BoxTightStyle),
    BoxLoose(BoxLooseStyle),
}

impl Default for SlotStyle {
    fn default() -> Self {
        SlotStyle::Underline(UnderlineStyle::default())
    }
}

impl SlotStyle {
    pub fn text_style(&self) -> &TextStyle {
        match self {
            SlotStyle::Underline(s) => &s.text_style,
            SlotStyle::BoxTight(s) => &s.text_style,
            SlotStyle::BoxLoose(s) => &s.text_style,
        }
    }

    pub fn obscure(&self) -> &ObscureSpec {
        match self {
            SlotStyle::Underline(s) => &s.obscure,
            SlotStyle::BoxTight(s) => &s.obscure,
            SlotStyle::BoxLoose(s) => &s.obscure,
        }
    }

    pub fn hint(&self) -> Option<&HintSpec> {
        match self {
            SlotStyle::Underline(s) => s.hint.as_ref(),
            SlotStyle::BoxTight(s) => s.hint.as_ref(),
            SlotStyle::BoxLoose(s) => s.hint.as_ref(),
        }
    }

    /// Replace the obscuring settings, keeping every other parameter.
    pub fn with_obscure(mut self, obscure: ObscureSpec) -> Self {
        match &mut self {
            SlotStyle::Underline(s) => s.obscure = obscure,
            SlotStyle::BoxTight(s) => s.obscure = obscure,
            SlotStyle::BoxLoose(s) => s.obscure = obscure,
        }
        self
    }

    /// Replace the hint, keeping every other parameter.
    pub fn with_hint(mut self, hint: Option<HintSpec>) -> Self {
        match &mut self {
            SlotStyle::Underline(s) => s.hint = hint,
            SlotStyle::BoxTight(s) => s.hint = hint,
            SlotStyle::BoxLoose(s) => s.hint = hint,
        }
        self
    }

    /// Check geometry parameters: widths, gaps and radii must be finite and >= 0.
    pub fn validate(&self) -> Result<()> {
        let params: Vec<(&'static str, f32)> = match self {
            SlotStyle::Underline(s) => vec![
                ("line_height", s.line_height),
                ("gap", s.gap),
                ("font_size", s.text_style.font_size),
            ],
            SlotStyle::BoxTight(s) => vec![
                ("stroke_width", s.stroke_width),
                ("radius", s.radius),
                ("font_size", s.text_style.font_size),
            ],
            SlotStyle::BoxLoose(s) => vec![
                ("stroke_width", s.stroke_width),
                ("radius", s.radius),
                ("gap", s.gap),
                ("font_size", s.text_style.font_size),
            ],
        };
        for (name, value) in params {
            if !value.is_finite() || value < 0.0 {
                return Err(PinFieldError::InvalidStyleParam { name, value });
            }
        }
        Ok(())
    }
}
