//! Pin field configuration.
//!
//! A `PinFieldConfig` is an immutable snapshot. Changing anything (including
//! the slot count) means building a new one and handing it to
//! `PinField::set_config`, which reconciles the live state against it.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{PinFieldError, Result};
use crate::style::SlotStyle;
use crate::text_buffer::EditValue;

/// Default number of slots.
pub const DEFAULT_SLOT_COUNT: usize = 6;

/// Callback invoked with the committed text on submission.
pub type SubmitFn = Rc<dyn Fn(&str)>;

// =========================================================================
// Input hints
// =========================================================================

/// Keyboard the host should show. Passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardHint {
    #[default]
    Number,
    Text,
    Phone,
    VisiblePassword,
}

/// Edit filter the host applies before text reaches the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormatter {
    /// Drop everything that is not an ASCII digit.
    DigitsOnly,
    /// Keep at most this many chars.
    LengthLimit(usize),
}

/// Keyboard and formatting hints for the host text-input capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputHints {
    pub keyboard: KeyboardHint,
    pub formatters: Vec<InputFormatter>,
}

impl Default for InputHints {
    fn default() -> Self {
        Self {
            keyboard: KeyboardHint::Number,
            formatters: vec![InputFormatter::DigitsOnly],
        }
    }
}

impl InputHints {
    /// No keyboard preference beyond text, no formatting.
    pub fn plain() -> Self {
        Self {
            keyboard: KeyboardHint::Text,
            formatters: Vec::new(),
        }
    }

    /// The part of `inserted` that an edit at `value`'s caret may keep.
    ///
    /// Filters run on the inserted text only. The length limit is the tighter
    /// of `slot_count` and any `LengthLimit`, counted after the selection is
    /// replaced, so a value already at the limit admits nothing and existing
    /// characters are never pushed out.
    pub fn admit(&self, value: &EditValue, inserted: &str, slot_count: usize) -> String {
        let mut limit = slot_count;
        let mut admitted = inserted.to_string();
        for formatter in &self.formatters {
            match formatter {
                InputFormatter::DigitsOnly => admitted.retain(|c| c.is_ascii_digit()),
                InputFormatter::LengthLimit(n) => limit = limit.min(*n),
            }
        }
        let kept = value.char_count() - value.selected_len();
        let room = limit.saturating_sub(kept);
        admitted.chars().take(room).collect()
    }

    fn validate(&self) -> Result<()> {
        if self.formatters.contains(&InputFormatter::LengthLimit(0)) {
            return Err(PinFieldError::InvalidLengthLimit);
        }
        Ok(())
    }
}

// =========================================================================
// PinFieldConfig
// =========================================================================

/// Immutable configuration of one pin field.
#[derive(Clone)]
pub struct PinFieldConfig {
    slot_count: usize,
    style: SlotStyle,
    hints: InputHints,
    enabled: bool,
    on_submit: Option<SubmitFn>,
}

impl fmt::Debug for PinFieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinFieldConfig")
            .field("slot_count", &self.slot_count)
            .field("style", &self.style)
            .field("hints", &self.hints)
            .field("enabled", &self.enabled)
            .field("on_submit", &self.on_submit.is_some())
            .finish()
    }
}

impl PinFieldConfig {
    /// Config with the given slot count and style, default hints, enabled.
    pub fn new(slot_count: usize, style: SlotStyle) -> Result<Self> {
        Self::builder(slot_count).style(style).build()
    }

    pub fn builder(slot_count: usize) -> PinFieldConfigBuilder {
        PinFieldConfigBuilder {
            slot_count,
            style: SlotStyle::default(),
            hints: InputHints::default(),
            enabled: true,
            on_submit: None,
        }
    }

    /// Parse a JSON settings document and validate it.
    ///
    /// The submit callback cannot be expressed in JSON; attach it afterwards
    /// with `with_on_submit`.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: FieldSettings = serde_json::from_str(json)?;
        settings.into_config()
    }

    /// Settings document for this config (everything but the callback).
    pub fn to_settings(&self) -> FieldSettings {
        FieldSettings {
            slot_count: self.slot_count,
            style: self.style.clone(),
            hints: self.hints.clone(),
            enabled: self.enabled,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn style(&self) -> &SlotStyle {
        &self.style
    }

    pub fn hints(&self) -> &InputHints {
        &self.hints
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn on_submit(&self) -> Option<&SubmitFn> {
        self.on_submit.as_ref()
    }

    /// Copy of this config with a submit callback attached.
    pub fn with_on_submit(mut self, on_submit: impl Fn(&str) + 'static) -> Self {
        self.on_submit = Some(Rc::new(on_submit));
        self
    }

    /// Copy of this config with the enabled flag changed.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Copy of this config with a different slot count.
    pub fn with_slot_count(self, slot_count: usize) -> Result<Self> {
        if slot_count == 0 {
            return Err(PinFieldError::InvalidSlotCount(slot_count));
        }
        Ok(Self { slot_count, ..self })
    }

    /// Copy of this config with a different style.
    pub fn with_style(self, style: SlotStyle) -> Result<Self> {
        style.validate()?;
        Ok(Self { style, ..self })
    }
}

impl Default for PinFieldConfig {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            style: SlotStyle::default(),
            hints: InputHints::default(),
            enabled: true,
            on_submit: None,
        }
    }
}

/// Builder for `PinFieldConfig`. All validation happens in `build`.
pub struct PinFieldConfigBuilder {
    slot_count: usize,
    style: SlotStyle,
    hints: InputHints,
    enabled: bool,
    on_submit: Option<SubmitFn>,
}

impl PinFieldConfigBuilder {
    pub fn style(mut self, style: SlotStyle) -> Self { self.style = style; self }
    pub fn hints(mut self, hints: InputHints) -> Self { self.hints = hints; self }
    pub fn enabled(mut self, enabled: bool) -> Self { self.enabled = enabled; self }

    pub fn on_submit(mut self, on_submit: impl Fn(&str) + 'static) -> Self {
        self.on_submit = Some(Rc::new(on_submit));
        self
    }

    pub fn build(self) -> Result<PinFieldConfig> {
        if self.slot_count == 0 {
            return Err(PinFieldError::InvalidSlotCount(self.slot_count));
        }
        self.style.validate()?;
        self.hints.validate()?;
        Ok(PinFieldConfig {
            slot_count: self.slot_count,
            style: self.style,
            hints: self.hints,
            enabled: self.enabled,
            on_submit: self.on_submit,
        })
    }
}

// =========================================================================
// FieldSettings (serialized form)
// =========================================================================

/// The serializable part of a `PinFieldConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSettings {
    #[serde(default = "default_slot_count")]
    pub slot_count: usize,
    #[serde(default)]
    pub style: SlotStyle,
    #[serde(default)]
    pub hints: InputHints,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_slot_count() -> usize {
    DEFAULT_SLOT_COUNT
}

fn default_enabled() -> bool {
    true
}

impl FieldSettings {
    pub fn into_config(self) -> Result<PinFieldConfig> {
        PinFieldConfig::builder(self.slot_count)
            .style(self.style)
            .hints(self.hints)
            .enabled(self.enabled)
            .build()
    }
}
