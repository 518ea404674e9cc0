//! Pinfield: fixed-length code input rendered as styled slots.
//!
//! A pin field shows a verification code one character per slot, as
//! underlines, one tight bordered strip, or separate boxes. This crate holds
//! the two pieces that do not depend on a GUI toolkit:
//!
//! - the input state controller, which owns (or borrows) the editable buffer
//!   and keeps a display text clamped to the slot count in sync with it;
//! - the slot layout engine, which turns the display text, slot count, style
//!   and canvas size into draw commands.
//!
//! The host toolkit plugs in through three capabilities: a `TextBuffer` (text,
//! selection, change listeners), a `TextMeasure` and a `DrawSurface`.
//!
//! # Usage
//!
//! ```ignore
//! use pinfield::{PinField, PinFieldConfig, SlotStyle, BoxLooseStyle, DrawCommandSet, Size};
//!
//! let config = PinFieldConfig::new(6, SlotStyle::BoxLoose(BoxLooseStyle::default()))?;
//! let mut field = PinField::new(config, None)?;
//! field.type_text("123");
//!
//! let mut commands = DrawCommandSet::new();
//! field.paint(Size::new(320.0, 48.0), &pinfield::MonospaceMeasure, &mut commands);
//! ```

// Core primitives
pub mod primitives;
pub mod error;

// Capabilities
pub mod draw;
pub mod text_buffer;
pub mod text_measure;
pub mod text_engine;

// Configuration
pub mod style;
pub mod config;

// State and layout
pub mod controller;
pub mod layout;
pub mod painter;
pub mod field;

// Re-export core types
pub use primitives::{Color, Point, Rect, Size};
pub use error::{PinFieldError, Result};
pub use draw::{DrawCommand, DrawCommandSet, DrawSurface};
pub use text_buffer::{EditValue, ListenerId, TextBuffer};
pub use text_measure::{MonospaceMeasure, TextMeasure, TextStyle};
pub use text_engine::TextEngine;
pub use style::{BoxLooseStyle, BoxTightStyle, HintSpec, ObscureSpec, SlotStyle, UnderlineStyle};
pub use config::{FieldSettings, InputFormatter, InputHints, KeyboardHint, PinFieldConfig, PinFieldConfigBuilder};
pub use controller::{BufferOwnership, ControllerEvent, InputStateController, Reconciled, clamp_to_slots};
pub use layout::{paint_slots, slot_bounds, slot_width};
pub use painter::SlotPainter;
pub use field::PinField;
