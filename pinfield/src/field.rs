//! Pin Field
//!
//! Ties a configuration snapshot, the input state controller and the painter
//! together. This is the type a host embeds: it forwards edits from its
//! text-input layer (`type_text`, `backspace`), asks `paint` for draw commands
//! when `needs_paint` says so, and hands in a new `PinFieldConfig` whenever the
//! caller rebuilds the field.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::PinFieldConfig;
use crate::controller::{ControllerEvent, InputStateController, Reconciled};
use crate::draw::DrawSurface;
use crate::error::Result;
use crate::painter::SlotPainter;
use crate::primitives::Size;
use crate::text_buffer::TextBuffer;
use crate::text_measure::TextMeasure;

pub struct PinField {
    config: PinFieldConfig,
    controller: InputStateController,
    painter: SlotPainter,
    last_canvas: Option<Size>,
    /// Set by controller events; cleared after a paint.
    dirty: Rc<Cell<bool>>,
    /// Set when the slot count changed; forces the next paint.
    geometry_stale: Rc<Cell<bool>>,
}

impl std::fmt::Debug for PinField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinField")
            .field("config", &self.config)
            .field("controller", &self.controller)
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

impl PinField {
    /// Create a field. With `external`, the caller keeps ownership of the
    /// buffer; otherwise the field creates one and releases it on drop.
    pub fn new(config: PinFieldConfig, external: Option<TextBuffer>) -> Result<Self> {
        let controller = InputStateController::attach(config.slot_count(), external)?;
        let dirty = Rc::new(Cell::new(true));
        let geometry_stale = Rc::new(Cell::new(false));

        let d = dirty.clone();
        let g = geometry_stale.clone();
        controller.observe(move |event| {
            d.set(true);
            if let ControllerEvent::DimensionsChanged { .. } = event {
                g.set(true);
            }
        });

        Ok(Self {
            config,
            controller,
            painter: SlotPainter::new(),
            last_canvas: None,
            dirty,
            geometry_stale,
        })
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    pub fn config(&self) -> &PinFieldConfig {
        &self.config
    }

    pub fn controller(&self) -> &InputStateController {
        &self.controller
    }

    /// Handle to the active buffer.
    pub fn buffer(&self) -> TextBuffer {
        self.controller.buffer()
    }

    pub fn display_text(&self) -> String {
        self.controller.display_text()
    }

    /// Whether every slot holds a character.
    pub fn is_complete(&self) -> bool {
        self.controller.display_len() == self.config.slot_count()
    }

    /// Whether state changed since the last paint.
    pub fn needs_paint(&self) -> bool {
        self.dirty.get()
    }

    // =====================================================================
    // Configuration
    // =====================================================================

    /// Replace the configuration and reconcile buffer state against it.
    pub fn set_config(&mut self, config: PinFieldConfig, external: Option<TextBuffer>) -> Result<Reconciled> {
        let outcome = self.controller.reconcile(config.slot_count(), external)?;
        if config.style() != self.config.style() {
            self.painter.invalidate();
            self.dirty.set(true);
        }
        self.config = config;
        Ok(outcome)
    }

    // =====================================================================
    // Host edits
    // =====================================================================

    /// Insert text at the caret, as the host's text input would.
    ///
    /// Only what the input hints admit is inserted: filtered, and cut to the
    /// room left under the slot count. A full field rejects the edit. Ignored
    /// when the field is disabled.
    pub fn type_text(&self, text: &str) -> bool {
        if !self.config.is_enabled() {
            tracing::debug!("pin field disabled, ignoring input");
            return false;
        }
        let hints = self.config.hints();
        let slot_count = self.config.slot_count();
        self.controller.buffer().edit(|value| {
            let admitted = hints.admit(value, text, slot_count);
            if admitted.is_empty() {
                return;
            }
            value.insert_str(&admitted);
        })
    }

    /// Delete the character before the caret. Ignored when disabled.
    pub fn backspace(&self) -> bool {
        if !self.config.is_enabled() {
            return false;
        }
        self.controller.buffer().backspace()
    }

    /// Clear all input. Ignored when disabled.
    pub fn clear(&self) -> bool {
        if !self.config.is_enabled() {
            return false;
        }
        self.controller.buffer().clear()
    }

    /// Invoke the submit callback with the committed text.
    ///
    /// Returns false if the field is disabled or has no callback.
    pub fn submit(&self) -> bool {
        if !self.config.is_enabled() {
            return false;
        }
        match self.config.on_submit() {
            Some(on_submit) => {
                let text = self.controller.buffer().text();
                tracing::debug!(len = text.chars().count(), "pin field submitted");
                on_submit(&text);
                true
            }
            None => false,
        }
    }

    // =====================================================================
    // Painting
    // =====================================================================

    /// Paint the field onto `surface`. Returns false when the display text is
    /// unchanged since the last paint and nothing invalidated the geometry.
    pub fn paint(&mut self, canvas: Size, measure: &dyn TextMeasure, surface: &mut dyn DrawSurface) -> bool {
        if self.last_canvas != Some(canvas) {
            self.last_canvas = Some(canvas);
            self.painter.invalidate();
        }
        if self.geometry_stale.replace(false) {
            self.painter.invalidate();
        }
        let display = self.controller.display_text();
        let painted = self.painter.paint(
            &display,
            self.config.slot_count(),
            self.config.style(),
            canvas,
            measure,
            surface,
        );
        self.dirty.set(false);
        painted
    }

    /// Detach from the buffer now instead of on drop.
    pub fn detach(&self) {
        self.controller.detach();
    }
}
