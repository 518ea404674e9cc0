//! Input State Controller
//!
//! Keeps exactly one text buffer associated with a pin field, derives the
//! display text (buffer text clamped to the slot count), and reconciles
//! ownership and slot-count changes when the field's configuration is
//! replaced.
//!
//! Ownership rule: a buffer the controller created is released exactly once,
//! on `detach`. A buffer handed in by the caller is only ever unsubscribed.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::{PinFieldError, Result};
use crate::text_buffer::{EditValue, ListenerId, TextBuffer};

/// Who owns the active buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferOwnership {
    /// Created by the controller; released on detach.
    Internal,
    /// Supplied by the caller; never released by the controller.
    External,
}

/// Notification emitted to observers (usually the painter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The display text changed.
    TextChanged(String),
    /// The slot count changed; geometry must be recomputed.
    DimensionsChanged { slot_count: usize },
}

/// Which reconciliation path a configuration change took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Internal <-> external buffer switch.
    OwnershipChanged,
    /// One external buffer replaced by another.
    BufferSwapped,
    /// Slot count shrank below the display text; text was cut.
    Truncated,
    /// Slot count changed without losing text.
    Resized,
    /// Nothing relevant changed.
    Unchanged,
}

/// Truncate `text` to at most `slot_count` chars, never splitting a char.
pub fn clamp_to_slots(text: &str, slot_count: usize) -> &str {
    match text.char_indices().nth(slot_count) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

type Observer = Rc<dyn Fn(&ControllerEvent)>;

struct ControllerInner {
    buffer: RefCell<TextBuffer>,
    ownership: Cell<BufferOwnership>,
    listener: Cell<Option<ListenerId>>,
    slot_count: Cell<usize>,
    display: RefCell<String>,
    observers: RefCell<Vec<Observer>>,
    detached: Cell<bool>,
}

impl ControllerInner {
    /// Recompute the display text from the buffer; emit if it changed.
    fn on_buffer_changed(&self) {
        let raw = self.buffer.borrow().text();
        let clamped = clamp_to_slots(&raw, self.slot_count.get());
        if *self.display.borrow() == clamped {
            return;
        }
        let clamped = clamped.to_string();
        *self.display.borrow_mut() = clamped.clone();
        tracing::trace!(display = %clamped, "display text updated");
        self.emit(&ControllerEvent::TextChanged(clamped));
    }

    fn emit(&self, event: &ControllerEvent) {
        let observers: Vec<Observer> = self.observers.borrow().clone();
        for observer in observers {
            observer(event);
        }
    }

    fn current_buffer(&self) -> TextBuffer {
        self.buffer.borrow().clone()
    }
}

/// Owns the authoritative buffer of a pin field and its clamped display text.
pub struct InputStateController {
    inner: Rc<ControllerInner>,
}

impl std::fmt::Debug for InputStateController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputStateController")
            .field("ownership", &self.inner.ownership.get())
            .field("slot_count", &self.inner.slot_count.get())
            .field("display", &*self.inner.display.borrow())
            .field("detached", &self.inner.detached.get())
            .finish()
    }
}

impl InputStateController {
    /// Attach to `external` if given, otherwise create and own a buffer.
    pub fn attach(slot_count: usize, external: Option<TextBuffer>) -> Result<Self> {
        if slot_count == 0 {
            return Err(PinFieldError::InvalidSlotCount(slot_count));
        }
        let (buffer, ownership) = match external {
            Some(buffer) => (buffer, BufferOwnership::External),
            None => (TextBuffer::new(), BufferOwnership::Internal),
        };
        let display = clamp_to_slots(&buffer.text(), slot_count).to_string();
        let inner = Rc::new(ControllerInner {
            buffer: RefCell::new(buffer),
            ownership: Cell::new(ownership),
            listener: Cell::new(None),
            slot_count: Cell::new(slot_count),
            display: RefCell::new(display),
            observers: RefCell::new(Vec::new()),
            detached: Cell::new(false),
        });
        let controller = Self { inner };
        controller.subscribe_current();
        tracing::debug!(slot_count, ?ownership, "pin field controller attached");
        Ok(controller)
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    /// The buffer text clamped to the slot count.
    pub fn display_text(&self) -> String {
        self.inner.display.borrow().clone()
    }

    pub fn display_len(&self) -> usize {
        self.inner.display.borrow().chars().count()
    }

    pub fn slot_count(&self) -> usize {
        self.inner.slot_count.get()
    }

    /// Handle to the active buffer.
    pub fn buffer(&self) -> TextBuffer {
        self.inner.current_buffer()
    }

    pub fn ownership(&self) -> BufferOwnership {
        self.inner.ownership.get()
    }

    pub fn is_detached(&self) -> bool {
        self.inner.detached.get()
    }

    /// Register an observer for text and dimension changes.
    pub fn observe(&self, observer: impl Fn(&ControllerEvent) + 'static) {
        self.inner.observers.borrow_mut().push(Rc::new(observer));
    }

    // =====================================================================
    // Buffer change handling
    // =====================================================================

    /// Re-read the buffer and update the display text.
    ///
    /// Runs automatically on every buffer change; calling it directly forces a
    /// resync.
    pub fn on_buffer_changed(&self) {
        self.inner.on_buffer_changed();
    }

    fn subscribe_current(&self) {
        let weak: Weak<ControllerInner> = Rc::downgrade(&self.inner);
        let id = self.inner.current_buffer().subscribe(move || {
            if let Some(inner) = weak.upgrade() {
                inner.on_buffer_changed();
            }
        });
        self.inner.listener.set(Some(id));
    }

    fn unsubscribe_current(&self) {
        if let Some(id) = self.inner.listener.take() {
            self.inner.current_buffer().unsubscribe(id);
        }
    }

    /// Drop the active buffer: unsubscribe, and release it if we own it.
    fn let_go_of_current(&self) {
        self.unsubscribe_current();
        if self.inner.ownership.get() == BufferOwnership::Internal {
            let buffer = self.inner.current_buffer();
            if buffer.release() {
                tracing::debug!("internal buffer released");
            }
        }
    }

    fn install(&self, buffer: TextBuffer, ownership: BufferOwnership) {
        *self.inner.buffer.borrow_mut() = buffer;
        self.inner.ownership.set(ownership);
        self.subscribe_current();
    }

    // =====================================================================
    // Reconciliation
    // =====================================================================

    /// Reconcile against a replaced configuration.
    ///
    /// `external` is the buffer the new configuration supplies (or `None` for
    /// an internally owned one). Cases are checked in priority order:
    /// ownership change, external buffer swap, slot count shrink. Whatever the
    /// path, the display text fits the new slot count afterwards.
    ///
    /// A detached controller holds no buffer and refuses to adopt one.
    pub fn reconcile(&self, slot_count: usize, external: Option<TextBuffer>) -> Result<Reconciled> {
        if self.inner.detached.get() {
            return Err(PinFieldError::Detached);
        }
        if slot_count == 0 {
            return Err(PinFieldError::InvalidSlotCount(slot_count));
        }
        let old_slot_count = self.inner.slot_count.replace(slot_count);
        let dimensions_changed = old_slot_count != slot_count;

        let outcome = match (self.inner.ownership.get(), external) {
            (BufferOwnership::Internal, Some(adopted)) => {
                self.let_go_of_current();
                let differs = adopted.text() != *self.inner.display.borrow();
                self.install(adopted, BufferOwnership::External);
                tracing::debug!(differs, "adopted external buffer");
                if differs || dimensions_changed {
                    self.inner.on_buffer_changed();
                }
                Reconciled::OwnershipChanged
            }
            (BufferOwnership::External, None) => {
                self.unsubscribe_current();
                // Carry the caller's value over so no typed text is lost.
                let value = self.inner.current_buffer().value();
                self.install(TextBuffer::from_value(value), BufferOwnership::Internal);
                tracing::debug!("switched to internal buffer");
                self.inner.on_buffer_changed();
                Reconciled::OwnershipChanged
            }
            (BufferOwnership::External, Some(next)) if !next.ptr_eq(&self.inner.current_buffer()) => {
                self.unsubscribe_current();
                self.install(next, BufferOwnership::External);
                tracing::debug!("swapped external buffer");
                if self.display_len() > slot_count {
                    self.inner.on_buffer_changed();
                }
                Reconciled::BufferSwapped
            }
            _ if slot_count < old_slot_count && self.display_len() > slot_count => {
                self.truncate_to(slot_count);
                Reconciled::Truncated
            }
            _ if dimensions_changed => {
                self.inner.on_buffer_changed();
                Reconciled::Resized
            }
            _ => Reconciled::Unchanged,
        };

        if dimensions_changed {
            tracing::debug!(from = old_slot_count, to = slot_count, ?outcome, "slot count changed");
            self.inner.emit(&ControllerEvent::DimensionsChanged { slot_count });
        }
        Ok(outcome)
    }

    /// Destructively cut display and buffer text to `slot_count` chars and
    /// move the caret to the end.
    fn truncate_to(&self, slot_count: usize) {
        let buffer = self.inner.current_buffer();
        let truncated = clamp_to_slots(&buffer.text(), slot_count).to_string();
        *self.inner.display.borrow_mut() = truncated.clone();
        tracing::debug!(slot_count, kept = %truncated, "truncating buffer to slot count");

        // The buffer notifies us again; the display already matches, so that
        // nested pass emits nothing.
        buffer.set_value(EditValue::with_text(truncated.clone()));
        self.inner.emit(&ControllerEvent::TextChanged(truncated));
    }

    // =====================================================================
    // Detach
    // =====================================================================

    /// Unsubscribe from the buffer and release it if internally owned.
    ///
    /// Idempotent: the internal buffer is released exactly once.
    pub fn detach(&self) {
        if self.inner.detached.replace(true) {
            return;
        }
        self.let_go_of_current();
        tracing::debug!(ownership = ?self.inner.ownership.get(), "pin field controller detached");
    }
}

impl Drop for InputStateController {
    fn drop(&mut self) {
        self.detach();
    }
}
