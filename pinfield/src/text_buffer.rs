//! Text Buffer
//!
//! The editable text source behind a pin field: text, caret, selection and a
//! list of change listeners. A `TextBuffer` is a cheap shared handle; cloning
//! it shares the same buffer, which is how a caller hands an external buffer to
//! a field while keeping it for themselves.
//!
//! Everything here is single-threaded. Listeners run synchronously after the
//! buffer has released its internal borrows, so a listener may read or write
//! the buffer again. Writing a value equal to the current one is a no-op and
//! notifies nobody, which is what stops truncation loops.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

// =========================================================================
// EditValue
// =========================================================================

/// Snapshot of a buffer: text plus caret and selection, in char offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditValue {
    pub text: String,
    pub cursor: usize,
    pub selection: Option<(usize, usize)>,
}

impl EditValue {
    /// Text with the caret at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            selection: None,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of selected chars, clamped to the text.
    pub fn selected_len(&self) -> usize {
        let len = self.char_count();
        self.selection
            .map_or(0, |(s, e)| s.max(e).min(len) - s.min(e).min(len))
    }

    /// Clamp caret and selection into the current text.
    pub fn clamp_offsets(&mut self) {
        let len = self.char_count();
        self.cursor = self.cursor.min(len);
        self.selection = self
            .selection
            .map(|(s, e)| (s.min(len), e.min(len)))
            .filter(|(s, e)| s != e);
    }

    /// Delete the current selection, if any. Returns true if a selection existed.
    pub fn delete_selection(&mut self) -> bool {
        if let Some((s, e)) = self.selection.take() {
            let (lo, hi) = (s.min(e), s.max(e));
            let lo_byte = char_to_byte(&self.text, lo);
            let hi_byte = char_to_byte(&self.text, hi);
            self.text.replace_range(lo_byte..hi_byte, "");
            self.cursor = lo;
            true
        } else {
            false
        }
    }

    /// Insert a string at the cursor position (deletes selection first).
    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        let byte_pos = char_to_byte(&self.text, self.cursor);
        self.text.insert_str(byte_pos, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (Backspace).
    pub fn backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte(&self.text, self.cursor);
            let next_byte = char_to_byte(&self.text, self.cursor + 1);
            self.text.replace_range(byte_pos..next_byte, "");
        }
    }
}

/// Byte index of the `char_offset`-th char, or the text length past the end.
pub(crate) fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

// =========================================================================
// TextBuffer
// =========================================================================

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn()>;

struct BufferInner {
    value: RefCell<EditValue>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_listener: Cell<u64>,
    released: Cell<bool>,
}

/// Shared editable text buffer with change notification.
#[derive(Clone)]
pub struct TextBuffer {
    inner: Rc<BufferInner>,
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field("value", &*self.inner.value.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .field("released", &self.inner.released.get())
            .finish()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::from_value(EditValue::default())
    }

    /// Create a buffer holding `text`, caret at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::from_value(EditValue::with_text(text))
    }

    pub fn from_value(mut value: EditValue) -> Self {
        value.clamp_offsets();
        Self {
            inner: Rc::new(BufferInner {
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                released: Cell::new(false),
            }),
        }
    }

    /// Whether two handles refer to the same buffer.
    pub fn ptr_eq(&self, other: &TextBuffer) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =====================================================================
    // Reading
    // =====================================================================

    pub fn text(&self) -> String {
        self.inner.value.borrow().text.clone()
    }

    pub fn value(&self) -> EditValue {
        self.inner.value.borrow().clone()
    }

    pub fn cursor(&self) -> usize {
        self.inner.value.borrow().cursor
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.inner.value.borrow().selection
    }

    pub fn char_count(&self) -> usize {
        self.inner.value.borrow().char_count()
    }

    // =====================================================================
    // Writing
    // =====================================================================

    /// Replace the whole value. Returns false (and notifies nobody) when the
    /// new value equals the current one.
    pub fn set_value(&self, mut value: EditValue) -> bool {
        value.clamp_offsets();
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.notify();
        true
    }

    /// Replace the text, caret at the end.
    pub fn set_text(&self, text: impl Into<String>) -> bool {
        self.set_value(EditValue::with_text(text))
    }

    /// Move the caret, clearing the selection.
    pub fn set_cursor(&self, cursor: usize) -> bool {
        let mut value = self.value();
        value.cursor = cursor;
        value.selection = None;
        self.set_value(value)
    }

    /// Set the selection range (char offsets); the caret moves to its end.
    pub fn set_selection(&self, selection: Option<(usize, usize)>) -> bool {
        let mut value = self.value();
        if let Some((_, end)) = selection {
            value.cursor = end;
        }
        value.selection = selection;
        self.set_value(value)
    }

    /// Apply an edit to a copy of the value and store the result.
    pub fn edit(&self, f: impl FnOnce(&mut EditValue)) -> bool {
        let mut value = self.value();
        f(&mut value);
        self.set_value(value)
    }

    pub fn insert_str(&self, s: &str) -> bool {
        self.edit(|v| v.insert_str(s))
    }

    pub fn backspace(&self) -> bool {
        self.edit(EditValue::backspace)
    }

    pub fn clear(&self) -> bool {
        self.set_value(EditValue::default())
    }

    // =====================================================================
    // Listeners
    // =====================================================================

    /// Register a change listener. It runs after every value change.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self) {
        // Snapshot so listeners may subscribe, unsubscribe or write re-entrantly.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    // =====================================================================
    // Lifetime
    // =====================================================================

    /// Release the buffer: drop all listeners and mark it dead.
    ///
    /// Only the owner calls this. Returns false if it was already released.
    pub(crate) fn release(&self) -> bool {
        if self.inner.released.replace(true) {
            return false;
        }
        self.inner.listeners.borrow_mut().clear();
        true
    }

    /// Whether the owner has released this buffer.
    pub fn is_released(&self) -> bool {
        self.inner.released.get()
    }
}
