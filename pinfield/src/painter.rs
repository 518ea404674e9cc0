//! Slot Painter - repaint suppression around the layout engine.
//!
//! The only memo in the system: the display text of the last pass. A paint
//! request with the same text is skipped. Geometry itself is never cached;
//! anything that changes it (slot count, style, canvas size) must call
//! `invalidate` first.

use crate::draw::DrawSurface;
use crate::layout::paint_slots;
use crate::primitives::Size;
use crate::style::SlotStyle;
use crate::text_measure::TextMeasure;

#[derive(Debug, Default)]
pub struct SlotPainter {
    last_painted: Option<String>,
}

impl SlotPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the next `paint` to run.
    pub fn invalidate(&mut self) {
        self.last_painted = None;
    }

    /// Whether a paint with `text` would actually run.
    pub fn needs_paint(&self, text: &str) -> bool {
        self.last_painted.as_deref() != Some(text)
    }

    /// Paint unless `text` equals the last painted display text.
    ///
    /// Returns true if the layout pass ran.
    pub fn paint(
        &mut self,
        text: &str,
        slot_count: usize,
        style: &SlotStyle,
        canvas: Size,
        measure: &dyn TextMeasure,
        surface: &mut dyn DrawSurface,
    ) -> bool {
        if !self.needs_paint(text) {
            tracing::trace!(text, "display text unchanged, skipping repaint");
            return false;
        }
        paint_slots(text, slot_count, style, canvas, measure, surface);
        self.last_painted = Some(text.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommandSet;
    use crate::text_measure::MonospaceMeasure;

    const CANVAS: Size = Size::new(240.0, 40.0);

    #[test]
    fn test_second_paint_with_same_text_is_skipped() {
        let mut painter = SlotPainter::new();
        let mut surface = DrawCommandSet::new();
        let style = SlotStyle::default();

        assert!(painter.paint("12", 4, &style, CANVAS, &MonospaceMeasure, &mut surface));
        assert!(!painter.paint("12", 4, &style, CANVAS, &MonospaceMeasure, &mut surface));
        assert_eq!(surface.passes(), 1);
        // The skipped pass leaves the previous commands in place.
        assert_eq!(surface.glyphs().count(), 2);
    }

    #[test]
    fn test_changed_text_repaints() {
        let mut painter = SlotPainter::new();
        let mut surface = DrawCommandSet::new();
        let style = SlotStyle::default();

        painter.paint("1", 4, &style, CANVAS, &MonospaceMeasure, &mut surface);
        painter.paint("12", 4, &style, CANVAS, &MonospaceMeasure, &mut surface);
        assert_eq!(surface.passes(), 2);
    }

    #[test]
    fn test_invalidate_forces_repaint() {
        let mut painter = SlotPainter::new();
        let mut surface = DrawCommandSet::new();
        let style = SlotStyle::default();

        painter.paint("", 4, &style, CANVAS, &MonospaceMeasure, &mut surface);
        assert!(!painter.needs_paint(""));
        painter.invalidate();
        assert!(painter.needs_paint(""));
        assert!(painter.paint("", 4, &style, CANVAS, &MonospaceMeasure, &mut surface));
        assert_eq!(surface.passes(), 2);
    }
}
