//! Slot Layout Engine
//!
//! Pure mapping from (display text, slot count, style, canvas size) to draw
//! calls. One geometry branch per `SlotStyle` variant; all three share the
//! glyph policy:
//!
//! - slot `i` shows the obscure glyph if masking is on, else the `i`-th char;
//! - the glyph is centred horizontally in the slot;
//! - vertically, every glyph uses one shared `y`, computed from the height of
//!   the first glyph measured in the pass.
//!
//! Slots past the end of the display text draw only their border or line (and
//! a hint character, if the style has one).

use crate::draw::DrawSurface;
use crate::primitives::{Color, Point, Rect, Size};
use crate::style::{BoxLooseStyle, BoxTightStyle, SlotStyle, UnderlineStyle};
use crate::text_measure::{TextMeasure, TextStyle};

/// Width of one slot for the given style.
pub fn slot_width(slot_count: usize, style: &SlotStyle, canvas_width: f32) -> f32 {
    let n = slot_count as f32;
    match style {
        SlotStyle::Underline(s) => (canvas_width - (n - 1.0) * s.gap) / n,
        SlotStyle::BoxTight(s) => (canvas_width - s.stroke_width * (n + 1.0)) / n,
        SlotStyle::BoxLoose(s) => (canvas_width - 2.0 * s.stroke_width * n - (n - 1.0) * s.gap) / n,
    }
}

/// Bounds of every slot, left to right.
///
/// - Underline: the horizontal extent of each segment, full canvas height.
/// - BoxTight: the interior cell between two separators (or outer border).
/// - BoxLoose: the stroked rectangle of each box (stroke centred on its edge).
pub fn slot_bounds(slot_count: usize, style: &SlotStyle, canvas: Size) -> Vec<Rect> {
    let s = slot_width(slot_count, style, canvas.width);
    (0..slot_count)
        .map(|i| {
            let i = i as f32;
            match style {
                SlotStyle::Underline(u) => Rect::new(i * (s + u.gap), 0.0, s, canvas.height),
                SlotStyle::BoxTight(t) => {
                    let w = t.stroke_width;
                    Rect::new(w * (i + 1.0) + s * i, w, s, canvas.height - 2.0 * w)
                }
                SlotStyle::BoxLoose(l) => {
                    let w = l.stroke_width;
                    Rect::new(
                        w / 2.0 + i * (s + l.gap + 2.0 * w),
                        w / 2.0,
                        s + w,
                        canvas.height - w,
                    )
                }
            }
        })
        .collect()
}

/// Run one layout pass and issue its draw calls.
pub fn paint_slots(
    display: &str,
    slot_count: usize,
    style: &SlotStyle,
    canvas: Size,
    measure: &dyn TextMeasure,
    surface: &mut dyn DrawSurface,
) {
    let entered = display.chars().count();
    let bounds = slot_bounds(slot_count, style, canvas);
    tracing::trace!(slot_count, entered, width = canvas.width, height = canvas.height, "slot layout pass");

    surface.begin_pass();
    match style {
        SlotStyle::Underline(u) => draw_underlines(u, &bounds, entered, canvas, surface),
        SlotStyle::BoxTight(t) => {
            let s = slot_width(slot_count, style, canvas.width);
            draw_box_tight(t, slot_count, s, canvas, surface)
        }
        SlotStyle::BoxLoose(l) => draw_box_loose(l, &bounds, entered, surface),
    }
    draw_glyphs(display, style, &bounds, canvas, measure, surface);
}

/// `entered_color` for slots that hold a character, else the base color.
fn slot_color(index: usize, entered: usize, base: Color, entered_color: Option<Color>) -> Color {
    match entered_color {
        Some(color) if index < entered => color,
        _ => base,
    }
}

// =========================================================================
// Variant geometry
// =========================================================================

fn draw_underlines(
    style: &UnderlineStyle,
    bounds: &[Rect],
    entered: usize,
    canvas: Size,
    surface: &mut dyn DrawSurface,
) {
    let y = canvas.height - style.line_height;
    for (i, slot) in bounds.iter().enumerate() {
        let color = slot_color(i, entered, style.color, style.entered_color);
        surface.line(
            Point::new(slot.x, y),
            Point::new(slot.right(), y),
            style.line_height,
            color,
        );
    }
}

fn draw_box_tight(
    style: &BoxTightStyle,
    slot_count: usize,
    s: f32,
    canvas: Size,
    surface: &mut dyn DrawSurface,
) {
    let w = style.stroke_width;
    let outer = Rect::new(0.0, 0.0, canvas.width, canvas.height).inset(w / 2.0);

    if let Some(fill) = style.solid_color {
        surface.fill_rect(outer, style.radius, fill);
    }
    surface.stroke_rect(outer, style.radius, w, style.stroke_color);

    for i in 1..slot_count {
        let i = i as f32;
        let x = s * i + w * i + w / 2.0;
        surface.line(
            Point::new(x, w),
            Point::new(x, canvas.height - w),
            w,
            style.stroke_color,
        );
    }
}

fn draw_box_loose(style: &BoxLooseStyle, bounds: &[Rect], entered: usize, surface: &mut dyn DrawSurface) {
    for (i, slot) in bounds.iter().enumerate() {
        if let Some(fill) = style.solid_color {
            surface.fill_rect(*slot, style.radius, fill);
        }
        let color = slot_color(i, entered, style.stroke_color, style.entered_color);
        surface.stroke_rect(*slot, style.radius, style.stroke_width, color);
    }
}

// =========================================================================
// Glyphs
// =========================================================================

fn draw_glyphs(
    display: &str,
    style: &SlotStyle,
    bounds: &[Rect],
    canvas: Size,
    measure: &dyn TextMeasure,
    surface: &mut dyn DrawSurface,
) {
    let obscure = style.obscure();
    let text_style = style.text_style();
    let mut baseline: Option<f32> = None;
    let mut buf = [0u8; 4];

    let mut entered = 0;
    for (slot, ch) in bounds.iter().zip(display.chars()) {
        let glyph: &str = if obscure.is_enabled() {
            obscure.glyph()
        } else {
            ch.encode_utf8(&mut buf)
        };
        place_glyph(glyph, slot, text_style, &mut baseline, canvas, measure, surface);
        entered += 1;
    }

    if let Some(hint) = style.hint() {
        // Hints get their own shared baseline: they may use another font size.
        let mut hint_baseline: Option<f32> = None;
        for (slot, ch) in bounds.iter().zip(hint.text.chars()).skip(entered) {
            let glyph = ch.encode_utf8(&mut buf);
            place_glyph(glyph, slot, &hint.style, &mut hint_baseline, canvas, measure, surface);
        }
    }
}

fn place_glyph(
    glyph: &str,
    slot: &Rect,
    style: &TextStyle,
    baseline: &mut Option<f32>,
    canvas: Size,
    measure: &dyn TextMeasure,
    surface: &mut dyn DrawSurface,
) {
    let size = measure.measure(glyph, style);
    let y = *baseline.get_or_insert(canvas.height / 2.0 - size.height / 2.0);
    let x = slot.center().x - size.width / 2.0;
    surface.text(glyph, Point::new(x, y), style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCommand, DrawCommandSet};
    use crate::style::ObscureSpec;
    use crate::text_measure::MonospaceMeasure;

    const EPS: f32 = 1e-3;
    const CANVAS: Size = Size::new(300.0, 50.0);

    const BASE: Color = Color::BLACK;
    const ENTERED: Color = Color::rgb(1.0, 0.0, 0.0);

    fn underline(entered_color: Option<Color>) -> SlotStyle {
        SlotStyle::Underline(UnderlineStyle {
            color: BASE,
            entered_color,
            line_height: 2.0,
            gap: 12.0,
            ..Default::default()
        })
    }

    fn tight() -> SlotStyle {
        SlotStyle::BoxTight(BoxTightStyle {
            stroke_color: BASE,
            stroke_width: 2.0,
            radius: 4.0,
            solid_color: Some(Color::WHITE),
            ..Default::default()
        })
    }

    fn loose(entered_color: Option<Color>) -> SlotStyle {
        SlotStyle::BoxLoose(BoxLooseStyle {
            stroke_color: BASE,
            entered_color,
            stroke_width: 2.0,
            radius: 4.0,
            gap: 10.0,
            ..Default::default()
        })
    }

    fn run(display: &str, n: usize, style: &SlotStyle) -> DrawCommandSet {
        let mut set = DrawCommandSet::new();
        paint_slots(display, n, style, CANVAS, &MonospaceMeasure, &mut set);
        set
    }

    fn line_colors(set: &DrawCommandSet) -> Vec<Color> {
        set.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    fn stroke_rects(set: &DrawCommandSet) -> Vec<(Rect, Color)> {
        set.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokeRect { rect, color, .. } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    #[test]
    fn test_underline_slot_geometry() {
        let style = underline(None);
        let s = slot_width(4, &style, 300.0);
        assert!((s - (300.0 - 3.0 * 12.0) / 4.0).abs() < EPS);

        let bounds = slot_bounds(4, &style, CANVAS);
        assert!((bounds[1].x - (s + 12.0)).abs() < EPS);
        assert!((bounds[3].right() - 300.0).abs() < EPS);
    }

    #[test]
    fn test_underline_lines_at_bottom() {
        let set = run("", 4, &underline(None));
        let lines: Vec<_> = set
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { p1, p2, thickness, .. } => Some((*p1, *p2, *thickness)),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 4);
        for (p1, p2, thickness) in lines {
            assert_eq!(p1.y, 48.0);
            assert_eq!(p2.y, 48.0);
            assert_eq!(thickness, 2.0);
        }
    }

    #[test]
    fn test_box_tight_draws_outer_and_dividers() {
        let set = run("12", 4, &tight());
        let cmds = set.commands();
        assert!(matches!(cmds[0], DrawCommand::FillRect { .. }));
        match cmds[1] {
            DrawCommand::StrokeRect { rect, stroke_width, .. } => {
                assert_eq!(rect, Rect::new(1.0, 1.0, 298.0, 48.0));
                assert_eq!(stroke_width, 2.0);
            }
            ref other => panic!("expected outer border, got {other:?}"),
        }
        assert_eq!(line_colors(&set).len(), 3);
    }

    #[test]
    fn test_box_tight_divider_offsets() {
        let style = tight();
        let s = slot_width(4, &style, 300.0);
        assert!((s - (300.0 - 2.0 * 5.0) / 4.0).abs() < EPS);

        let set = run("", 4, &style);
        let xs: Vec<f32> = set
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { p1, p2, .. } => {
                    assert_eq!(p1.x, p2.x);
                    assert_eq!(p1.y, 2.0);
                    assert_eq!(p2.y, 48.0);
                    Some(p1.x)
                }
                _ => None,
            })
            .collect();
        for (k, x) in xs.iter().enumerate() {
            let i = (k + 1) as f32;
            assert!((x - (s * i + 2.0 * i + 1.0)).abs() < EPS);
        }
    }

    #[test]
    fn test_box_tight_has_uniform_border_color() {
        let set = run("123", 4, &tight());
        assert!(line_colors(&set).iter().all(|c| *c == BASE));
        assert!(stroke_rects(&set).iter().all(|(_, c)| *c == BASE));
    }

    #[test]
    fn test_box_loose_right_edge_matches_canvas() {
        for n in 1..9 {
            for (w, g) in [(1.0, 0.0), (2.0, 10.0), (3.5, 7.25)] {
                let style = SlotStyle::BoxLoose(BoxLooseStyle {
                    stroke_width: w,
                    gap: g,
                    ..Default::default()
                });
                let bounds = slot_bounds(n, &style, CANVAS);
                let last = bounds.last().unwrap();
                assert!(
                    (last.right() - (CANVAS.width - w / 2.0)).abs() < EPS,
                    "n={n} w={w} g={g} right={}",
                    last.right()
                );
                assert!((bounds[0].x - w / 2.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_box_loose_fill_before_stroke() {
        let style = SlotStyle::BoxLoose(BoxLooseStyle {
            solid_color: Some(Color::WHITE),
            ..Default::default()
        });
        let set = run("", 2, &style);
        assert!(matches!(set.commands()[0], DrawCommand::FillRect { .. }));
        assert!(matches!(set.commands()[1], DrawCommand::StrokeRect { .. }));
        assert_eq!(set.len(), 4);
    }

    // =========================================================================
    // Entered coloring
    // =========================================================================

    #[test]
    fn test_underline_entered_colors() {
        let n = 4;
        for (display, entered) in [("", 0), ("1", 1), ("123", 3), ("1234", 4)] {
            let colors = line_colors(&run(display, n, &underline(Some(ENTERED))));
            for (i, c) in colors.iter().enumerate() {
                let expected = if i < entered { ENTERED } else { BASE };
                assert_eq!(*c, expected, "display={display:?} slot={i}");
            }
        }
    }

    #[test]
    fn test_box_loose_entered_colors() {
        let n = 4;
        for (display, entered) in [("", 0), ("1", 1), ("123", 3), ("1234", 4)] {
            let rects = stroke_rects(&run(display, n, &loose(Some(ENTERED))));
            assert_eq!(rects.len(), n);
            for (i, (_, c)) in rects.iter().enumerate() {
                let expected = if i < entered { ENTERED } else { BASE };
                assert_eq!(*c, expected, "display={display:?} slot={i}");
            }
        }
    }

    #[test]
    fn test_no_entered_color_uses_base() {
        let colors = line_colors(&run("1234", 4, &underline(None)));
        assert!(colors.iter().all(|c| *c == BASE));
        let rects = stroke_rects(&run("1234", 4, &loose(None)));
        assert!(rects.iter().all(|(_, c)| *c == BASE));
    }

    // =========================================================================
    // Glyphs
    // =========================================================================

    #[test]
    fn test_glyphs_centered_in_slots() {
        for style in [underline(None), tight(), loose(None)] {
            let set = run("123", 6, &style);
            let bounds = slot_bounds(6, &style, CANVAS);
            let glyphs: Vec<_> = set.glyphs().collect();
            assert_eq!(glyphs.len(), 3);
            for (i, (text, pos)) in glyphs.iter().enumerate() {
                let size = MonospaceMeasure.measure(text, style.text_style());
                assert!((pos.x + size.width / 2.0 - bounds[i].center().x).abs() < EPS);
                assert!((pos.y - (CANVAS.height / 2.0 - size.height / 2.0)).abs() < EPS);
            }
            assert_eq!(
                glyphs.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
                vec!["1", "2", "3"]
            );
        }
    }

    #[test]
    fn test_shared_baseline_from_first_glyph() {
        struct TallFirst;
        impl TextMeasure for TallFirst {
            fn measure(&self, text: &str, _style: &TextStyle) -> Size {
                if text == "1" { Size::new(10.0, 40.0) } else { Size::new(10.0, 10.0) }
            }
        }
        let mut set = DrawCommandSet::new();
        paint_slots("123", 3, &underline(None), CANVAS, &TallFirst, &mut set);
        let ys: Vec<f32> = set.glyphs().map(|(_, p)| p.y).collect();
        assert_eq!(ys, vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_obscured_glyphs() {
        let style = loose(None).with_obscure(ObscureSpec::masked("●").unwrap());
        let set = run("42", 6, &style);
        let texts: Vec<&str> = set.glyphs().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["●", "●"]);
    }

    #[test]
    fn test_multibyte_glyphs_not_split() {
        let set = run("é😀", 4, &loose(None));
        let texts: Vec<&str> = set.glyphs().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["é", "😀"]);
    }

    #[test]
    fn test_hint_fills_empty_slots_only() {
        let style = loose(None).with_hint(Some(crate::style::HintSpec::new("------")));
        let set = run("12", 4, &style);
        let texts: Vec<&str> = set.glyphs().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["1", "2", "-", "-"]);
    }

    #[test]
    fn test_short_hint_leaves_trailing_slots_blank() {
        let style = underline(None).with_hint(Some(crate::style::HintSpec::new("ab")));
        let set = run("", 4, &style);
        let texts: Vec<&str> = set.glyphs().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_layout_is_deterministic() {
        for style in [underline(Some(ENTERED)), tight(), loose(Some(ENTERED))] {
            let first = run("1234", 6, &style);
            let second = run("1234", 6, &style);
            assert_eq!(first, second);
        }
    }
}
