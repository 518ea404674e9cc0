//! Draw Surface - the primitive drawing capability and its recording form.
//!
//! The layout engine never talks to a renderer directly. It issues strokes,
//! fills, lines and positioned glyphs against a `DrawSurface`. A
//! `DrawCommandSet` records those calls in order, which is what the host
//! replays onto its own canvas (and what tests compare).

use crate::primitives::{Color, Point, Rect};
use crate::text_measure::TextStyle;

/// Primitive drawing operations the slot layout needs.
pub trait DrawSurface {
    /// Called once at the start of every layout pass.
    fn begin_pass(&mut self) {}

    /// Stroke the outline of a (optionally rounded) rectangle.
    ///
    /// The stroke is centred on the rectangle's edges.
    fn stroke_rect(&mut self, rect: Rect, corner_radius: f32, stroke_width: f32, color: Color);

    /// Fill a (optionally rounded) rectangle.
    fn fill_rect(&mut self, rect: Rect, corner_radius: f32, color: Color);

    /// Draw a straight line segment.
    fn line(&mut self, p1: Point, p2: Point, thickness: f32, color: Color);

    /// Draw a string with its top-left corner at `position`.
    fn text(&mut self, text: &str, position: Point, style: &TextStyle);
}

/// One recorded draw operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    StrokeRect {
        rect: Rect,
        corner_radius: f32,
        stroke_width: f32,
        color: Color,
    },
    FillRect {
        rect: Rect,
        corner_radius: f32,
        color: Color,
    },
    Line {
        p1: Point,
        p2: Point,
        thickness: f32,
        color: Color,
    },
    Glyph {
        text: String,
        position: Point,
        style: TextStyle,
    },
}

/// Ordered output of one layout pass.
///
/// `begin_pass` clears the previous pass and bumps `passes`, so a host can
/// tell whether a paint actually ran.
#[derive(Debug, Default, Clone)]
pub struct DrawCommandSet {
    commands: Vec<DrawCommand>,
    passes: usize,
}

impl PartialEq for DrawCommandSet {
    fn eq(&self, other: &Self) -> bool {
        self.commands == other.commands
    }
}

impl DrawCommandSet {
    /// Create an empty command set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands, in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of layout passes recorded into this set.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All glyph commands, in draw order.
    pub fn glyphs(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Glyph { text, position, .. } => Some((text.as_str(), *position)),
            _ => None,
        })
    }

    /// Replay every recorded command onto another surface.
    pub fn replay(&self, target: &mut dyn DrawSurface) {
        target.begin_pass();
        for cmd in &self.commands {
            match cmd {
                DrawCommand::StrokeRect { rect, corner_radius, stroke_width, color } => {
                    target.stroke_rect(*rect, *corner_radius, *stroke_width, *color)
                }
                DrawCommand::FillRect { rect, corner_radius, color } => {
                    target.fill_rect(*rect, *corner_radius, *color)
                }
                DrawCommand::Line { p1, p2, thickness, color } => {
                    target.line(*p1, *p2, *thickness, *color)
                }
                DrawCommand::Glyph { text, position, style } => target.text(text, *position, style),
            }
        }
    }
}

impl DrawSurface for DrawCommandSet {
    fn begin_pass(&mut self) {
        self.commands.clear();
        self.passes += 1;
    }

    #[inline]
    fn stroke_rect(&mut self, rect: Rect, corner_radius: f32, stroke_width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            corner_radius,
            stroke_width,
            color,
        });
    }

    #[inline]
    fn fill_rect(&mut self, rect: Rect, corner_radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            corner_radius,
            color,
        });
    }

    #[inline]
    fn line(&mut self, p1: Point, p2: Point, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            p1,
            p2,
            thickness,
            color,
        });
    }

    #[inline]
    fn text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Glyph {
            text: text.to_string(),
            position,
            style: *style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_pass_clears_and_counts() {
        let mut set = DrawCommandSet::new();
        set.begin_pass();
        set.line(Point::ORIGIN, Point::new(10.0, 0.0), 2.0, Color::BLACK);
        assert_eq!(set.len(), 1);

        set.begin_pass();
        assert!(set.is_empty());
        assert_eq!(set.passes(), 2);
    }

    #[test]
    fn test_commands_keep_order() {
        let mut set = DrawCommandSet::new();
        set.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 2.0, Color::WHITE);
        set.stroke_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 2.0, 1.0, Color::BLACK);
        set.text("1", Point::new(3.0, 1.0), &TextStyle::default());

        assert!(matches!(set.commands()[0], DrawCommand::FillRect { .. }));
        assert!(matches!(set.commands()[1], DrawCommand::StrokeRect { .. }));
        assert_eq!(set.glyphs().collect::<Vec<_>>(), vec![("1", Point::new(3.0, 1.0))]);
    }

    #[test]
    fn test_replay_reproduces_commands() {
        let mut source = DrawCommandSet::new();
        source.begin_pass();
        source.line(Point::ORIGIN, Point::new(5.0, 5.0), 1.0, Color::GREY);
        source.text("9", Point::new(1.0, 1.0), &TextStyle::default());

        let mut target = DrawCommandSet::new();
        source.replay(&mut target);
        assert_eq!(source, target);
        assert_eq!(target.passes(), 1);
    }
}
