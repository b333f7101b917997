//! The painting backend abstraction.
//!
//! The canvas issues all of its drawing through the [`Painter`] trait, which
//! covers exactly the capability set the item set needs: rectangle fill and
//! stroke, line stroke, rounded-rectangle fill, and arc fill. Concrete
//! backends (Cairo, GPU, software) implement this trait; tests use
//! [`RecordingPainter`] to capture the command stream instead of rasterizing.

use crate::color::Color;
use crate::types::{Point, Rect};

/// Outline style: color and line width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    /// Create a new stroke.
    #[inline]
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// The drawing surface the canvas renders into.
///
/// Coordinates are in window space; the canvas translates item-local
/// geometry before issuing calls.
pub trait Painter {
    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke the outline of a rectangle.
    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke);

    /// Stroke a straight line segment.
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke);

    /// Fill a rectangle with rounded corners.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color);

    /// Fill a circular arc (pie slice) around `center`.
    ///
    /// Angles are in radians, measured clockwise from the positive x axis
    /// (y grows downward).
    fn fill_arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32, color: Color);
}

/// A single captured drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        stroke: Stroke,
    },
    StrokeLine {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f32,
        color: Color,
    },
    FillArc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
    },
}

/// A [`Painter`] that records commands instead of drawing.
///
/// Useful for unit tests and for capturing a frame's draw list headlessly.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    commands: Vec<DrawCommand>,
}

impl RecordingPainter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands recorded so far, in issue order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Painter for RecordingPainter {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            stroke: *stroke,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            stroke: *stroke,
        });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillRoundedRect {
            rect,
            radius,
            color,
        });
    }

    fn fill_arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32, color: Color) {
        self.commands.push(DrawCommand::FillArc {
            center,
            radius,
            start_angle,
            end_angle,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_captures_in_order() {
        let mut p = RecordingPainter::new();
        p.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::RED);
        p.stroke_line(Point::ZERO, Point::new(4.0, 0.0), &Stroke::default());

        assert_eq!(p.commands().len(), 2);
        assert!(matches!(p.commands()[0], DrawCommand::FillRect { .. }));
        assert!(matches!(p.commands()[1], DrawCommand::StrokeLine { .. }));

        p.clear();
        assert!(p.commands().is_empty());
    }
}
