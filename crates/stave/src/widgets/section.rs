//! Translucent section overlay.

use stave_render::{Color, Painter, Point, Rect, Size};

use crate::item::Item;
use crate::rectangle::Rectangle;

/// Fill opacity applied to the section color.
const OVERLAY_ALPHA: f32 = 0.15;

/// A translucent overlay spanning a horizontal range of the editor surface,
/// used to mark arrangement sections.
#[derive(Debug, Clone)]
pub struct SectionBox {
    body: Rectangle,
}

impl SectionBox {
    pub fn new(rect: Rect, color: Color) -> Self {
        Self {
            body: Rectangle::new(rect).with_fill(color.with_alpha(OVERLAY_ALPHA)),
        }
    }

    /// Change the covered range.
    pub fn set_rect(&mut self, rect: Rect) {
        self.body.set_rect(rect);
    }

    pub fn body(&self) -> &Rectangle {
        &self.body
    }
}

impl Item for SectionBox {
    fn size_request(&self) -> Size {
        self.body.size_request()
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.body.bounding_box()
    }

    fn render(&self, origin: Point, painter: &mut dyn Painter, _scale: f32) {
        self.body.render(origin, painter);
    }

    fn size_allocate(&mut self, size: Size) {
        self.body.set_size(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stave_render::{DrawCommand, RecordingPainter};

    #[test]
    fn fill_is_translucent() {
        let s = SectionBox::new(Rect::new(0.0, 0.0, 120.0, 80.0), Color::BLUE);
        let mut p = RecordingPainter::new();
        s.render(Point::ZERO, &mut p, 1.0);

        match p.commands()[0] {
            DrawCommand::FillRect { color, .. } => assert!((color.a - 0.15).abs() < 1e-6),
            _ => panic!("expected a fill"),
        }
    }

    #[test]
    fn covers_uses_plain_containment() {
        let s = SectionBox::new(Rect::new(10.0, 0.0, 100.0, 50.0), Color::BLUE);
        assert!(s.covers(Point::new(50.0, 25.0), 1.0));
        assert!(!s.covers(Point::new(5.0, 25.0), 1.0));
    }
}
