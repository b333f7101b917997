//! Axis-aligned rectangle item with per-side outline and fill.

use bitflags::bitflags;
use stave_render::{Color, Painter, Point, Rect, Size, Stroke};

/// Half-pixel inset added around outlined edges so a stroke centered on the
/// rect boundary stays inside the reported bounding box.
const OUTLINE_INSET: f32 = 0.5;

bitflags! {
    /// The subset of a rectangle's edges that carry an outline.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Sides: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
        const ALL = Self::LEFT.bits() | Self::RIGHT.bits() | Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl Default for Sides {
    fn default() -> Self {
        Self::ALL
    }
}

/// A drawable axis-aligned rectangle.
///
/// `Rectangle` is both a leaf item in its own right and the backing shape of
/// the container items, which draw their decoration through it. The rect is
/// in item-local coordinates; the owning node's position places it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    rect: Rect,
    fill: Option<Color>,
    outline: Option<Color>,
    outline_width: f32,
    outline_sides: Sides,
    corner_radius: f32,
}

impl Rectangle {
    /// Create a rectangle with the given local geometry and no styling.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            fill: None,
            outline: None,
            outline_width: 1.0,
            outline_sides: Sides::ALL,
            corner_radius: 0.0,
        }
    }

    /// Builder-style fill color.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Builder-style outline color and width on all sides.
    pub fn with_outline(mut self, color: Color, width: f32) -> Self {
        self.outline = Some(color);
        self.outline_width = width;
        self
    }

    /// Builder-style corner radius.
    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    /// The local geometry.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Replace the local geometry. Returns true if it actually changed.
    pub fn set_rect(&mut self, rect: Rect) -> bool {
        if self.rect != rect {
            self.rect = rect;
            true
        } else {
            false
        }
    }

    /// Resize, keeping the origin. Returns true if the size changed.
    pub fn set_size(&mut self, size: Size) -> bool {
        self.set_rect(Rect {
            origin: self.rect.origin,
            size,
        })
    }

    /// Set or clear the fill color.
    pub fn set_fill(&mut self, fill: Option<Color>) {
        self.fill = fill;
    }

    /// Set or clear the outline color.
    pub fn set_outline(&mut self, outline: Option<Color>) {
        self.outline = outline;
    }

    /// Set the outline width.
    pub fn set_outline_width(&mut self, width: f32) {
        self.outline_width = width;
    }

    /// Choose which edges carry the outline.
    pub fn set_outline_sides(&mut self, sides: Sides) {
        self.outline_sides = sides;
    }

    /// Set the corner radius used when filling.
    pub fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = radius;
    }

    /// The extent the outline adds beyond the rect on outlined edges, zero
    /// when no outline is drawn.
    #[inline]
    pub fn outline_extent(&self) -> f32 {
        if self.outline.is_some() && !self.outline_sides.is_empty() {
            self.outline_width + OUTLINE_INSET
        } else {
            0.0
        }
    }

    /// Natural size: the rect's own dimensions.
    #[inline]
    pub fn size_request(&self) -> Size {
        self.rect.size
    }

    /// The drawable extent in local coordinates: the rect expanded by the
    /// outline extent on every outlined edge.
    pub fn bounding_box(&self) -> Option<Rect> {
        let e = self.outline_extent();
        if e == 0.0 {
            return Some(self.rect);
        }
        let sides = self.outline_sides;
        Some(self.rect.inflate_sides(
            if sides.contains(Sides::LEFT) { e } else { 0.0 },
            if sides.contains(Sides::TOP) { e } else { 0.0 },
            if sides.contains(Sides::RIGHT) { e } else { 0.0 },
            if sides.contains(Sides::BOTTOM) { e } else { 0.0 },
        ))
    }

    /// Point containment against the local rect.
    #[inline]
    pub fn covers(&self, point: Point) -> bool {
        self.rect.contains(point)
    }

    /// Draw the rectangle translated to `origin` (window space).
    pub fn render(&self, origin: Point, painter: &mut dyn Painter) {
        let rect = self.rect.translate(origin);

        if let Some(fill) = self.fill {
            if self.corner_radius > 0.0 {
                painter.fill_rounded_rect(rect, self.corner_radius, fill);
            } else {
                painter.fill_rect(rect, fill);
            }
        }

        if let Some(color) = self.outline {
            let stroke = Stroke::new(color, self.outline_width);
            if self.outline_sides == Sides::ALL {
                painter.stroke_rect(rect, &stroke);
            } else {
                let tl = Point::new(rect.left(), rect.top());
                let tr = Point::new(rect.right(), rect.top());
                let bl = Point::new(rect.left(), rect.bottom());
                let br = Point::new(rect.right(), rect.bottom());
                if self.outline_sides.contains(Sides::LEFT) {
                    painter.stroke_line(tl, bl, &stroke);
                }
                if self.outline_sides.contains(Sides::RIGHT) {
                    painter.stroke_line(tr, br, &stroke);
                }
                if self.outline_sides.contains(Sides::TOP) {
                    painter.stroke_line(tl, tr, &stroke);
                }
                if self.outline_sides.contains(Sides::BOTTOM) {
                    painter.stroke_line(bl, br, &stroke);
                }
            }
        }
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new(Rect::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stave_render::{DrawCommand, RecordingPainter};

    #[test]
    fn bounding_box_without_outline_is_the_rect() {
        let r = Rectangle::new(Rect::new(2.0, 3.0, 10.0, 5.0));
        assert_eq!(r.bounding_box(), Some(Rect::new(2.0, 3.0, 10.0, 5.0)));
    }

    #[test]
    fn bounding_box_inflates_by_outline_and_inset() {
        let r = Rectangle::new(Rect::new(0.0, 0.0, 10.0, 10.0)).with_outline(Color::BLACK, 2.0);
        // 2.0 width + 0.5 inset on every side
        assert_eq!(r.bounding_box(), Some(Rect::new(-2.5, -2.5, 15.0, 15.0)));
    }

    #[test]
    fn bounding_box_inflates_only_outlined_sides() {
        let mut r = Rectangle::new(Rect::new(0.0, 0.0, 10.0, 10.0)).with_outline(Color::BLACK, 1.0);
        r.set_outline_sides(Sides::BOTTOM);
        let bb = r.bounding_box().unwrap();
        assert_eq!(bb.top(), 0.0);
        assert_eq!(bb.left(), 0.0);
        assert_eq!(bb.bottom(), 11.5);
    }

    #[test]
    fn outline_extent_is_zero_without_outline_color() {
        let mut r = Rectangle::new(Rect::new(0.0, 0.0, 4.0, 4.0));
        r.set_outline_width(3.0);
        assert_eq!(r.outline_extent(), 0.0);
    }

    #[test]
    fn render_emits_fill_then_partial_outline() {
        let mut r = Rectangle::new(Rect::new(0.0, 0.0, 8.0, 4.0)).with_fill(Color::RED);
        r.set_outline(Some(Color::BLACK));
        r.set_outline_sides(Sides::TOP | Sides::BOTTOM);

        let mut p = RecordingPainter::new();
        r.render(Point::new(10.0, 0.0), &mut p);

        assert!(matches!(
            p.commands()[0],
            DrawCommand::FillRect { rect, .. } if rect == Rect::new(10.0, 0.0, 8.0, 4.0)
        ));
        let lines = p
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeLine { .. }))
            .count();
        assert_eq!(lines, 2);
    }

    #[test]
    fn set_rect_reports_change() {
        let mut r = Rectangle::new(Rect::new(0.0, 0.0, 8.0, 4.0));
        assert!(!r.set_rect(Rect::new(0.0, 0.0, 8.0, 4.0)));
        assert!(r.set_size(Size::new(9.0, 4.0)));
    }
}
