//! Range-boundary markers with a semicircular grab handle.

use std::f32::consts::FRAC_PI_2;

use stave_render::{Color, Painter, Point, Rect, Size};

use crate::item::Item;
use crate::rectangle::Rectangle;

/// Pointer slack around the marker body, in pixels at scale 1.0.
const HIT_TOLERANCE: f32 = 2.0;

/// Which end of a range the marker sits on. The grab handle points into the
/// range: right of a start marker, left of an end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryEdge {
    Start,
    End,
}

/// A thin vertical marker at a range boundary, with a semicircular handle
/// the user can grab.
///
/// The bounding box expands asymmetrically on the handle side so the handle
/// is redrawn with the marker; hit-testing accepts a small pixel tolerance
/// multiplied by the UI scale.
#[derive(Debug, Clone)]
pub struct BoundaryMarker {
    body: Rectangle,
    edge: BoundaryEdge,
    handle_radius: f32,
    handle_color: Color,
}

impl BoundaryMarker {
    /// Create a marker with the given body geometry.
    pub fn new(rect: Rect, edge: BoundaryEdge, color: Color) -> Self {
        Self {
            body: Rectangle::new(rect).with_fill(color),
            edge,
            handle_radius: 5.0,
            handle_color: color,
        }
    }

    /// Set the handle radius (pixels at scale 1.0).
    pub fn set_handle_radius(&mut self, radius: f32) {
        self.handle_radius = radius;
    }

    pub fn set_handle_color(&mut self, color: Color) {
        self.handle_color = color;
    }

    /// The marker body.
    pub fn body(&self) -> &Rectangle {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Rectangle {
        &mut self.body
    }

    /// Center of the grab handle, on the body's inward edge at mid-height.
    fn handle_center(&self) -> Point {
        let rect = self.body.rect();
        let x = match self.edge {
            BoundaryEdge::Start => rect.right(),
            BoundaryEdge::End => rect.left(),
        };
        Point::new(x, rect.center().y)
    }
}

impl Item for BoundaryMarker {
    fn size_request(&self) -> Size {
        self.body.size_request()
    }

    fn bounding_box(&self) -> Option<Rect> {
        // The handle protrudes on one side only.
        let bb = self.body.bounding_box()?;
        Some(match self.edge {
            BoundaryEdge::Start => bb.inflate_sides(0.0, 0.0, self.handle_radius, 0.0),
            BoundaryEdge::End => bb.inflate_sides(self.handle_radius, 0.0, 0.0, 0.0),
        })
    }

    fn render(&self, origin: Point, painter: &mut dyn Painter, scale: f32) {
        self.body.render(origin, painter);

        let center = self.handle_center().translate(origin);
        // Half circle facing into the range.
        let (start, end) = match self.edge {
            BoundaryEdge::Start => (-FRAC_PI_2, FRAC_PI_2),
            BoundaryEdge::End => (FRAC_PI_2, 3.0 * FRAC_PI_2),
        };
        painter.fill_arc(center, self.handle_radius * scale, start, end, self.handle_color);
    }

    fn covers(&self, point: Point, scale: f32) -> bool {
        let tolerance = HIT_TOLERANCE * scale;
        if self.body.rect().inflate(tolerance).contains(point) {
            return true;
        }
        point.distance(self.handle_center()) <= self.handle_radius * scale + tolerance
    }

    fn size_allocate(&mut self, size: Size) {
        self.body.set_size(size);
    }
}
