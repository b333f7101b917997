//! Items: the things a scene tree holds.
//!
//! Built-in shapes and containers are stored as [`ItemKind`] variants so the
//! tree can dispatch layout and rendering without virtual calls; anything
//! else (editor widgets, application decorations) implements the [`Item`]
//! trait and is stored behind `ItemKind::Widget`.

mod cache;
mod tree;

pub use cache::BoundingBoxCache;
pub use tree::{ChangeGuard, ItemId, SceneTree};

use std::fmt;

use stave_render::{Painter, Point, Rect, Size};

use crate::layout::{BoxItem, Table};
use crate::rectangle::Rectangle;

/// A custom drawable leaf.
///
/// Implementors provide their natural size, drawable extent, and rendering;
/// hit testing and allocation have workable defaults. All geometry is
/// item-local; the owning node's position places the item in its parent.
///
/// The UI scale factor is always passed in explicitly — items must not
/// consult process-wide state to size their hit regions or decorations.
pub trait Item: fmt::Debug {
    /// The size this item would like to occupy absent external constraint.
    fn size_request(&self) -> Size;

    /// The smallest rectangle enclosing everything this item draws, in local
    /// coordinates. `None` means the item has no extent.
    fn bounding_box(&self) -> Option<Rect>;

    /// Draw the item translated to `origin` (window space).
    fn render(&self, origin: Point, painter: &mut dyn Painter, scale: f32);

    /// Hit-test a point in local coordinates.
    fn covers(&self, point: Point, scale: f32) -> bool {
        let _ = scale;
        self.bounding_box().is_some_and(|b| b.contains(point))
    }

    /// Accept an allocation from a parent container. Items with fixed
    /// content may ignore it.
    fn size_allocate(&mut self, size: Size) {
        let _ = size;
    }
}

/// The payload stored for each node in the tree.
#[derive(Debug)]
pub enum ItemKind {
    /// A plain drawable rectangle.
    Rect(Rectangle),
    /// A single-axis container.
    Box(BoxItem),
    /// A two-axis grid container.
    Table(Table),
    /// A custom leaf item.
    Widget(Box<dyn Item>),
}

impl ItemKind {
    /// Whether this payload lays out children of its own.
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, ItemKind::Box(_) | ItemKind::Table(_))
    }
}

impl From<Rectangle> for ItemKind {
    fn from(value: Rectangle) -> Self {
        Self::Rect(value)
    }
}

impl From<BoxItem> for ItemKind {
    fn from(value: BoxItem) -> Self {
        Self::Box(value)
    }
}

impl From<Table> for ItemKind {
    fn from(value: Table) -> Self {
        Self::Table(value)
    }
}
