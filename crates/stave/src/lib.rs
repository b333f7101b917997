//! 2D canvas scene graph and layout engine for audio-editor surfaces.
//!
//! Stave provides the presentation-layer canvas of a digital audio
//! workstation: a tree of drawable items with lazy bounding boxes, a pair of
//! packing containers, and the editor decorations built on them.
//!
//! # Key Types
//!
//! - [`SceneTree`] — owns every item, drives layout, rendering, hit testing
//! - [`Rectangle`] — drawable rectangle with per-side outline and fill
//! - [`BoxItem`] — single-axis container (rows or columns)
//! - [`Table`] — two-axis grid container with cell spans
//! - [`Item`] — the trait custom leaf items implement
//!
//! # Layout Model
//!
//! Containers measure children bottom-up through `size_request` and push
//! allocations top-down; the passes never interleave. Layout is lazy: tree
//! mutations queue the affected container and
//! [`SceneTree::flush_layout`] drains the queue before the next paint.
//! Bounding boxes propagate bottom-up behind dirty flags, so repeated
//! queries between mutations cost nothing.
//!
//! # Example
//!
//! ```
//! use stave::{BoxItem, Rectangle, SceneTree};
//! use stave_render::{Point, Rect, Size};
//!
//! let mut tree = SceneTree::new();
//! let row = tree.insert(BoxItem::horizontal());
//! tree.update_box(row, |b| b.set_spacing(4.0));
//!
//! for width in [10.0, 20.0, 30.0] {
//!     let child = tree.insert(Rectangle::new(Rect::new(0.0, 0.0, width, 5.0)));
//!     tree.add_child(row, child).unwrap();
//! }
//!
//! tree.flush_layout();
//! assert_eq!(tree.size_request(row), Size::new(68.0, 5.0));
//! assert_eq!(tree.position(tree.children(row)[2]), Point::new(38.0, 0.0));
//! ```

mod error;
mod item;
mod layout;
mod rectangle;
pub mod widgets;

pub use error::{SceneError, SceneResult};
pub use item::{BoundingBoxCache, ChangeGuard, Item, ItemId, ItemKind, SceneTree};
pub use layout::{
    BoxItem, CellCoord, DEFAULT_SPACING, Margins, Orientation, PackOptions, Table,
};
pub use rectangle::{Rectangle, Sides};

// Re-export the primitives crate so downstreams need only one dependency.
pub use stave_render as render;
