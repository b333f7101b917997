//! Container layout for the canvas.
//!
//! This module provides the two container items and the vocabulary they
//! share:
//!
//! - [`BoxItem`] — single-axis sequential packing (rows or columns)
//! - [`Table`] — two-axis grid packing with cell spans
//! - [`PackOptions`] — per-cell expand/fill/shrink flags
//! - [`Margins`] — four-sided spacing with CSS-style shorthand
//! - [`Orientation`] — main-axis selection for box layout
//!
//! # Layout Algorithm
//!
//! Containers use a two-pass algorithm:
//!
//! 1. **Measure (bottom-up)**: each child reports its natural size through
//!    the tree's `size_request`.
//! 2. **Allocate (top-down)**: the container decides a position (and, where
//!    pack options ask for it, a size) for every child and writes it back
//!    through the tree.
//!
//! The passes never interleave; a container's bounding box is only valid
//! after all of its children have been positioned.

mod box_item;
pub(crate) mod table;

pub use box_item::BoxItem;
pub use table::{CellCoord, Table};

use bitflags::bitflags;

/// Layout orientation for box containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Children are arranged left to right.
    #[default]
    Horizontal,
    /// Children are arranged top to bottom.
    Vertical,
}

impl Orientation {
    /// Get the cross (perpendicular) orientation.
    #[inline]
    pub fn cross(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

bitflags! {
    /// Per-cell packing flags controlling how surplus and deficit space is
    /// distributed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PackOptions: u8 {
        /// Claim a share of surplus space on the axis.
        const EXPAND = 1 << 0;
        /// Stretch the item to fill its allocated cell.
        const FILL = 1 << 1;
        /// Claim a share of the deficit when space must be reduced.
        const SHRINK = 1 << 2;
    }
}

/// Four-sided spacing values (margins, padding, per-cell padding).
///
/// Shorthand construction follows the CSS box model through `From`
/// conversions: a single value applies to all four sides, a pair applies
/// horizontally/vertically, and a 4-tuple is `(left, top, right, bottom)`.
///
/// ```
/// use stave::Margins;
///
/// let uniform: Margins = 4.0.into();
/// let pair: Margins = (8.0, 2.0).into(); // horizontal, vertical
/// assert_eq!(uniform.horizontal(), 8.0);
/// assert_eq!(pair.top, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margins {
    /// Create margins with explicit values for each side.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create uniform margins (same value on all sides).
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Create symmetric margins (same horizontal and vertical).
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    /// Zero on all sides.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Total horizontal spacing (left + right).
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical spacing (top + bottom).
    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl From<f32> for Margins {
    fn from(value: f32) -> Self {
        Self::uniform(value)
    }
}

impl From<(f32, f32)> for Margins {
    fn from((horizontal, vertical): (f32, f32)) -> Self {
        Self::symmetric(horizontal, vertical)
    }
}

impl From<(f32, f32, f32, f32)> for Margins {
    fn from((left, top, right, bottom): (f32, f32, f32, f32)) -> Self {
        Self::new(left, top, right, bottom)
    }
}

/// Default gap between consecutive children in a box.
pub const DEFAULT_SPACING: f32 = 0.0;
