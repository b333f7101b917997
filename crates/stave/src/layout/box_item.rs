//! Single-axis container item.

use stave_render::{Painter, Point, Rect, Size};

use crate::item::{ItemId, SceneTree};
use crate::rectangle::Rectangle;

use super::{DEFAULT_SPACING, Margins, Orientation};

/// A container that lays out its children sequentially along one axis.
///
/// Children are packed in insertion order with `spacing` between consecutive
/// children, inside the container's margin and padding. With `homogeneous`
/// set, every child is allocated the maximum natural size over all children;
/// with `collapse_on_hide` set, invisible children contribute no extent
/// (otherwise they keep reserving their natural space).
///
/// Layout runs lazily: adding a child or receiving a child-change
/// notification queues a re-layout on the tree, and nothing is recomputed
/// until [`SceneTree::layout`] or [`SceneTree::flush_layout`] runs.
#[derive(Debug, Clone)]
pub struct BoxItem {
    backing: Rectangle,
    orientation: Orientation,
    spacing: f32,
    padding: Margins,
    margin: Margins,
    homogeneous: bool,
    collapse_on_hide: bool,
    requested: Option<Size>,
}

impl BoxItem {
    /// Create a box with the given orientation.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            backing: Rectangle::default(),
            orientation,
            spacing: DEFAULT_SPACING,
            padding: Margins::ZERO,
            margin: Margins::ZERO,
            homogeneous: false,
            collapse_on_hide: false,
            requested: None,
        }
    }

    /// Create a horizontal box (children left to right).
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    /// Create a vertical box (children top to bottom).
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// The layout orientation.
    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Gap between consecutive children.
    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Set the gap between consecutive children.
    pub fn set_spacing(&mut self, spacing: f32) {
        self.spacing = spacing;
    }

    /// Set the inner padding (between the box edge and its children).
    ///
    /// Accepts CSS-style shorthand: `set_padding(4.0)`,
    /// `set_padding((8.0, 2.0))`, or `set_padding((l, t, r, b))`.
    pub fn set_padding(&mut self, padding: impl Into<Margins>) {
        self.padding = padding.into();
    }

    /// Set the outer margin. Same shorthand as [`set_padding`](Self::set_padding).
    pub fn set_margin(&mut self, margin: impl Into<Margins>) {
        self.margin = margin.into();
    }

    /// Force every child to the maximum natural child size.
    pub fn set_homogeneous(&mut self, homogeneous: bool) {
        self.homogeneous = homogeneous;
    }

    /// Whether homogeneous sizing is active.
    #[inline]
    pub fn homogeneous(&self) -> bool {
        self.homogeneous
    }

    /// Treat invisible children as zero-extent instead of reserving space.
    pub fn set_collapse_on_hide(&mut self, collapse: bool) {
        self.collapse_on_hide = collapse;
    }

    /// Whether invisible children collapse.
    #[inline]
    pub fn collapse_on_hide(&self) -> bool {
        self.collapse_on_hide
    }

    /// The backing rectangle drawn behind the children.
    #[inline]
    pub fn backing(&self) -> &Rectangle {
        &self.backing
    }

    /// Mutable access to the backing rectangle (styling).
    #[inline]
    pub fn backing_mut(&mut self) -> &mut Rectangle {
        &mut self.backing
    }

    /// Record an externally requested size. The backing rectangle never ends
    /// up smaller than the natural content size.
    pub(crate) fn set_requested(&mut self, size: Size) -> bool {
        if self.requested != Some(size) {
            self.requested = Some(size);
            true
        } else {
            false
        }
    }

    /// Main-axis component of a size.
    #[inline]
    fn main_axis(&self, size: Size) -> f32 {
        match self.orientation {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    /// Cross-axis component of a size.
    #[inline]
    fn cross_axis(&self, size: Size) -> f32 {
        match self.orientation {
            Orientation::Horizontal => size.height,
            Orientation::Vertical => size.width,
        }
    }

    /// Build a size from main and cross axis values.
    #[inline]
    fn make_size(&self, main: f32, cross: f32) -> Size {
        match self.orientation {
            Orientation::Horizontal => Size::new(main, cross),
            Orientation::Vertical => Size::new(cross, main),
        }
    }

    /// Leading decoration on each axis (margin + padding; the cursor starts
    /// past these).
    fn leading(&self) -> Point {
        Point::new(
            self.margin.left + self.padding.left,
            self.margin.top + self.padding.top,
        )
    }

    /// Trailing decoration per axis: padding + outline + margin. Applied
    /// once, on the right/bottom (the leading side is baked into child
    /// positions).
    pub(crate) fn trailing(&self) -> Point {
        let outline = self.backing.outline_extent();
        Point::new(
            self.padding.right + outline + self.margin.right,
            self.padding.bottom + outline + self.margin.bottom,
        )
    }

    /// Uniform child size when homogeneous: the component-wise maximum of
    /// all children's natural sizes.
    fn uniform_child_size(&self, tree: &SceneTree, id: ItemId) -> Size {
        tree.children(id)
            .iter()
            .map(|&c| tree.size_request(c))
            .fold(Size::ZERO, Size::max)
    }

    /// Natural content size: what the box wants to occupy with every child
    /// at its natural (or uniform) size.
    pub(crate) fn natural_size(&self, tree: &SceneTree, id: ItemId) -> Size {
        let uniform = if self.homogeneous {
            Some(self.uniform_child_size(tree, id))
        } else {
            None
        };

        let mut main = 0.0f32;
        let mut cross = 0.0f32;
        let mut count = 0usize;

        for &child in tree.children(id) {
            if self.collapse_on_hide && !tree.visible(child) {
                continue;
            }
            let req = uniform.unwrap_or_else(|| tree.size_request(child));
            main += self.main_axis(req);
            cross = cross.max(self.cross_axis(req));
            count += 1;
        }

        if count > 1 {
            main += self.spacing * (count - 1) as f32;
        }

        let leading = self.leading();
        let trailing = self.trailing();
        let total_main = self.main_axis(Size::new(leading.x, leading.y))
            + main
            + self.main_axis(Size::new(trailing.x, trailing.y));
        let total_cross = self.cross_axis(Size::new(leading.x, leading.y))
            + cross
            + self.cross_axis(Size::new(trailing.x, trailing.y));

        self.make_size(total_main, total_cross)
    }

    /// Reposition all children and resize the backing rectangle.
    ///
    /// Runs with the tree's child-change notifications to this box
    /// suppressed: the position and size writes below must not queue the
    /// same layout again.
    pub(crate) fn layout(&mut self, tree: &mut SceneTree, id: ItemId) {
        let children: Vec<ItemId> = tree.children(id).to_vec();
        let uniform = if self.homogeneous {
            Some(self.uniform_child_size(tree, id))
        } else {
            None
        };

        let mut cursor = self.leading();
        for &child in &children {
            tree.set_position(child, cursor);

            let req = match uniform {
                Some(u) => {
                    tree.size_allocate(child, u);
                    u
                }
                None => tree.size_request(child),
            };

            // An invisible child collapses only under the collapse policy;
            // otherwise it keeps reserving its natural extent.
            if !(self.collapse_on_hide && !tree.visible(child)) {
                match self.orientation {
                    Orientation::Horizontal => cursor.x += req.width + self.spacing,
                    Orientation::Vertical => cursor.y += req.height + self.spacing,
                }
            }
        }

        let natural = self.natural_size(tree, id);
        let size = self.requested.map_or(natural, |r| r.max(natural));
        self.backing.set_rect(Rect {
            origin: Point::ZERO,
            size,
        });

        tree.mark_bounding_box_dirty(id);
        tracing::trace!(target: "stave::layout", children = children.len(), "box laid out");
    }

    /// Draw the backing rectangle.
    pub(crate) fn render(&self, origin: Point, painter: &mut dyn Painter) {
        self.backing.render(origin, painter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneTree;
    use crate::rectangle::Rectangle;

    fn tree_with_row(widths: &[f32]) -> (SceneTree, ItemId, Vec<ItemId>) {
        let mut tree = SceneTree::new();
        let row = tree.insert(BoxItem::horizontal());
        tree.update_box(row, |b| b.set_spacing(4.0));
        let children: Vec<ItemId> = widths
            .iter()
            .map(|&w| {
                let child = tree.insert(Rectangle::new(Rect::new(0.0, 0.0, w, 5.0)));
                tree.add_child(row, child).unwrap();
                child
            })
            .collect();
        (tree, row, children)
    }

    #[test]
    fn horizontal_cursor_walk() {
        let (mut tree, row, children) = tree_with_row(&[10.0, 20.0, 30.0]);
        tree.flush_layout();

        assert_eq!(tree.position(children[0]), Point::new(0.0, 0.0));
        assert_eq!(tree.position(children[1]), Point::new(14.0, 0.0));
        assert_eq!(tree.position(children[2]), Point::new(38.0, 0.0));
        assert_eq!(
            tree.box_item(row).unwrap().backing().rect().size,
            Size::new(68.0, 5.0)
        );
        assert_eq!(tree.bounding_box(row), Some(Rect::new(0.0, 0.0, 68.0, 5.0)));
    }

    #[test]
    fn vertical_cursor_walk() {
        let mut tree = SceneTree::new();
        let col = tree.insert(BoxItem::vertical());
        tree.update_box(col, |b| b.set_spacing(2.0));
        let a = tree.insert(Rectangle::new(Rect::new(0.0, 0.0, 10.0, 6.0)));
        let b = tree.insert(Rectangle::new(Rect::new(0.0, 0.0, 10.0, 8.0)));
        tree.add_child(col, a).unwrap();
        tree.add_child(col, b).unwrap();
        tree.flush_layout();

        assert_eq!(tree.position(b), Point::new(0.0, 8.0));
        assert_eq!(tree.size_request(col), Size::new(10.0, 16.0));
    }

    #[test]
    fn homogeneous_allocates_uniform_size() {
        let (mut tree, row, children) = tree_with_row(&[10.0, 20.0, 30.0]);
        tree.update_box(row, |b| b.set_homogeneous(true));
        tree.flush_layout();

        for &child in &children {
            assert_eq!(
                tree.rectangle(child).unwrap().rect().size,
                Size::new(30.0, 5.0)
            );
        }
        // Cursor advances by the uniform width.
        assert_eq!(tree.position(children[1]), Point::new(34.0, 0.0));
        assert_eq!(
            tree.size_request(row),
            Size::new(30.0 * 3.0 + 4.0 * 2.0, 5.0)
        );
    }

    #[test]
    fn hidden_child_reserves_space_without_collapse() {
        let (mut tree, row, children) = tree_with_row(&[10.0, 20.0, 30.0]);
        tree.flush_layout();
        tree.set_visible(children[1], false);
        tree.flush_layout();

        assert_eq!(tree.position(children[2]), Point::new(38.0, 0.0));
        assert_eq!(tree.size_request(row), Size::new(68.0, 5.0));
    }

    #[test]
    fn collapse_on_hide_drops_extent_and_restores() {
        let (mut tree, row, children) = tree_with_row(&[10.0, 20.0, 30.0]);
        tree.update_box(row, |b| b.set_collapse_on_hide(true));
        tree.flush_layout();

        tree.set_visible(children[1], false);
        tree.flush_layout();
        // The collapsed child advances the cursor by nothing.
        assert_eq!(tree.position(children[2]), Point::new(14.0, 0.0));
        assert_eq!(tree.size_request(row), Size::new(44.0, 5.0));
        assert_eq!(tree.bounding_box(row), Some(Rect::new(0.0, 0.0, 44.0, 5.0)));

        tree.set_visible(children[1], true);
        tree.flush_layout();
        assert_eq!(tree.position(children[2]), Point::new(38.0, 0.0));
        assert_eq!(tree.size_request(row), Size::new(68.0, 5.0));
    }

    #[test]
    fn margins_and_padding_offset_the_cursor() {
        let (mut tree, row, children) = tree_with_row(&[10.0, 20.0]);
        tree.update_box(row, |b| {
            b.set_margin((1.0, 2.0, 3.0, 4.0));
            b.set_padding((5.0, 6.0, 7.0, 8.0));
        });
        tree.flush_layout();

        // Cursor starts at left margin + left padding, top margin + top padding.
        assert_eq!(tree.position(children[0]), Point::new(6.0, 8.0));
        assert_eq!(tree.position(children[1]), Point::new(6.0 + 10.0 + 4.0, 8.0));
        // Width: 1+5 + 10+4+20 + 7+3; height: 2+6 + 5 + 8+4.
        assert_eq!(tree.size_request(row), Size::new(50.0, 25.0));
    }

    #[test]
    fn layout_is_idempotent_without_mutation() {
        let (mut tree, row, children) = tree_with_row(&[10.0, 20.0, 30.0]);
        tree.flush_layout();
        let before: Vec<Point> = children.iter().map(|&c| tree.position(c)).collect();
        let bbox_before = tree.bounding_box(row);

        assert!(!tree.layout_queued(row));
        tree.layout(row);
        tree.flush_layout();

        let after: Vec<Point> = children.iter().map(|&c| tree.position(c)).collect();
        assert_eq!(before, after);
        assert_eq!(tree.bounding_box(row), bbox_before);
    }

    #[test]
    fn empty_box_has_no_bounding_box() {
        let mut tree = SceneTree::new();
        let row = tree.insert(BoxItem::horizontal());
        tree.flush_layout();
        assert_eq!(tree.bounding_box(row), None);
    }

    #[test]
    fn add_child_front_packs_first() {
        let (mut tree, row, children) = tree_with_row(&[10.0, 20.0]);
        let front = tree.insert(Rectangle::new(Rect::new(0.0, 0.0, 8.0, 5.0)));
        tree.add_child_front(row, front).unwrap();
        tree.flush_layout();

        assert_eq!(tree.children(row)[0], front);
        assert_eq!(tree.position(front), Point::new(0.0, 0.0));
        assert_eq!(tree.position(children[0]), Point::new(12.0, 0.0));
    }

    #[test]
    fn requested_size_never_shrinks_below_natural() {
        let (mut tree, row, _) = tree_with_row(&[10.0, 20.0, 30.0]);
        tree.size_allocate(row, Size::new(100.0, 4.0));
        tree.flush_layout();
        let backing = tree.box_item(row).unwrap().backing().rect().size;
        assert_eq!(backing, Size::new(100.0, 5.0));
    }
}
