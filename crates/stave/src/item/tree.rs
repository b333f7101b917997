//! The scene tree: arena storage, ownership, dirty tracking, and the layout
//! driver.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use slotmap::{SecondaryMap, SlotMap, new_key_type};
use stave_render::{Painter, Point, Rect, Size, union_opt};

use crate::error::{SceneError, SceneResult};
use crate::layout::table::CellInfo;
use crate::layout::{BoxItem, CellCoord, Margins, PackOptions, Table};
use crate::rectangle::Rectangle;

use super::cache::BoundingBoxCache;
use super::{Item, ItemKind};

new_key_type! {
    /// A stable identifier for an item in the tree.
    ///
    /// Ids stay valid as the tree changes shape and become invalid when the
    /// item (or one of its ancestors) is removed.
    pub struct ItemId;
}

/// Per-node state: links, geometry, and the bounding-box cache.
#[derive(Debug)]
struct Node {
    parent: Option<ItemId>,
    children: Vec<ItemId>,
    /// Offset relative to the parent (window space for roots).
    position: Point,
    visible: bool,
    bbox: BoundingBoxCache,
    /// While set, size/visibility notifications from this node's children
    /// are dropped instead of queueing a re-layout. Flipped by
    /// [`ChangeGuard`] around a layout pass.
    ignore_child_changes: bool,
}

impl Node {
    fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            position: Point::ZERO,
            visible: true,
            bbox: BoundingBoxCache::dirty(),
            ignore_child_changes: false,
        }
    }
}

/// The tree that owns every canvas item.
///
/// Nodes are arena-allocated and addressed by [`ItemId`]. The tree holds all
/// parent/child links, per-item position and visibility, the lazily computed
/// bounding boxes, and the queue of containers waiting for a layout pass.
///
/// # Ownership
///
/// Every item is owned exclusively by the tree; removing an item drops its
/// whole subtree. Containers never reach past their direct children.
///
/// # Layout
///
/// Mutations that can affect layout (adding children, size or visibility
/// changes) queue the affected container rather than recomputing eagerly.
/// [`layout`](Self::layout) runs one container's pass only if it is queued;
/// [`flush_layout`](Self::flush_layout) drains the queue. During a pass the
/// container's own child-change notifications are suppressed so repositioning
/// children cannot re-trigger the same pass.
#[derive(Debug, Default)]
pub struct SceneTree {
    nodes: SlotMap<ItemId, Node>,
    payloads: SecondaryMap<ItemId, ItemKind>,
    roots: Vec<ItemId>,
    queued: HashSet<ItemId>,
}

impl SceneTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item as a new root. Returns its id.
    pub fn insert(&mut self, kind: impl Into<ItemKind>) -> ItemId {
        let id = self.nodes.insert(Node::new());
        self.payloads.insert(id, kind.into());
        self.roots.push(id);
        id
    }

    /// Insert a custom leaf item as a new root.
    pub fn insert_widget(&mut self, item: Box<dyn Item>) -> ItemId {
        let id = self.nodes.insert(Node::new());
        self.payloads.insert(id, ItemKind::Widget(item));
        self.roots.push(id);
        id
    }

    /// Whether the id refers to a live item.
    #[inline]
    pub fn contains(&self, id: ItemId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live items.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level items in z-order (back to front).
    #[inline]
    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// The item's parent, if it is not a root.
    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// The item's children in layout/z order.
    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Append `child` to a container's child sequence.
    ///
    /// The container becomes the tree parent of `child` and a re-layout is
    /// queued. Calling this on a [`Table`] is a programming error and
    /// aborts: tables are mutated through [`attach`](Self::attach) and
    /// [`detach`](Self::detach) only.
    pub fn add_child(&mut self, container: ItemId, child: ItemId) -> SceneResult<()> {
        self.add_child_at(container, child, false)
    }

    /// Prepend `child` to a container's child sequence.
    ///
    /// Same contract as [`add_child`](Self::add_child).
    pub fn add_child_front(&mut self, container: ItemId, child: ItemId) -> SceneResult<()> {
        self.add_child_at(container, child, true)
    }

    fn add_child_at(&mut self, container: ItemId, child: ItemId, front: bool) -> SceneResult<()> {
        if !self.contains(container) || !self.contains(child) {
            return Err(SceneError::InvalidItem);
        }
        if matches!(self.payloads.get(container), Some(ItemKind::Table(_))) {
            tracing::error!(
                target: "stave::scene",
                "generic child mutator called on a table; use attach/detach"
            );
            panic!("generic child mutator called on a table; use attach/detach");
        }
        self.check_no_cycle(container, child)?;
        self.unlink(child);
        self.link(container, child, front);
        self.queue_resize(container);
        Ok(())
    }

    /// Remove an item and drop its whole subtree.
    ///
    /// Removing a table's cell content this way is a programming error and
    /// aborts; use [`detach`](Self::detach).
    pub fn remove(&mut self, id: ItemId) {
        let Some(parent) = self.nodes.get(id).map(|n| n.parent) else {
            return;
        };
        if let Some(p) = parent {
            if matches!(self.payloads.get(p), Some(ItemKind::Table(_))) {
                tracing::error!(
                    target: "stave::scene",
                    "generic remove called on a table cell; use detach"
                );
                panic!("generic remove called on a table cell; use detach");
            }
        }
        self.unlink(id);
        self.drop_subtree(id);
        if let Some(p) = parent {
            self.queue_resize(p);
        }
    }

    fn check_no_cycle(&self, new_parent: ItemId, child: ItemId) -> SceneResult<()> {
        let mut cur = Some(new_parent);
        while let Some(i) = cur {
            if i == child {
                return Err(SceneError::WouldCycle);
            }
            cur = self.parent(i);
        }
        Ok(())
    }

    fn unlink(&mut self, id: ItemId) {
        let parent = self.nodes.get(id).and_then(|n| n.parent);
        match parent {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(p) {
                    node.children.retain(|c| *c != id);
                }
                if let Some(node) = self.nodes.get_mut(id) {
                    node.parent = None;
                }
                self.roots.push(id);
            }
            None => return,
        }
    }

    fn link(&mut self, parent: ItemId, child: ItemId, front: bool) {
        self.roots.retain(|r| *r != child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            if front {
                node.children.insert(0, child);
            } else {
                node.children.push(child);
            }
        }
    }

    fn drop_subtree(&mut self, id: ItemId) {
        let mut stack = vec![id];
        while let Some(i) = stack.pop() {
            if let Some(node) = self.nodes.remove(i) {
                stack.extend(node.children);
            }
            self.payloads.remove(i);
            self.queued.remove(&i);
            self.roots.retain(|r| *r != i);
        }
    }

    // =========================================================================
    // Geometry & visibility
    // =========================================================================

    /// The item's position relative to its parent.
    pub fn position(&self, id: ItemId) -> Point {
        self.nodes.get(id).map(|n| n.position).unwrap_or(Point::ZERO)
    }

    /// Move the item. Ancestor bounding boxes are invalidated; layout is not
    /// re-queued (positions are the owning container's business).
    pub fn set_position(&mut self, id: ItemId, position: Point) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.position == position {
            return;
        }
        node.position = position;
        if let Some(parent) = node.parent {
            self.mark_bounding_box_dirty(parent);
        }
    }

    /// The item's own visibility flag.
    pub fn visible(&self, id: ItemId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.visible)
    }

    /// Show or hide the item. A change invalidates ancestor bounding boxes
    /// and notifies the owning container (a hidden child may collapse).
    pub fn set_visible(&mut self, id: ItemId, visible: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.visible == visible {
            return;
        }
        node.visible = visible;
        if let Some(parent) = node.parent {
            self.mark_bounding_box_dirty(parent);
        }
        self.notify_child_changed(id);
    }

    // =========================================================================
    // Payload access
    // =========================================================================

    /// The payload stored for this item.
    pub fn payload(&self, id: ItemId) -> Option<&ItemKind> {
        self.payloads.get(id)
    }

    /// The item as a rectangle, if it is one.
    pub fn rectangle(&self, id: ItemId) -> Option<&Rectangle> {
        match self.payloads.get(id) {
            Some(ItemKind::Rect(r)) => Some(r),
            _ => None,
        }
    }

    /// The item as a box container, if it is one.
    pub fn box_item(&self, id: ItemId) -> Option<&BoxItem> {
        match self.payloads.get(id) {
            Some(ItemKind::Box(b)) => Some(b),
            _ => None,
        }
    }

    /// The item as a table container, if it is one.
    pub fn table(&self, id: ItemId) -> Option<&Table> {
        match self.payloads.get(id) {
            Some(ItemKind::Table(t)) => Some(t),
            _ => None,
        }
    }

    /// Mutate a rectangle payload. Geometry changes invalidate bounding
    /// boxes and notify the owning container.
    pub fn update_rectangle(&mut self, id: ItemId, f: impl FnOnce(&mut Rectangle)) {
        let Some(ItemKind::Rect(r)) = self.payloads.get_mut(id) else {
            return;
        };
        let before = r.rect();
        f(r);
        let changed = self.rectangle(id).is_some_and(|r| r.rect() != before);
        self.mark_bounding_box_dirty(id);
        if changed {
            self.notify_child_changed(id);
        }
    }

    /// Mutate a box container's configuration and queue its re-layout.
    pub fn update_box(&mut self, id: ItemId, f: impl FnOnce(&mut BoxItem)) {
        let Some(ItemKind::Box(b)) = self.payloads.get_mut(id) else {
            return;
        };
        f(b);
        self.queue_resize(id);
    }

    /// Mutate a table container's configuration and queue its re-layout.
    pub fn update_table(&mut self, id: ItemId, f: impl FnOnce(&mut Table)) {
        let Some(ItemKind::Table(t)) = self.payloads.get_mut(id) else {
            return;
        };
        f(t);
        self.queue_resize(id);
    }

    // =========================================================================
    // Table cells
    // =========================================================================

    /// Register `item` as a table cell spanning `[upper_left, lower_right)`
    /// in grid-index space.
    ///
    /// On success the table becomes the item's parent and a re-layout is
    /// queued. Attaching at an already-occupied upper-left index changes
    /// nothing and returns `Ok(false)` (first writer wins).
    pub fn attach(
        &mut self,
        table: ItemId,
        item: ItemId,
        upper_left: impl Into<CellCoord>,
        lower_right: impl Into<CellCoord>,
        row_options: PackOptions,
        col_options: PackOptions,
        padding: impl Into<Margins>,
    ) -> SceneResult<bool> {
        if !self.contains(table) || !self.contains(item) {
            return Err(SceneError::InvalidItem);
        }
        if !matches!(self.payloads.get(table), Some(ItemKind::Table(_))) {
            tracing::error!(target: "stave::scene", "attach called on a non-table item");
            panic!("attach called on a non-table item");
        }
        self.check_no_cycle(table, item)?;

        let cell = CellInfo {
            item,
            upper_left: upper_left.into(),
            lower_right: lower_right.into(),
            row_options,
            col_options,
            padding: padding.into(),
            natural: Size::ZERO,
            allocated: Size::ZERO,
            full: Size::ZERO,
        };

        let Some(ItemKind::Table(t)) = self.payloads.get_mut(table) else {
            unreachable!("payload kind checked above");
        };
        if !t.insert_cell(cell) {
            return Ok(false);
        }

        self.unlink(item);
        self.link(table, item, false);
        self.queue_resize(table);
        Ok(true)
    }

    /// Remove the cell holding `item` from a table and drop the item.
    ///
    /// Returns `Ok(false)` when the item is not a cell of this table.
    pub fn detach(&mut self, table: ItemId, item: ItemId) -> SceneResult<bool> {
        if !self.contains(table) {
            return Err(SceneError::InvalidItem);
        }
        let Some(ItemKind::Table(t)) = self.payloads.get_mut(table) else {
            tracing::error!(target: "stave::scene", "detach called on a non-table item");
            panic!("detach called on a non-table item");
        };
        if t.remove_cell(item).is_none() {
            return Ok(false);
        }
        self.unlink(item);
        self.drop_subtree(item);
        self.queue_resize(table);
        Ok(true)
    }

    // =========================================================================
    // Measurement & allocation
    // =========================================================================

    /// The item's natural size.
    pub fn size_request(&self, id: ItemId) -> Size {
        match self.payloads.get(id) {
            Some(ItemKind::Rect(r)) => r.size_request(),
            Some(ItemKind::Box(b)) => b.natural_size(self, id),
            Some(ItemKind::Table(t)) => t.natural_size(self, id),
            Some(ItemKind::Widget(w)) => w.size_request(),
            None => Size::ZERO,
        }
    }

    /// Grant the item a size. Containers record it as their requested size
    /// and queue a re-layout; leaves resize directly.
    pub fn size_allocate(&mut self, id: ItemId, size: Size) {
        let (changed, requeue) = match self.payloads.get_mut(id) {
            Some(ItemKind::Rect(r)) => (r.set_size(size), false),
            Some(ItemKind::Box(b)) => {
                let changed = b.set_requested(size);
                (changed, changed)
            }
            Some(ItemKind::Table(t)) => {
                let changed = t.set_requested(size);
                (changed, changed)
            }
            Some(ItemKind::Widget(w)) => {
                let before = w.size_request();
                w.size_allocate(size);
                (w.size_request() != before, false)
            }
            None => (false, false),
        };
        if requeue {
            self.queued.insert(id);
        }
        if changed {
            self.mark_bounding_box_dirty(id);
            self.notify_child_changed(id);
        }
    }

    // =========================================================================
    // Bounding boxes
    // =========================================================================

    /// Invalidate the bounding box of an item and all of its ancestors.
    pub fn mark_bounding_box_dirty(&mut self, id: ItemId) {
        let mut cur = Some(id);
        while let Some(i) = cur {
            let Some(node) = self.nodes.get_mut(i) else {
                break;
            };
            node.bbox.invalidate();
            cur = node.parent;
        }
    }

    /// The item's bounding box in its local coordinate space, recomputed if
    /// stale. `None` means the item has no extent (for example an empty
    /// container).
    pub fn bounding_box(&mut self, id: ItemId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        if !node.bbox.is_dirty() {
            return node.bbox.value();
        }
        let value = self.compute_bounding_box(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.bbox.store(value);
        }
        value
    }

    fn compute_bounding_box(&mut self, id: ItemId) -> Option<Rect> {
        enum Own {
            Leaf(Option<Rect>),
            Container { trailing: Point, collapse: bool },
        }

        let own = match self.payloads.get(id) {
            Some(ItemKind::Rect(r)) => Own::Leaf(r.bounding_box()),
            Some(ItemKind::Widget(w)) => Own::Leaf(w.bounding_box()),
            Some(ItemKind::Box(b)) => Own::Container {
                trailing: b.trailing(),
                collapse: b.collapse_on_hide(),
            },
            Some(ItemKind::Table(t)) => Own::Container {
                trailing: t.trailing(),
                collapse: t.collapse_on_hide(),
            },
            None => return None,
        };

        match own {
            Own::Leaf(own_box) => union_opt(own_box, self.children_bounding_box(id, true)),
            // The leading margin and padding are already baked into child
            // positions; only the trailing edges expand the union.
            Own::Container { trailing, collapse } => self
                .children_bounding_box(id, !collapse)
                .map(|r| r.inflate_sides(0.0, 0.0, trailing.x, trailing.y)),
        }
    }

    /// Union of the children's bounding boxes, each translated to this
    /// item's coordinate space. With `include_hidden` false (a collapsing
    /// container), invisible children contribute nothing.
    pub fn children_bounding_box(&mut self, id: ItemId, include_hidden: bool) -> Option<Rect> {
        let children = self.nodes.get(id)?.children.clone();
        let mut acc: Option<Rect> = None;
        for child in children {
            let Some(node) = self.nodes.get(child) else {
                continue;
            };
            if !node.visible && !include_hidden {
                continue;
            }
            let position = node.position;
            let bb = self.bounding_box(child);
            acc = union_opt(acc, bb.map(|b| b.translate(position)));
        }
        acc
    }

    // =========================================================================
    // Layout driver
    // =========================================================================

    /// Queue a re-layout for this item's container (or itself, when it is a
    /// container).
    pub fn queue_resize(&mut self, id: ItemId) {
        self.mark_bounding_box_dirty(id);
        if self.payloads.get(id).is_some_and(ItemKind::is_container) {
            self.queued.insert(id);
        }
        self.notify_child_changed(id);
    }

    /// Whether a layout pass is pending for this container.
    #[inline]
    pub fn layout_queued(&self, id: ItemId) -> bool {
        self.queued.contains(&id)
    }

    /// Run one container's layout pass, but only if one was queued since the
    /// last pass. Calling this twice in a row is a no-op the second time.
    pub fn layout(&mut self, id: ItemId) {
        if !self.queued.contains(&id) {
            return;
        }
        self.layout_internal(id);
    }

    /// Drain the layout queue. Containers whose pass resizes other
    /// containers are processed in the same drain.
    pub fn flush_layout(&mut self) {
        loop {
            let Some(&id) = self.queued.iter().next() else {
                break;
            };
            self.layout_internal(id);
        }
    }

    fn layout_internal(&mut self, id: ItemId) {
        self.queued.remove(&id);
        // Take the payload out for the duration of the pass so the container
        // can reach its children through the tree without aliasing itself.
        let Some(mut kind) = self.payloads.remove(id) else {
            return;
        };
        {
            let mut guard = self.suppress_changes(id);
            match &mut kind {
                ItemKind::Box(b) => b.layout(&mut guard, id),
                ItemKind::Table(t) => t.layout(&mut guard, id),
                _ => {}
            }
        }
        self.payloads.insert(id, kind);
        self.mark_bounding_box_dirty(id);
    }

    /// Suppress child-change notifications to `id` for the guard's lifetime.
    ///
    /// The previous suppression state is restored on every exit path. Useful
    /// for batch mutations that should coalesce into a single layout pass.
    pub fn suppress_changes(&mut self, id: ItemId) -> ChangeGuard<'_> {
        let prev = match self.nodes.get_mut(id) {
            Some(node) => std::mem::replace(&mut node.ignore_child_changes, true),
            None => false,
        };
        ChangeGuard {
            id,
            prev,
            tree: self,
        }
    }

    /// Route a size/visibility change to the nearest ancestor container,
    /// unless an enclosing layout pass suppressed notifications.
    fn notify_child_changed(&mut self, id: ItemId) {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            let Some(node) = self.nodes.get(p) else {
                return;
            };
            if node.ignore_child_changes {
                return;
            }
            if self.payloads.get(p).is_some_and(ItemKind::is_container) {
                self.queued.insert(p);
                return;
            }
            cur = node.parent;
        }
    }

    // =========================================================================
    // Rendering & hit testing
    // =========================================================================

    /// Render every visible item intersecting `area` (window space).
    pub fn render(&mut self, area: Rect, painter: &mut dyn Painter, scale: f32) {
        let roots = self.roots.clone();
        for root in roots {
            self.render_item(root, Point::ZERO, area, painter, scale);
        }
    }

    fn render_item(
        &mut self,
        id: ItemId,
        offset: Point,
        area: Rect,
        painter: &mut dyn Painter,
        scale: f32,
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let origin = offset.translate(node.position);

        // The bounding box encloses the whole subtree, so a miss culls the
        // children as well.
        match self.bounding_box(id) {
            Some(bb) if bb.translate(origin).intersect(&area).is_some() => {}
            _ => return,
        }

        match self.payloads.get(id) {
            Some(ItemKind::Rect(r)) => r.render(origin, painter),
            Some(ItemKind::Box(b)) => b.render(origin, painter),
            Some(ItemKind::Table(t)) => t.render(origin, painter),
            Some(ItemKind::Widget(w)) => w.render(origin, painter, scale),
            None => {}
        }

        let children = self
            .nodes
            .get(id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.render_item(child, origin, area, painter, scale);
        }
    }

    /// The top-most item covering `point` (window space), if any.
    pub fn item_at(&mut self, point: Point, scale: f32) -> Option<ItemId> {
        let roots = self.roots.clone();
        for root in roots.into_iter().rev() {
            if let Some(hit) = self.hit_item(root, point, scale) {
                return Some(hit);
            }
        }
        None
    }

    fn hit_item(&mut self, id: ItemId, point: Point, scale: f32) -> Option<ItemId> {
        let node = self.nodes.get(id)?;
        if !node.visible {
            return None;
        }
        let local = Point::new(point.x - node.position.x, point.y - node.position.y);

        let children = node.children.clone();
        for child in children.into_iter().rev() {
            if let Some(hit) = self.hit_item(child, local, scale) {
                return Some(hit);
            }
        }

        let covered = match self.payloads.get(id) {
            Some(ItemKind::Rect(r)) => r.covers(local),
            Some(ItemKind::Widget(w)) => w.covers(local, scale),
            Some(ItemKind::Box(_)) | Some(ItemKind::Table(_)) => {
                return self
                    .bounding_box(id)
                    .is_some_and(|b| b.contains(local))
                    .then_some(id);
            }
            None => false,
        };
        covered.then_some(id)
    }
}

/// RAII guard suppressing child-change notifications to one container.
///
/// Dereferences to the tree so mutations can continue while the guard is
/// held; dropping it restores the previous suppression state on every exit
/// path.
pub struct ChangeGuard<'a> {
    tree: &'a mut SceneTree,
    id: ItemId,
    prev: bool,
}

impl Deref for ChangeGuard<'_> {
    type Target = SceneTree;

    fn deref(&self) -> &Self::Target {
        self.tree
    }
}

impl DerefMut for ChangeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.tree
    }
}

impl Drop for ChangeGuard<'_> {
    fn drop(&mut self) {
        if let Some(node) = self.tree.nodes.get_mut(self.id) {
            node.ignore_child_changes = self.prev;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stave_render::{Color, DrawCommand, RecordingPainter};

    fn rect_item(tree: &mut SceneTree, rect: Rect) -> ItemId {
        tree.insert(Rectangle::new(rect).with_fill(Color::GRAY))
    }

    #[test]
    fn remove_drops_the_whole_subtree() {
        let mut tree = SceneTree::new();
        let outer = tree.insert(BoxItem::horizontal());
        let inner = tree.insert(BoxItem::vertical());
        let leaf = rect_item(&mut tree, Rect::new(0.0, 0.0, 5.0, 5.0));
        tree.add_child(outer, inner).unwrap();
        tree.add_child(inner, leaf).unwrap();

        tree.remove(inner);

        assert!(tree.contains(outer));
        assert!(!tree.contains(inner));
        assert!(!tree.contains(leaf));
        assert!(tree.children(outer).is_empty());
    }

    #[test]
    fn reparenting_under_a_descendant_is_rejected() {
        let mut tree = SceneTree::new();
        let outer = tree.insert(BoxItem::horizontal());
        let inner = tree.insert(BoxItem::horizontal());
        tree.add_child(outer, inner).unwrap();

        assert_eq!(tree.add_child(inner, outer), Err(SceneError::WouldCycle));
        assert_eq!(tree.add_child(outer, outer), Err(SceneError::WouldCycle));
    }

    #[test]
    fn stale_ids_are_reported() {
        let mut tree = SceneTree::new();
        let row = tree.insert(BoxItem::horizontal());
        let gone = rect_item(&mut tree, Rect::ZERO);
        tree.remove(gone);

        assert_eq!(tree.add_child(row, gone), Err(SceneError::InvalidItem));
        assert_eq!(tree.size_request(gone), Size::ZERO);
    }

    #[test]
    fn bounding_box_unions_children_and_follows_moves() {
        let mut tree = SceneTree::new();
        let group = rect_item(&mut tree, Rect::new(0.0, 0.0, 10.0, 10.0));
        let child = rect_item(&mut tree, Rect::new(0.0, 0.0, 5.0, 5.0));
        tree.add_child(group, child).unwrap();
        tree.set_position(child, Point::new(20.0, 0.0));

        assert_eq!(tree.bounding_box(group), Some(Rect::new(0.0, 0.0, 25.0, 10.0)));

        // Moving the child invalidates the cached union.
        tree.set_position(child, Point::new(30.0, 2.0));
        assert_eq!(tree.bounding_box(group), Some(Rect::new(0.0, 0.0, 35.0, 10.0)));
    }

    #[test]
    fn suppression_guard_drops_notifications_and_restores() {
        let mut tree = SceneTree::new();
        let row = tree.insert(BoxItem::horizontal());
        let child = rect_item(&mut tree, Rect::new(0.0, 0.0, 5.0, 5.0));
        tree.add_child(row, child).unwrap();
        tree.flush_layout();

        {
            let mut guard = tree.suppress_changes(row);
            guard.set_visible(child, false);
            assert!(!guard.layout_queued(row));
        }

        // After the guard is gone, changes queue the container again.
        tree.set_visible(child, true);
        assert!(tree.layout_queued(row));
    }

    #[test]
    fn render_culls_items_outside_the_area() {
        let mut tree = SceneTree::new();
        let near = rect_item(&mut tree, Rect::new(0.0, 0.0, 10.0, 10.0));
        let far = rect_item(&mut tree, Rect::new(0.0, 0.0, 10.0, 10.0));
        tree.set_position(far, Point::new(500.0, 0.0));

        let mut painter = RecordingPainter::new();
        tree.render(Rect::new(0.0, 0.0, 100.0, 100.0), &mut painter, 1.0);

        assert_eq!(painter.commands().len(), 1);
        assert!(matches!(
            painter.commands()[0],
            DrawCommand::FillRect { rect, .. } if rect == Rect::new(0.0, 0.0, 10.0, 10.0)
        ));

        // Both show up once the area covers them.
        painter.clear();
        tree.render(Rect::new(0.0, 0.0, 600.0, 100.0), &mut painter, 1.0);
        assert_eq!(painter.commands().len(), 2);
        let _ = near;
    }

    #[test]
    fn hidden_items_do_not_render() {
        let mut tree = SceneTree::new();
        let item = rect_item(&mut tree, Rect::new(0.0, 0.0, 10.0, 10.0));
        tree.set_visible(item, false);

        let mut painter = RecordingPainter::new();
        tree.render(Rect::new(0.0, 0.0, 100.0, 100.0), &mut painter, 1.0);
        assert!(painter.commands().is_empty());
    }

    #[test]
    fn hit_testing_returns_the_topmost_item() {
        let mut tree = SceneTree::new();
        let below = rect_item(&mut tree, Rect::new(0.0, 0.0, 50.0, 50.0));
        let above = rect_item(&mut tree, Rect::new(0.0, 0.0, 50.0, 50.0));

        assert_eq!(tree.item_at(Point::new(10.0, 10.0), 1.0), Some(above));

        tree.set_visible(above, false);
        assert_eq!(tree.item_at(Point::new(10.0, 10.0), 1.0), Some(below));
        assert_eq!(tree.item_at(Point::new(200.0, 10.0), 1.0), None);
    }

    #[test]
    fn hit_testing_prefers_children_over_parents() {
        let mut tree = SceneTree::new();
        let group = rect_item(&mut tree, Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = rect_item(&mut tree, Rect::new(0.0, 0.0, 10.0, 10.0));
        tree.add_child(group, child).unwrap();
        tree.set_position(child, Point::new(40.0, 40.0));

        assert_eq!(tree.item_at(Point::new(45.0, 45.0), 1.0), Some(child));
        assert_eq!(tree.item_at(Point::new(5.0, 5.0), 1.0), Some(group));
    }

    #[test]
    fn rectangle_updates_propagate_to_the_owning_container() {
        let mut tree = SceneTree::new();
        let row = tree.insert(BoxItem::horizontal());
        let child = rect_item(&mut tree, Rect::new(0.0, 0.0, 5.0, 5.0));
        tree.add_child(row, child).unwrap();
        tree.flush_layout();
        assert!(!tree.layout_queued(row));

        tree.update_rectangle(child, |r| {
            r.set_size(Size::new(9.0, 5.0));
        });
        assert!(tree.layout_queued(row));

        tree.flush_layout();
        assert_eq!(tree.size_request(row), Size::new(9.0, 5.0));
    }
}
