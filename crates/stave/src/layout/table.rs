//! Two-axis grid container item.

use std::collections::BTreeMap;

use stave_render::{Painter, Point, Rect, Size, Stroke};

use crate::item::{ItemId, SceneTree};
use crate::rectangle::Rectangle;

use super::{Margins, PackOptions};

/// A grid index. Ordering is row-major, which is also the placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    /// Create a grid index.
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl From<(u32, u32)> for CellCoord {
    fn from((row, col): (u32, u32)) -> Self {
        Self { row, col }
    }
}

/// A registered cell: content item, span, pack options, padding, and the
/// sizes computed for it by the last allocation pass.
#[derive(Debug, Clone)]
pub(crate) struct CellInfo {
    pub item: ItemId,
    pub upper_left: CellCoord,
    pub lower_right: CellCoord,
    /// Options along the row (governs the cell's width).
    pub row_options: PackOptions,
    /// Options along the column (governs the cell's height).
    pub col_options: PackOptions,
    pub padding: Margins,
    /// Content's natural size, queried during the last pass.
    pub natural: Size,
    /// Content size granted by the last pass.
    pub allocated: Size,
    /// Allocated size plus the cell's own padding.
    pub full: Size,
}

impl CellInfo {
    fn row_span(&self) -> u32 {
        (self.lower_right.row - self.upper_left.row).max(1)
    }

    fn col_span(&self) -> u32 {
        (self.lower_right.col - self.upper_left.col).max(1)
    }
}

/// Per-line (row or column) sizing state.
///
/// A row's size is its extent *along* the row — the summed width of the
/// cells it holds; a column's size is correspondingly the summed height.
/// The expand/shrink delta computed for a line applies to every cell in it
/// that requested the matching pack option.
#[derive(Debug, Clone, Copy, Default)]
struct AxisInfo {
    natural: f32,
    expanders: u32,
    shrinkers: u32,
    delta: f32,
    occupied: bool,
}

/// A container that lays out children in a two-axis grid.
///
/// Cells are registered with [`SceneTree::attach`] and keyed by their
/// upper-left grid index; attaching to an occupied index is a no-op (first
/// writer wins). The generic child mutators are disabled for tables — they
/// would bypass the cell bookkeeping — and abort with a programming error.
///
/// Row pack options govern a cell's width, column pack options its height.
/// Surplus (or deficit) space on a line is split evenly across the line's
/// expanders (shrinkers).
#[derive(Debug, Clone)]
pub struct Table {
    backing: Rectangle,
    margin: Margins,
    row_spacing: f32,
    col_spacing: f32,
    homogeneous: bool,
    collapse_on_hide: bool,
    draw_row_lines: bool,
    draw_col_lines: bool,
    cells: BTreeMap<CellCoord, CellInfo>,
    /// Pinned row widths / column heights, overriding the computed naturals.
    row_sizes: Vec<Option<f32>>,
    col_sizes: Vec<Option<f32>>,
    /// Line boundaries from the last placement pass, for grid-line drawing.
    row_boundaries: Vec<f32>,
    col_boundaries: Vec<f32>,
    requested: Option<Size>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            backing: Rectangle::default(),
            margin: Margins::ZERO,
            row_spacing: 0.0,
            col_spacing: 0.0,
            homogeneous: false,
            collapse_on_hide: false,
            draw_row_lines: false,
            draw_col_lines: false,
            cells: BTreeMap::new(),
            row_sizes: Vec::new(),
            col_sizes: Vec::new(),
            row_boundaries: Vec::new(),
            col_boundaries: Vec::new(),
            requested: None,
        }
    }

    /// Set the outer margin (CSS-style shorthand accepted).
    pub fn set_margin(&mut self, margin: impl Into<Margins>) {
        self.margin = margin.into();
    }

    /// Set the gap between consecutive rows.
    pub fn set_row_spacing(&mut self, spacing: f32) {
        self.row_spacing = spacing;
    }

    /// Set the gap between consecutive columns.
    pub fn set_col_spacing(&mut self, spacing: f32) {
        self.col_spacing = spacing;
    }

    /// Divide the allocation evenly across grid lines instead of using
    /// natural sizes.
    pub fn set_homogeneous(&mut self, homogeneous: bool) {
        self.homogeneous = homogeneous;
    }

    /// Whether homogeneous sizing is active.
    #[inline]
    pub fn homogeneous(&self) -> bool {
        self.homogeneous
    }

    /// Treat invisible cells as absent instead of reserving their space.
    pub fn set_collapse_on_hide(&mut self, collapse: bool) {
        self.collapse_on_hide = collapse;
    }

    /// Whether invisible cells collapse.
    #[inline]
    pub fn collapse_on_hide(&self) -> bool {
        self.collapse_on_hide
    }

    /// Draw separator lines between rows / columns.
    pub fn set_draw_grid_lines(&mut self, rows: bool, cols: bool) {
        self.draw_row_lines = rows;
        self.draw_col_lines = cols;
    }

    /// Pin a row's extent (width), overriding the computed natural size.
    /// Grows the grid if `row` is beyond the current extent.
    pub fn set_row_size(&mut self, row: u32, size: f32) {
        let idx = row as usize;
        if idx >= self.row_sizes.len() {
            self.row_sizes.resize(idx + 1, None);
        }
        self.row_sizes[idx] = Some(size);
    }

    /// Pin a column's extent (height). Grows the grid if needed.
    pub fn set_col_size(&mut self, col: u32, size: f32) {
        let idx = col as usize;
        if idx >= self.col_sizes.len() {
            self.col_sizes.resize(idx + 1, None);
        }
        self.col_sizes[idx] = Some(size);
    }

    /// The backing rectangle drawn behind the grid.
    #[inline]
    pub fn backing(&self) -> &Rectangle {
        &self.backing
    }

    /// Mutable access to the backing rectangle (styling).
    #[inline]
    pub fn backing_mut(&mut self) -> &mut Rectangle {
        &mut self.backing
    }

    /// Number of rows: the maximum lower-right row index over all cells,
    /// counting pinned rows; empty lines in between still count.
    pub fn rows(&self) -> u32 {
        let from_cells = self
            .cells
            .values()
            .map(|c| c.lower_right.row)
            .max()
            .unwrap_or(0);
        from_cells.max(self.row_sizes.len() as u32)
    }

    /// Number of columns, symmetric to [`rows`](Self::rows).
    pub fn cols(&self) -> u32 {
        let from_cells = self
            .cells
            .values()
            .map(|c| c.lower_right.col)
            .max()
            .unwrap_or(0);
        from_cells.max(self.col_sizes.len() as u32)
    }

    /// The item registered at exactly this upper-left index, if any.
    pub fn cell_at(&self, coord: CellCoord) -> Option<ItemId> {
        self.cells.get(&coord).map(|c| c.item)
    }

    /// Number of registered cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Register a cell. Returns false (and changes nothing) when the
    /// upper-left index is already occupied.
    pub(crate) fn insert_cell(&mut self, cell: CellInfo) -> bool {
        use std::collections::btree_map::Entry;
        match self.cells.entry(cell.upper_left) {
            Entry::Occupied(_) => {
                tracing::debug!(
                    target: "stave::layout",
                    row = cell.upper_left.row,
                    col = cell.upper_left.col,
                    "attach to occupied cell ignored"
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(cell);
                true
            }
        }
    }

    /// Remove the cell holding `item`. Returns the freed upper-left index.
    pub(crate) fn remove_cell(&mut self, item: ItemId) -> Option<CellCoord> {
        let coord = self
            .cells
            .iter()
            .find(|(_, c)| c.item == item)
            .map(|(coord, _)| *coord)?;
        self.cells.remove(&coord);
        Some(coord)
    }

    pub(crate) fn set_requested(&mut self, size: Size) -> bool {
        if self.requested != Some(size) {
            self.requested = Some(size);
            true
        } else {
            false
        }
    }

    /// Trailing decoration: margin + outline on the right/bottom.
    pub(crate) fn trailing(&self) -> Point {
        let outline = self.backing.outline_extent();
        Point::new(self.margin.right + outline, self.margin.bottom + outline)
    }

    /// Whether a cell takes part in layout at all.
    fn cell_active(&self, tree: &SceneTree, cell: &CellInfo) -> bool {
        !(self.collapse_on_hide && !tree.visible(cell.item))
    }

    /// Per-line accumulation: walk every cell, distribute its natural size
    /// over the lines it spans (divided by the span count), fold in the
    /// cell's padding and the inter-line spacing, and count expanders and
    /// shrinkers per line. Pinned line sizes override the accumulated
    /// naturals afterwards.
    fn accumulate(&self, tree: &SceneTree) -> (Vec<AxisInfo>, Vec<AxisInfo>) {
        let mut rows = vec![AxisInfo::default(); self.rows() as usize];
        let mut cols = vec![AxisInfo::default(); self.cols() as usize];

        for cell in self.cells.values() {
            if !self.cell_active(tree, cell) {
                continue;
            }
            let natural = tree.size_request(cell.item);

            let row_span = cell.row_span() as f32;
            let col_span = cell.col_span() as f32;

            for r in cell.upper_left.row..cell.lower_right.row.max(cell.upper_left.row + 1) {
                let info = &mut rows[r as usize];
                info.natural += natural.width / row_span + cell.padding.horizontal() + self.col_spacing;
                if cell.row_options.contains(PackOptions::EXPAND) {
                    info.expanders += 1;
                }
                if cell.row_options.contains(PackOptions::SHRINK) {
                    info.shrinkers += 1;
                }
                info.occupied = true;
            }

            for c in cell.upper_left.col..cell.lower_right.col.max(cell.upper_left.col + 1) {
                let info = &mut cols[c as usize];
                info.natural += natural.height / col_span + cell.padding.vertical() + self.row_spacing;
                if cell.col_options.contains(PackOptions::EXPAND) {
                    info.expanders += 1;
                }
                if cell.col_options.contains(PackOptions::SHRINK) {
                    info.shrinkers += 1;
                }
                info.occupied = true;
            }
        }

        for (idx, pinned) in self.row_sizes.iter().enumerate() {
            if let Some(size) = pinned {
                rows[idx].natural = *size;
            }
        }
        for (idx, pinned) in self.col_sizes.iter().enumerate() {
            if let Some(size) = pinned {
                cols[idx].natural = *size;
            }
        }

        (rows, cols)
    }

    /// Natural size: the widest row by the tallest column, plus margins and
    /// outline.
    pub(crate) fn natural_size(&self, tree: &SceneTree, _id: ItemId) -> Size {
        let (rows, cols) = self.accumulate(tree);
        let width = rows.iter().map(|r| r.natural).fold(0.0f32, f32::max);
        let height = cols.iter().map(|c| c.natural).fold(0.0f32, f32::max);
        let trailing = self.trailing();
        Size::new(
            self.margin.left + width + trailing.x,
            self.margin.top + height + trailing.y,
        )
    }

    /// The two-pass allocation algorithm.
    ///
    /// With `within == None` this is a pure size query and returns the
    /// natural size without touching any child. Otherwise every active cell
    /// is measured, granted a size, and placed in row-major order.
    pub(crate) fn compute(
        &mut self,
        tree: &mut SceneTree,
        id: ItemId,
        within: Option<Rect>,
    ) -> Size {
        let Some(within) = within else {
            return self.natural_size(tree, id);
        };

        let (mut rows, mut cols) = self.accumulate(tree);
        let nrows = rows.len();
        let ncols = cols.len();
        if nrows == 0 || ncols == 0 {
            return self.natural_size(tree, id);
        }

        let content = Size::new(
            (within.width() - self.margin.horizontal()).max(0.0),
            (within.height() - self.margin.vertical()).max(0.0),
        );

        // Per-line surplus/deficit, split evenly across the line's
        // expanders (or shrinkers when negative). Lines no cell occupies
        // keep a zero delta.
        for info in rows.iter_mut() {
            if !info.occupied {
                continue;
            }
            let delta = content.width - info.natural;
            info.delta = if delta > 0.0 && info.expanders > 0 {
                delta / info.expanders as f32
            } else if delta < 0.0 && info.shrinkers > 0 {
                delta / info.shrinkers as f32
            } else {
                0.0
            };
        }
        for info in cols.iter_mut() {
            if !info.occupied {
                continue;
            }
            let delta = content.height - info.natural;
            info.delta = if delta > 0.0 && info.expanders > 0 {
                delta / info.expanders as f32
            } else if delta < 0.0 && info.shrinkers > 0 {
                delta / info.shrinkers as f32
            } else {
                0.0
            };
        }

        let per_cell_width = content.width / ncols as f32;
        let per_cell_height = content.height / nrows as f32;

        // Sizing pass: grant every active cell its content size.
        let coords: Vec<CellCoord> = self.cells.keys().copied().collect();
        for coord in &coords {
            let (active, natural, row_delta, col_delta) = {
                let cell = &self.cells[coord];
                let active = self.cell_active(tree, cell);
                let natural = if active {
                    tree.size_request(cell.item)
                } else {
                    Size::ZERO
                };
                (
                    active,
                    natural,
                    delta_for(&rows[cell.upper_left.row as usize], cell.row_options),
                    delta_for(&cols[cell.upper_left.col as usize], cell.col_options),
                )
            };

            let cell = self.cells.get_mut(coord).expect("cell vanished mid-pass");
            cell.natural = natural;
            if !active {
                cell.allocated = Size::ZERO;
                cell.full = Size::ZERO;
                continue;
            }

            let (width, height) = if self.homogeneous {
                let w = cell.col_span() as f32 * (per_cell_width + row_delta)
                    - cell.padding.horizontal()
                    - self.col_spacing;
                let h = cell.row_span() as f32 * (per_cell_height + col_delta)
                    - cell.padding.vertical()
                    - self.row_spacing;
                (w, h)
            } else {
                (natural.width + row_delta, natural.height + col_delta)
            };

            cell.allocated = Size::new(width.max(0.0), height.max(0.0));
            cell.full = Size::new(
                cell.allocated.width + cell.padding.horizontal(),
                cell.allocated.height + cell.padding.vertical(),
            );
        }

        // Placement pass: row-major walk with a running horizontal distance
        // per row and a vertical shift advanced once per row by its tallest
        // cell.
        self.row_boundaries.clear();
        self.col_boundaries.clear();
        let mut vdistance = self.margin.top;
        let mut max_right = 0.0f32;

        for r in 0..nrows as u32 {
            let mut hdistance = self.margin.left;
            let mut tallest = 0.0f32;
            let mut placed = false;

            let row_cells: Vec<CellCoord> = self
                .cells
                .range(CellCoord::new(r, 0)..=CellCoord::new(r, u32::MAX))
                .map(|(coord, _)| *coord)
                .collect();

            for coord in row_cells {
                let (item, allocated, full, padding, col_idx, fill_w, fill_h, natural) = {
                    let cell = &self.cells[&coord];
                    if !self.cell_active(tree, cell) {
                        continue;
                    }
                    (
                        cell.item,
                        cell.allocated,
                        cell.full,
                        cell.padding,
                        cell.upper_left.col as usize,
                        cell.row_options.contains(PackOptions::FILL),
                        cell.col_options.contains(PackOptions::FILL),
                        cell.natural,
                    )
                };

                if col_idx >= self.col_boundaries.len() {
                    self.col_boundaries.resize(col_idx + 1, hdistance);
                    self.col_boundaries[col_idx] = hdistance;
                }

                tree.set_position(
                    item,
                    Point::new(hdistance + padding.left, vdistance + padding.top),
                );
                tree.size_allocate(
                    item,
                    Size::new(
                        if fill_w { allocated.width } else { natural.width.min(allocated.width) },
                        if fill_h { allocated.height } else { natural.height.min(allocated.height) },
                    ),
                );

                hdistance += allocated.width + padding.right + self.col_spacing;
                tallest = tallest.max(full.height);
                placed = true;
            }

            max_right = max_right.max(hdistance);
            if placed {
                vdistance += tallest + self.row_spacing;
                self.row_boundaries.push(vdistance - self.row_spacing / 2.0);
            }
        }

        let trailing = self.trailing();
        Size::new(max_right.max(self.margin.left) + trailing.x, vdistance + trailing.y)
    }

    /// Lazy layout entry point: allocate within the requested size (or the
    /// natural size when none was requested) and resize the backing
    /// rectangle to the resulting extent.
    pub(crate) fn layout(&mut self, tree: &mut SceneTree, id: ItemId) {
        let within = self
            .requested
            .unwrap_or_else(|| self.natural_size(tree, id));
        let total = self.compute(tree, id, Some(Rect {
            origin: Point::ZERO,
            size: within,
        }));
        self.backing.set_rect(Rect {
            origin: Point::ZERO,
            size: total.max(self.requested.unwrap_or(Size::ZERO)),
        });
        tree.mark_bounding_box_dirty(id);
        tracing::trace!(target: "stave::layout", cells = self.cells.len(), "table laid out");
    }

    /// Draw the backing rectangle and, when enabled, the grid separator
    /// lines recorded by the last placement pass.
    pub(crate) fn render(&self, origin: Point, painter: &mut dyn Painter) {
        self.backing.render(origin, painter);

        if !self.draw_row_lines && !self.draw_col_lines {
            return;
        }
        let stroke = Stroke::default();
        let rect = self.backing.rect().translate(origin);

        if self.draw_row_lines {
            // Interior boundaries only; the last boundary is the grid edge.
            for &y in self.row_boundaries.iter().take(self.row_boundaries.len().saturating_sub(1)) {
                painter.stroke_line(
                    Point::new(rect.left() + self.margin.left, origin.y + y),
                    Point::new(rect.right() - self.margin.right, origin.y + y),
                    &stroke,
                );
            }
        }
        if self.draw_col_lines {
            for &x in self.col_boundaries.iter().skip(1) {
                painter.stroke_line(
                    Point::new(origin.x + x, rect.top() + self.margin.top),
                    Point::new(origin.x + x, rect.bottom() - self.margin.bottom),
                    &stroke,
                );
            }
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// The delta a cell actually receives from its line: the expand share when
/// the line has surplus and the cell asked to expand, the shrink share when
/// the line has deficit and the cell asked to shrink, zero otherwise.
fn delta_for(info: &AxisInfo, options: PackOptions) -> f32 {
    if info.delta > 0.0 && options.contains(PackOptions::EXPAND) {
        info.delta
    } else if info.delta < 0.0 && options.contains(PackOptions::SHRINK) {
        info.delta
    } else {
        0.0
    }
}
