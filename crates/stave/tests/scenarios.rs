//! End-to-end scenarios driving layout, rendering, and hit testing through
//! the public API.

use stave::widgets::{BoundaryEdge, BoundaryMarker, SectionBox};
use stave::{BoxItem, CellCoord, Margins, PackOptions, Rectangle, SceneTree, Table};
use stave_render::{Color, DrawCommand, Point, Rect, RecordingPainter, Size};

fn leaf(tree: &mut SceneTree, width: f32, height: f32) -> stave::ItemId {
    tree.insert(Rectangle::new(Rect::new(0.0, 0.0, width, height)).with_fill(Color::GRAY))
}

#[test]
fn nested_boxes_compose_their_extents() {
    let mut tree = SceneTree::new();
    let column = tree.insert(BoxItem::vertical());
    tree.update_box(column, |b| b.set_spacing(2.0));

    let header = leaf(&mut tree, 40.0, 8.0);
    tree.add_child(column, header).unwrap();

    let row = tree.insert(BoxItem::horizontal());
    tree.update_box(row, |b| b.set_spacing(4.0));
    for w in [10.0, 20.0, 30.0] {
        let child = leaf(&mut tree, w, 5.0);
        tree.add_child(row, child).unwrap();
    }
    tree.add_child(column, row).unwrap();

    tree.flush_layout();

    // The inner row reports its packed extent to the outer column.
    assert_eq!(tree.size_request(row), Size::new(68.0, 5.0));
    assert_eq!(tree.size_request(column), Size::new(68.0, 15.0));
    assert_eq!(tree.position(row), Point::new(0.0, 10.0));
    assert_eq!(
        tree.bounding_box(column),
        Some(Rect::new(0.0, 0.0, 68.0, 15.0))
    );
}

#[test]
fn repeated_flushes_settle_to_a_fixpoint() {
    let mut tree = SceneTree::new();
    let column = tree.insert(BoxItem::vertical());
    let row = tree.insert(BoxItem::horizontal());
    tree.add_child(column, row).unwrap();
    for w in [10.0, 20.0] {
        let child = leaf(&mut tree, w, 5.0);
        tree.add_child(row, child).unwrap();
    }

    tree.flush_layout();
    let first = tree.bounding_box(column);

    tree.flush_layout();
    tree.flush_layout();
    assert_eq!(tree.bounding_box(column), first);
    assert!(!tree.layout_queued(column));
    assert!(!tree.layout_queued(row));
}

#[test]
fn table_inside_a_box_allocates_through_both_passes() {
    let mut tree = SceneTree::new();
    let column = tree.insert(BoxItem::vertical());

    let table = tree.insert(Table::new());
    tree.update_table(table, |t| t.set_homogeneous(true));
    let a = leaf(&mut tree, 50.0, 20.0);
    let b = leaf(&mut tree, 50.0, 20.0);
    tree.attach(
        table,
        a,
        CellCoord::new(0, 0),
        CellCoord::new(1, 1),
        PackOptions::FILL,
        PackOptions::FILL,
        Margins::ZERO,
    )
    .unwrap();
    tree.attach(
        table,
        b,
        CellCoord::new(0, 1),
        CellCoord::new(1, 2),
        PackOptions::FILL,
        PackOptions::FILL,
        Margins::ZERO,
    )
    .unwrap();
    tree.add_child(column, table).unwrap();

    tree.flush_layout();

    assert_eq!(tree.size_request(table), Size::new(100.0, 20.0));
    assert_eq!(tree.position(b), Point::new(50.0, 0.0));
    assert_eq!(
        tree.bounding_box(column),
        Some(Rect::new(0.0, 0.0, 100.0, 20.0))
    );
}

#[test]
fn markers_and_sections_render_over_the_arrangement() {
    let mut tree = SceneTree::new();

    let section = tree.insert_widget(Box::new(SectionBox::new(
        Rect::new(20.0, 0.0, 200.0, 100.0),
        Color::BLUE,
    )));
    let start = tree.insert_widget(Box::new(BoundaryMarker::new(
        Rect::new(20.0, 0.0, 3.0, 100.0),
        BoundaryEdge::Start,
        Color::WHITE,
    )));

    let mut painter = RecordingPainter::new();
    tree.render(Rect::new(0.0, 0.0, 400.0, 200.0), &mut painter, 1.0);

    // Section fill first (inserted first), then the marker body and handle.
    assert!(matches!(painter.commands()[0], DrawCommand::FillRect { .. }));
    assert!(
        painter
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FillArc { .. }))
    );

    // The marker is on top of the section where they overlap.
    assert_eq!(tree.item_at(Point::new(21.0, 50.0), 1.0), Some(start));
    assert_eq!(tree.item_at(Point::new(150.0, 50.0), 1.0), Some(section));
}

#[test]
fn ui_scale_widens_marker_hit_regions() {
    let mut tree = SceneTree::new();
    let _section = tree.insert_widget(Box::new(SectionBox::new(
        Rect::new(0.0, 0.0, 400.0, 100.0),
        Color::BLUE,
    )));
    let marker = tree.insert_widget(Box::new(BoundaryMarker::new(
        Rect::new(100.0, 0.0, 3.0, 100.0),
        BoundaryEdge::Start,
        Color::WHITE,
    )));

    let probe = Point::new(95.0, 50.0); // 5px left of the marker body
    assert_ne!(tree.item_at(probe, 1.0), Some(marker));
    assert_eq!(tree.item_at(probe, 2.0), Some(marker));
}

#[test]
fn grid_lines_are_drawn_between_lines_when_enabled() {
    let mut tree = SceneTree::new();
    let table = tree.insert(Table::new());
    tree.update_table(table, |t| {
        t.set_homogeneous(true);
        t.set_draw_grid_lines(true, true);
        t.backing_mut().set_fill(Some(Color::BLACK));
    });
    for (row, col) in [(0u32, 0u32), (0, 1), (1, 0), (1, 1)] {
        let cell = leaf(&mut tree, 30.0, 10.0);
        tree.attach(
            table,
            cell,
            CellCoord::new(row, col),
            CellCoord::new(row + 1, col + 1),
            PackOptions::empty(),
            PackOptions::empty(),
            Margins::ZERO,
        )
        .unwrap();
    }
    tree.flush_layout();

    let mut painter = RecordingPainter::new();
    tree.render(Rect::new(0.0, 0.0, 400.0, 200.0), &mut painter, 1.0);

    let lines = painter
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::StrokeLine { .. }))
        .count();
    // One interior row boundary and one interior column boundary.
    assert_eq!(lines, 2);
}
