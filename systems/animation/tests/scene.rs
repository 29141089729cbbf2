use std::f32::consts::PI;

use astarcraft_core::Direction;
use astarcraft_rendering::{Color, Primitive, Recording, SpriteImage};
use astarcraft_system_animation::{angle, AnimationController, ViewerConfig, ViewerLayout};
use astarcraft_world::{MapLayout, World};
use glam::Vec2;

/// Three void corners; the open top-right corner makes its wrapped
/// neighbours across both edges get portals.
const RAGGED: &str = "
#...
....
#R.#";

fn build(rows: &str) -> (AnimationController, Recording) {
    let world = World::new(MapLayout::parse(rows).expect("valid layout"));
    let mut recording = Recording::new();
    let controller = AnimationController::new(&ViewerConfig::default(), &mut recording, &world)
        .expect("scene builds");
    recording.finish();
    (controller, recording)
}

fn placed(recording: &Recording, image: SpriteImage) -> Vec<(Vec2, f32)> {
    recording
        .entities_where(move |primitive| *primitive == Primitive::Sprite(image))
        .map(|sprite| {
            let state = recording.entity_state(sprite).expect("committed sprite");
            (state.position, state.rotation)
        })
        .collect()
}

/// Portal on the left edge of the cell, or the right one when `far`.
fn column_edge(layout: &ViewerLayout, column: i32, row: i32, far: bool) -> (Vec2, f32) {
    let x = if far { layout.cell_width() } else { 0.0 };
    let position = layout.cell_origin(column, row) + Vec2::new(x, layout.cell_height() / 2.0);
    (position, PI * 0.5)
}

/// Portal on the top edge of the cell, or the bottom one when `far`.
fn row_edge(layout: &ViewerLayout, column: i32, row: i32, far: bool) -> (Vec2, f32) {
    let y = if far { layout.cell_height() } else { 0.0 };
    let position = layout.cell_origin(column, row) + Vec2::new(layout.cell_width() / 2.0, y);
    (position, 0.0)
}

#[test]
fn void_cells_get_no_floor_tile() {
    let (controller, recording) = build(RAGGED);
    let layout = controller.layout();

    let floors: Vec<Vec2> = recording
        .entities_where(|primitive| matches!(primitive, Primitive::Sprite(SpriteImage::Floor(_))))
        .map(|tile| recording.entity_state(tile).expect("tile").position)
        .collect();

    let void = [(0, 0), (0, 2), (3, 2)];
    assert_eq!(floors.len(), 12 - void.len());
    for (column, row) in void {
        assert!(!floors.contains(&layout.cell_origin(column, row)));
    }
    assert!(floors.contains(&layout.cell_origin(1, 2)));
}

#[test]
fn initial_arrows_are_dimmed_at_full_size() {
    let (controller, recording) = build(RAGGED);

    let arrows: Vec<_> = recording
        .entities_where(|primitive| *primitive == Primitive::Sprite(SpriteImage::Arrow))
        .collect();
    assert_eq!(arrows.len(), 1);

    let arrow = recording.entity_state(arrows[0]).expect("arrow");
    assert_eq!(arrow.tint, Color::from_hex(0x888888));
    assert_eq!(arrow.scale, controller.layout().arrow_scale());
    assert_eq!(arrow.position, controller.layout().cell_center(1, 2));
    assert_eq!(arrow.rotation, angle::rotation(Direction::Right));
}

#[test]
fn grid_lines_bound_every_cell() {
    let (_, recording) = build(RAGGED);

    let lines = recording
        .entities_where(|primitive| matches!(primitive, Primitive::Line { .. }))
        .count();
    assert_eq!(lines, (4 + 1) + (3 + 1));
}

#[test]
fn portals_open_where_either_side_of_the_edge_is_solid() {
    let (controller, recording) = build(RAGGED);
    let layout = controller.layout();
    let portals = placed(&recording, SpriteImage::Portal);

    let mut expected = vec![
        column_edge(layout, 0, 0, false),
        column_edge(layout, 0, 1, false),
        column_edge(layout, 3, 0, true),
        column_edge(layout, 3, 1, true),
    ];
    expected.extend([1, 2, 3].map(|column| row_edge(layout, column, 0, false)));
    expected.extend([1, 2, 3].map(|column| row_edge(layout, column, 2, true)));

    assert_eq!(portals.len(), expected.len());
    for portal in &expected {
        assert!(portals.contains(portal), "missing portal at {portal:?}");
    }

    let closed = [
        column_edge(layout, 0, 2, false),
        column_edge(layout, 3, 2, true),
        row_edge(layout, 0, 0, false),
        row_edge(layout, 0, 2, true),
    ];
    for portal in &closed {
        assert!(!portals.contains(portal), "portal between two void cells at {portal:?}");
    }
}
