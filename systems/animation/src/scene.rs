//! One-off construction of the static scene.

use std::{
    collections::{BTreeMap, BTreeSet},
    f32::consts::PI,
};

use astarcraft_core::{CellCoord, MarkerKind, RobotId, SimulationView};
use astarcraft_rendering::{Color, EntityId, GraphicSurface, Primitive, Property, SpriteImage};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::{
    angle,
    config::ViewerConfig,
    painter::Painter,
    visual::RobotVisual,
    wraparound::{signed, PhantomCell},
};

/// Elements of the static scene the animators keep working with.
#[derive(Debug)]
pub(crate) struct StaticScene {
    pub(crate) visuals: BTreeMap<RobotId, RobotVisual>,
    pub(crate) initially_marked: BTreeSet<CellCoord>,
    pub(crate) score_label: EntityId,
}

/// Draws background, grid, floor, arrows, portals, robots and score labels.
pub(crate) fn build<S, V>(
    config: &ViewerConfig,
    painter: &Painter,
    surface: &mut S,
    simulation: &V,
) -> StaticScene
where
    S: GraphicSurface,
    V: SimulationView,
{
    let layers = painter.layers();

    let background = surface.create(Primitive::Sprite(SpriteImage::Background));
    surface.set(background, Property::Position(Vec2::ZERO));
    surface.set(background, Property::Scale(config.background_scale));
    surface.set(background, Property::ZIndex(layers.background));

    draw_grid_lines(config, painter, surface);

    let layout = painter.layout();
    let size = layout.size();
    let mut rng = ChaCha8Rng::seed_from_u64(config.floor_seed);
    let dimmed = Color::from_hex(config.initial_arrow_tint);
    let mut initially_marked = BTreeSet::new();

    for cell in size.cells() {
        let column = signed(cell.column());
        let row = signed(cell.row());
        let marker = simulation.marker(column, row);

        if !marker.is_void() {
            let variant: u8 = rng.gen_range(0..config.floor_variants);
            let floor = surface.create(Primitive::Sprite(SpriteImage::Floor(variant)));
            surface.set(floor, Property::Scale(layout.tile_scale()));
            surface.set(floor, Property::Position(layout.cell_origin(column, row)));
            surface.set(floor, Property::ZIndex(layers.floor));
        }

        if let MarkerKind::Arrow(direction) = marker {
            let arrow = painter.arrow(surface, cell, direction);
            surface.set(arrow, Property::Scale(layout.arrow_scale()));
            surface.set(arrow, Property::Tint(dimmed));
            let _ = initially_marked.insert(cell);
        }

        draw_portals(painter, surface, simulation, cell, marker);
    }

    let mut visuals = BTreeMap::new();
    for robot in simulation.live_robots() {
        let visual = painter.robot(
            surface,
            robot.id,
            PhantomCell::from_cell(robot.cell),
            angle::rotation(robot.direction),
            Color::WHITE,
        );
        let _ = visuals.insert(robot.id, visual);
    }

    let caption = surface.create(Primitive::Text("Score".to_owned()));
    surface.set(caption, Property::Position(Vec2::from(config.score_caption_position)));
    surface.set(caption, Property::FillColor(painter.text_color()));

    let score_label = surface.create(Primitive::Text("0".to_owned()));
    surface.set(score_label, Property::Position(Vec2::from(config.score_value_position)));
    surface.set(score_label, Property::FillColor(painter.text_color()));

    info!(
        columns = size.columns(),
        rows = size.rows(),
        robots = visuals.len(),
        arrows = initially_marked.len(),
        "static scene built"
    );

    StaticScene {
        visuals,
        initially_marked,
        score_label,
    }
}

fn draw_grid_lines<S: GraphicSurface>(config: &ViewerConfig, painter: &Painter, surface: &mut S) {
    let layout = painter.layout();
    let size = layout.size();
    let origin = layout.offset();
    let color = Color::from_hex(config.grid_color);

    let vertical = (0..=size.columns()).map(|column| {
        let x = origin.x + layout.cell_width() * column as f32;
        (
            Vec2::new(x, origin.y),
            Vec2::new(x, origin.y + config.viewer_height),
        )
    });
    let horizontal = (0..=size.rows()).map(|row| {
        let y = origin.y + layout.cell_height() * row as f32;
        (
            Vec2::new(origin.x, y),
            Vec2::new(origin.x + config.viewer_width, y),
        )
    });

    for (from, to) in vertical.chain(horizontal) {
        let line = surface.create(Primitive::Line {
            from,
            to,
            width: 1.0,
            color,
        });
        surface.set(line, Property::Alpha(config.grid_alpha));
        surface.set(line, Property::ZIndex(painter.layers().grid));
    }
}

/// Marks the edges a robot standing on `cell` may wrap through.
///
/// An edge gets a portal when either side of it is solid ground.
fn draw_portals<S, V>(
    painter: &Painter,
    surface: &mut S,
    simulation: &V,
    cell: CellCoord,
    marker: MarkerKind,
) where
    S: GraphicSurface,
    V: SimulationView,
{
    let layout = painter.layout();
    let size = layout.size();
    let column = signed(cell.column());
    let row = signed(cell.row());
    let origin = layout.cell_origin(column, row);
    let half_width = layout.cell_width() / 2.0;
    let half_height = layout.cell_height() / 2.0;
    let open = |column: i32, row: i32| !marker.is_void() || !simulation.marker(column, row).is_void();

    if cell.column() == 0 && open(column - 1, row) {
        let position = origin + Vec2::new(0.0, half_height);
        let _ = painter.portal(surface, position, PI * 0.5);
    }

    if cell.column() + 1 == size.columns() && open(column + 1, row) {
        let position = origin + Vec2::new(layout.cell_width(), half_height);
        let _ = painter.portal(surface, position, PI * 0.5);
    }

    if cell.row() == 0 && open(column, row - 1) {
        let position = origin + Vec2::new(half_width, 0.0);
        let _ = painter.portal(surface, position, 0.0);
    }

    if cell.row() + 1 == size.rows() && open(column, row + 1) {
        let position = origin + Vec2::new(half_width, layout.cell_height());
        let _ = painter.portal(surface, position, 0.0);
    }
}
