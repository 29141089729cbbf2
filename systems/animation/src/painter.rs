use astarcraft_core::{CellCoord, Direction, RobotId};
use astarcraft_rendering::{
    Color, EntityId, GraphicSurface, Primitive, Property, SpriteImage,
};
use glam::Vec2;

use crate::{
    angle,
    config::{ViewerConfig, ViewerLayout, ZLayers},
    visual::RobotVisual,
    wraparound::PhantomCell,
};

/// Creates the primitives the viewer is made of.
#[derive(Clone, Debug)]
pub(crate) struct Painter {
    layout: ViewerLayout,
    layers: ZLayers,
    text_color: Color,
    portal_tint: Color,
}

impl Painter {
    pub(crate) fn new(config: &ViewerConfig, layout: ViewerLayout) -> Self {
        Self {
            layout,
            layers: config.layers,
            text_color: Color::from_hex(config.text_color),
            portal_tint: Color::from_hex(config.portal_tint),
        }
    }

    pub(crate) const fn layout(&self) -> &ViewerLayout {
        &self.layout
    }

    pub(crate) const fn layers(&self) -> &ZLayers {
        &self.layers
    }

    pub(crate) const fn text_color(&self) -> Color {
        self.text_color
    }

    pub(crate) fn cell_center(&self, cell: PhantomCell) -> Vec2 {
        self.layout.cell_center(cell.column, cell.row)
    }

    /// Creates a robot sprite and its id label at `cell`.
    pub(crate) fn robot<S: GraphicSurface>(
        &self,
        surface: &mut S,
        robot: RobotId,
        cell: PhantomCell,
        rotation: f32,
        tint: Color,
    ) -> RobotVisual {
        let position = self.cell_center(cell);

        let sprite = surface.create(Primitive::Sprite(SpriteImage::Robot));
        surface.set(sprite, Property::Scale(self.layout.robot_scale()));
        surface.set(sprite, Property::Anchor(0.5));
        surface.set(sprite, Property::Rotation(rotation));
        surface.set(sprite, Property::Tint(tint));
        surface.set(sprite, Property::Position(position));
        surface.set(sprite, Property::ZIndex(self.layers.robot));

        let label = surface.create(Primitive::Text(robot.get().to_string()));
        surface.set(label, Property::FillColor(self.text_color));
        surface.set(label, Property::ZIndex(self.layers.robot));
        surface.set(label, Property::Position(position));
        surface.set(label, Property::Anchor(0.5));

        RobotVisual::new(robot, sprite, label, position, rotation, tint)
    }

    /// Creates an arrow sprite centered on `cell`; callers decide its scale.
    pub(crate) fn arrow<S: GraphicSurface>(
        &self,
        surface: &mut S,
        cell: CellCoord,
        direction: Direction,
    ) -> EntityId {
        let arrow = surface.create(Primitive::Sprite(SpriteImage::Arrow));
        surface.set(
            arrow,
            Property::Position(self.cell_center(PhantomCell::from_cell(cell))),
        );
        surface.set(arrow, Property::ZIndex(self.layers.arrow));
        surface.set(arrow, Property::Rotation(angle::rotation(direction)));
        surface.set(arrow, Property::Anchor(0.5));
        arrow
    }

    /// Creates a portal marker centered on a grid boundary.
    pub(crate) fn portal<S: GraphicSurface>(
        &self,
        surface: &mut S,
        position: Vec2,
        rotation: f32,
    ) -> EntityId {
        let portal = surface.create(Primitive::Sprite(SpriteImage::Portal));
        surface.set(portal, Property::Scale(self.layout.portal_scale()));
        surface.set(portal, Property::ZIndex(self.layers.portal));
        surface.set(portal, Property::Anchor(0.5));
        surface.set(portal, Property::Tint(self.portal_tint));
        surface.set(portal, Property::Position(position));
        surface.set(portal, Property::Rotation(rotation));
        portal
    }
}
