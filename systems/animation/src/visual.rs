use astarcraft_core::RobotId;
use astarcraft_rendering::{Color, EntityId, GraphicSurface, Property};
use glam::Vec2;

/// Sprite and id label pair standing for one robot on screen.
///
/// The label is created with its sprite and every positional, opacity and
/// scale change goes through this type so both stay in lockstep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobotVisual {
    robot: RobotId,
    sprite: EntityId,
    label: EntityId,
    position: Vec2,
    rotation: f32,
    tint: Color,
}

impl RobotVisual {
    pub(crate) const fn new(
        robot: RobotId,
        sprite: EntityId,
        label: EntityId,
        position: Vec2,
        rotation: f32,
        tint: Color,
    ) -> Self {
        Self {
            robot,
            sprite,
            label,
            position,
            rotation,
            tint,
        }
    }

    /// Robot the pair stands for.
    #[must_use]
    pub const fn robot(&self) -> RobotId {
        self.robot
    }

    /// Handle of the robot sprite.
    #[must_use]
    pub const fn sprite(&self) -> EntityId {
        self.sprite
    }

    /// Handle of the id label bound to the sprite.
    #[must_use]
    pub const fn label(&self) -> EntityId {
        self.label
    }

    /// Last position requested for the pair.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Last rotation requested for the sprite.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Tint carried by the sprite.
    #[must_use]
    pub const fn tint(&self) -> Color {
        self.tint
    }

    pub(crate) fn move_to<S: GraphicSurface>(&mut self, surface: &mut S, position: Vec2) {
        self.position = position;
        surface.set(self.sprite, Property::Position(position));
        surface.set(self.label, Property::Position(position));
    }

    pub(crate) fn set_alpha<S: GraphicSurface>(&self, surface: &mut S, alpha: f32) {
        surface.set(self.sprite, Property::Alpha(alpha));
        surface.set(self.label, Property::Alpha(alpha));
    }

    /// Shrinks sprite and label to nothing.
    pub(crate) fn collapse<S: GraphicSurface>(&self, surface: &mut S) {
        surface.set(self.sprite, Property::Scale(0.0));
        surface.set(self.label, Property::Scale(0.0));
    }

    /// Puts the pair back, fully visible, where it was last moved and turned.
    pub(crate) fn redraw<S: GraphicSurface>(&self, surface: &mut S, sprite_scale: f32) {
        surface.set(self.sprite, Property::Position(self.position));
        surface.set(self.label, Property::Position(self.position));
        surface.set(self.sprite, Property::Rotation(self.rotation));
        surface.set(self.sprite, Property::Scale(sprite_scale));
        surface.set(self.label, Property::Scale(1.0));
        self.set_alpha(surface, 1.0);
    }

    pub(crate) fn rotate<S: GraphicSurface>(&mut self, surface: &mut S, rotation: f32) {
        self.rotation = rotation;
        surface.set(self.sprite, Property::Rotation(rotation));
    }
}
