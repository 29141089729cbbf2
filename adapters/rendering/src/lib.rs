#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Astarcraft viewers.
//!
//! The animation system talks to an opaque [`GraphicSurface`]: it creates
//! primitives, mutates their properties and commits keyframes at normalised
//! times within a frame. The surface interpolates every property changed since
//! the previous commit across the span up to the next one.

mod recording;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::{error::Error, f32::consts::PI, fmt};

pub use recording::{Commit, EntityState, Frame, Mutation, Recording};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white, the neutral tint.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8(
            ((rgb >> 16) & 0xff) as u8,
            ((rgb >> 8) & 0xff) as u8,
            (rgb & 0xff) as u8,
        )
    }

    /// Linearly blends towards `target` by `amount`.
    #[must_use]
    pub fn lerp(self, target: Self, amount: f32) -> Self {
        Self {
            red: lerp(self.red, target.red, amount),
            green: lerp(self.green, target.green, amount),
            blue: lerp(self.blue, target.blue, amount),
            alpha: lerp(self.alpha, target.alpha, amount),
        }
    }
}

fn lerp(from: f32, to: f32, amount: f32) -> f32 {
    from + (to - from) * amount
}

/// Handle of a primitive owned by a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Images a sprite may display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteImage {
    /// Full-screen backdrop.
    Background,
    /// Floor tile; the payload selects one of the interchangeable variants.
    Floor(u8),
    /// Directional arrow pointing toward positive x before rotation.
    Arrow,
    /// Robot body facing positive x before rotation.
    Robot,
    /// Marker drawn on grid edges that wrap around.
    Portal,
}

/// Primitive kinds a surface can create.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Textured quad.
    Sprite(SpriteImage),
    /// Straight segment between two screen points.
    Line {
        /// Start of the segment in screen pixels.
        from: Vec2,
        /// End of the segment in screen pixels.
        to: Vec2,
        /// Stroke width in screen pixels.
        width: f32,
        /// Stroke color.
        color: Color,
    },
    /// Text overlay showing the provided content.
    Text(String),
}

/// Mutable properties shared by every primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Property {
    /// Screen position in pixels.
    Position(Vec2),
    /// Clockwise rotation in radians.
    Rotation(f32),
    /// Uniform scale factor.
    Scale(f32),
    /// Opacity in the range 0.0..=1.0.
    Alpha(f32),
    /// Multiplicative tint.
    Tint(Color),
    /// Stacking order; higher values draw on top.
    ZIndex(i32),
    /// Normalised anchor applied on both axes.
    Anchor(f32),
    /// Text content of a text primitive.
    Text(String),
    /// Fill color of a text primitive.
    FillColor(Color),
}

/// Easing curves a surface applies when interpolating toward a commit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    /// Constant speed.
    #[default]
    Linear,
    /// Quadratic acceleration.
    EaseIn,
    /// Quadratic deceleration.
    EaseOut,
    /// Quadratic acceleration then deceleration.
    EaseInOut,
    /// Springy overshoot that settles on the target.
    Elastic,
    /// Jumps to the target as soon as the span starts.
    Immediate,
}

impl Curve {
    /// Maps linear progress in `0.0..=1.0` onto eased progress.
    ///
    /// Every curve maps 0 to 0 and 1 to 1; [`Curve::Elastic`] overshoots 1 in
    /// between.
    #[must_use]
    pub fn apply(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::Elastic => {
                if t <= 0.0 || t >= 1.0 {
                    t
                } else {
                    let period = (2.0 * PI) / 3.0;
                    2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * period).sin() + 1.0
                }
            }
            Self::Immediate => {
                if t > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Keyframe commit point within a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    time: f32,
}

impl Checkpoint {
    /// Start of a frame: elements are created or hidden without motion.
    pub const SETUP: Self = Self::at(0.0);
    /// Primary motion frame of a tick.
    pub const TRANSITION: Self = Self::at(0.75);
    /// End of a frame.
    pub const FINALIZE: Self = Self::at(1.0);

    /// Creates a checkpoint at the provided normalised time.
    #[must_use]
    pub const fn at(time: f32) -> Self {
        Self { time }
    }

    /// Normalised time of the checkpoint.
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }
}

/// Surface capable of displaying and animating primitives.
pub trait GraphicSurface {
    /// Creates a primitive with default properties and returns its handle.
    fn create(&mut self, primitive: Primitive) -> EntityId;

    /// Changes a property, interpolated with the provided curve up to the next commit.
    fn set_with_curve(&mut self, entity: EntityId, property: Property, curve: Curve);

    /// Commits every change made since the previous commit at the checkpoint.
    fn commit(&mut self, checkpoint: Checkpoint) -> Result<(), SurfaceError>;

    /// Changes a property using linear interpolation.
    fn set(&mut self, entity: EntityId, property: Property) {
        self.set_with_curve(entity, property, Curve::Linear);
    }
}

/// Errors reported by surfaces when committing keyframes.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceError {
    /// Commit times must lie within 0.0..=1.0.
    TimeOutOfRange {
        /// Rejected commit time.
        time: f32,
    },
    /// Commit times must not decrease within a frame.
    TimeWentBackwards {
        /// Time of the previous commit in the frame.
        previous: f32,
        /// Rejected commit time.
        time: f32,
    },
    /// A mutation referenced an entity the surface never created.
    UnknownEntity {
        /// Handle that failed validation.
        entity: EntityId,
    },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeOutOfRange { time } => {
                write!(f, "commit time must lie within 0.0..=1.0 (received {time})")
            }
            Self::TimeWentBackwards { previous, time } => {
                write!(
                    f,
                    "commit time {time} precedes the previous commit at {previous}"
                )
            }
            Self::UnknownEntity { entity } => {
                write!(f, "entity {} was never created", entity.get())
            }
        }
    }
}

impl Error for SurfaceError {}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Curve; 6] = [
        Curve::Linear,
        Curve::EaseIn,
        Curve::EaseOut,
        Curve::EaseInOut,
        Curve::Elastic,
        Curve::Immediate,
    ];

    #[test]
    fn curves_start_at_zero_and_settle_on_one() {
        for curve in CURVES {
            assert!(curve.apply(0.0).abs() < 1e-6, "{curve:?} at 0");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-6, "{curve:?} at 1");
        }
    }

    #[test]
    fn curves_clamp_out_of_range_progress() {
        for curve in CURVES {
            assert!((curve.apply(2.0) - 1.0).abs() < 1e-6, "{curve:?} above 1");
            assert!(curve.apply(-1.0).abs() < 1e-6, "{curve:?} below 0");
        }
    }

    #[test]
    fn quadratic_curves_match_midpoints() {
        assert!((Curve::EaseIn.apply(0.5) - 0.25).abs() < 1e-6);
        assert!((Curve::EaseOut.apply(0.5) - 0.75).abs() < 1e-6);
        assert!((Curve::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn elastic_curve_overshoots_before_settling() {
        let peak = (1..100)
            .map(|step| Curve::Elastic.apply(step as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "elastic peak {peak} should overshoot");
    }

    #[test]
    fn immediate_curve_jumps_once_the_span_starts() {
        assert_eq!(Curve::Immediate.apply(0.01), 1.0);
    }

    #[test]
    fn color_from_hex_unpacks_channels() {
        assert_eq!(
            Color::from_hex(0x00eeff),
            Color::from_rgb_u8(0x00, 0xee, 0xff)
        );
    }

    #[test]
    fn color_lerp_blends_every_channel() {
        let black = Color::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(black.lerp(Color::WHITE, 0.5), Color::new(0.5, 0.5, 0.5, 0.5));
    }

    #[test]
    fn tick_checkpoints_are_ordered() {
        assert!(Checkpoint::SETUP.time() < Checkpoint::TRANSITION.time());
        assert!(Checkpoint::TRANSITION.time() < Checkpoint::FINALIZE.time());
    }
}
