#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turns Astarcraft simulation ticks into keyframed scene mutations.
//!
//! An [`AnimationController`] is built once against a [`GraphicSurface`] and a
//! [`SimulationView`]. It draws the static scene, then animates every tick
//! with [`AnimationController::update`] and every marker layer change with
//! [`AnimationController::update_map`]. The controller owns every sprite it
//! creates; the simulation is only ever read.

pub mod angle;
mod config;
mod history;
mod painter;
mod reveal;
mod scene;
mod tick;
mod visual;
pub mod wraparound;

use std::collections::{BTreeMap, BTreeSet};

use astarcraft_core::{CellCoord, GridSize, RobotId, SimulationView};
use astarcraft_rendering::{EntityId, GraphicSurface, SurfaceError};
use thiserror::Error;

pub use config::{ConfigError, ViewerConfig, ViewerLayout, ZLayers};
pub use history::PositionHistory;
pub use tick::TickReport;
pub use visual::RobotVisual;

use painter::Painter;
use reveal::RevealedArrow;

/// Long-lived owner of every sprite drawn for one simulation.
#[derive(Debug)]
pub struct AnimationController {
    painter: Painter,
    visuals: BTreeMap<RobotId, RobotVisual>,
    history: PositionHistory,
    initially_marked: BTreeSet<CellCoord>,
    revealed: BTreeMap<CellCoord, RevealedArrow>,
    score_label: EntityId,
    ticks_animated: u64,
}

impl AnimationController {
    /// Draws the static scene for `simulation` and starts tracking its robots.
    ///
    /// Nothing is committed; the scene settles with the surface's next commit.
    pub fn new<S, V>(
        config: &ViewerConfig,
        surface: &mut S,
        simulation: &V,
    ) -> Result<Self, AnimationError>
    where
        S: GraphicSurface,
        V: SimulationView,
    {
        let layout = config.layout(simulation.grid_size())?;
        let painter = Painter::new(config, layout);
        let scene = scene::build(config, &painter, surface, simulation);
        let history = PositionHistory::from_robots(&simulation.live_robots());

        Ok(Self {
            painter,
            visuals: scene.visuals,
            history,
            initially_marked: scene.initially_marked,
            revealed: BTreeMap::new(),
            score_label: scene.score_label,
            ticks_animated: 0,
        })
    }

    /// Dimensions of the animated grid.
    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        self.painter.layout().size()
    }

    /// Pixel metrics the scene was drawn with.
    #[must_use]
    pub fn layout(&self) -> &ViewerLayout {
        self.painter.layout()
    }

    /// Authoritative sprite and label pair of a live robot.
    #[must_use]
    pub fn visual(&self, robot: RobotId) -> Option<&RobotVisual> {
        self.visuals.get(&robot)
    }

    /// Authoritative sprite of a live robot.
    #[must_use]
    pub fn sprite_of(&self, robot: RobotId) -> Option<EntityId> {
        self.visual(robot).map(RobotVisual::sprite)
    }

    /// Id label bound to the authoritative sprite of a live robot.
    #[must_use]
    pub fn label_of(&self, robot: RobotId) -> Option<EntityId> {
        self.visual(robot).map(RobotVisual::label)
    }

    /// Robots that currently own a sprite, in identifier order.
    pub fn tracked_robots(&self) -> impl Iterator<Item = RobotId> + '_ {
        self.visuals.keys().copied()
    }

    /// Cells recorded for every robot live at the last animated tick.
    #[must_use]
    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    /// Arrow cells present when the scene was built.
    #[must_use]
    pub fn initially_marked(&self) -> &BTreeSet<CellCoord> {
        &self.initially_marked
    }

    /// Arrow sprites popped in by [`AnimationController::update_map`].
    pub fn revealed_arrows(&self) -> impl Iterator<Item = (CellCoord, EntityId)> + '_ {
        self.revealed
            .iter()
            .map(|(cell, arrow)| (*cell, arrow.sprite()))
    }

    /// Text primitive displaying the score value.
    #[must_use]
    pub const fn score_label(&self) -> EntityId {
        self.score_label
    }

    /// Number of ticks animated so far.
    #[must_use]
    pub const fn ticks_animated(&self) -> u64 {
        self.ticks_animated
    }
}

/// Errors raised while building or animating the scene.
#[derive(Debug, Error)]
pub enum AnimationError {
    /// The viewer configuration cannot lay out the grid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The surface rejected a keyframe commit.
    #[error("surface rejected commit: {0}")]
    Surface(#[from] SurfaceError),
    /// A tracked robot has no recorded previous cell.
    #[error("robot {} has no recorded position", robot.get())]
    MissingHistory {
        /// Robot lacking a history entry.
        robot: RobotId,
    },
    /// The simulation no longer knows a robot the controller tracks.
    #[error("simulation does not know robot {}", robot.get())]
    UnknownRobot {
        /// Robot the simulation failed to report.
        robot: RobotId,
    },
}
