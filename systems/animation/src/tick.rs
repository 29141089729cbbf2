//! Per-tick robot animation.
//!
//! Every tick is drawn as three ordered keyframes. The surface interpolates
//! between consecutive commits, so the phases below must be emitted in this
//! exact order and never merged:
//!
//! * setup: incoming sprites are created hidden and the score is updated,
//! * transition: sprites slide or crossfade to their new cells,
//! * finalize: deaths play out and facings are re-applied.

use std::collections::BTreeMap;

use astarcraft_core::{DeathCause, RobotId, RobotSnapshot, SimulationView};
use astarcraft_rendering::{Checkpoint, Color, GraphicSurface, Property};
use tracing::{debug, trace, warn};

use crate::{
    angle,
    visual::RobotVisual,
    wraparound::{self, Motion, PhantomCell},
    AnimationController, AnimationError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Setup,
    Transition,
    Finalize,
}

const TICK_TIMELINE: [(Phase, Checkpoint); 3] = [
    (Phase::Setup, Checkpoint::SETUP),
    (Phase::Transition, Checkpoint::TRANSITION),
    (Phase::Finalize, Checkpoint::FINALIZE),
];

/// Summary of what one animated tick showed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Ordinal of the animated tick, starting at 1.
    pub tick: u64,
    /// Motion drawn for every robot tracked before the tick.
    pub moves: Vec<(RobotId, Motion)>,
    /// Robots that left the live set during the tick.
    pub deaths: Vec<(RobotId, DeathCause)>,
    /// Live robots seen for the first time.
    pub spawned: Vec<RobotId>,
    /// Score displayed after the tick.
    pub score: u64,
}

/// One robot's journey through the tick.
#[derive(Debug)]
struct Transit {
    snapshot: RobotSnapshot,
    motion: Motion,
    /// Pair that ends the tick as the robot's sprite.
    current: RobotVisual,
    /// Pair that exits through a portal during a wrap.
    retired: Option<RobotVisual>,
    spawned: bool,
}

impl AnimationController {
    /// Animates one simulation tick.
    ///
    /// Must be called exactly once after every engine tick, before the next.
    /// When the surface rejects a commit, the controller keeps the sprites and
    /// history it had before the call, so the tick can be animated again.
    pub fn update<S, V>(
        &mut self,
        surface: &mut S,
        simulation: &V,
    ) -> Result<TickReport, AnimationError>
    where
        S: GraphicSurface,
        V: SimulationView,
    {
        let resolved = self.resolve_tracked(simulation)?;
        let mut transits = Vec::new();
        let mut report = TickReport {
            tick: self.ticks_animated.saturating_add(1),
            score: simulation.score(),
            ..TickReport::default()
        };

        for (phase, checkpoint) in TICK_TIMELINE {
            match phase {
                Phase::Setup => {
                    transits = self.setup(surface, simulation, &resolved);
                    surface.set(
                        self.score_label,
                        Property::Text(report.score.to_string()),
                    );
                }
                Phase::Transition => self.transition(surface, &mut transits),
                Phase::Finalize => self.finalize(surface, &mut transits),
            }

            if let Err(error) = surface.commit(checkpoint) {
                warn!(
                    tick = report.tick,
                    %error,
                    "tick commit rejected; keeping previous sprites"
                );
                self.abandon(surface, &transits);
                return Err(error.into());
            }
        }

        self.visuals = settle(transits, &mut report);
        self.history.refresh(&simulation.live_robots());
        self.ticks_animated = report.tick;
        debug!(
            tick = report.tick,
            score = report.score,
            moved = report.moves.len(),
            died = report.deaths.len(),
            spawned = report.spawned.len(),
            "tick animated"
        );
        Ok(report)
    }

    /// Looks up every tracked robot before any sprite is touched.
    fn resolve_tracked<V: SimulationView>(
        &self,
        simulation: &V,
    ) -> Result<Vec<(RobotSnapshot, Motion)>, AnimationError> {
        let size = self.painter.layout().size();

        self.visuals
            .keys()
            .map(|&robot| {
                let previous = self
                    .history
                    .get(robot)
                    .ok_or(AnimationError::MissingHistory { robot })?;
                let snapshot = simulation
                    .robot(robot)
                    .ok_or(AnimationError::UnknownRobot { robot })?;
                Ok((snapshot, wraparound::resolve(previous, snapshot.cell, size)))
            })
            .collect()
    }

    fn setup<S, V>(
        &self,
        surface: &mut S,
        simulation: &V,
        resolved: &[(RobotSnapshot, Motion)],
    ) -> Vec<Transit>
    where
        S: GraphicSurface,
        V: SimulationView,
    {
        let mut transits = Vec::with_capacity(resolved.len());

        for &(snapshot, motion) in resolved {
            let Some(&visual) = self.visuals.get(&snapshot.id) else {
                continue;
            };

            let transit = match motion {
                Motion::Step => Transit {
                    snapshot,
                    motion,
                    current: visual,
                    retired: None,
                    spawned: false,
                },
                Motion::Wrap { arrival, .. } => {
                    let incoming = self.painter.robot(
                        surface,
                        snapshot.id,
                        arrival,
                        visual.rotation(),
                        visual.tint(),
                    );
                    incoming.set_alpha(surface, 0.0);
                    Transit {
                        snapshot,
                        motion,
                        current: incoming,
                        retired: Some(visual),
                        spawned: false,
                    }
                }
            };
            transits.push(transit);
        }

        for snapshot in simulation.live_robots() {
            if resolved.iter().any(|(tracked, _)| tracked.id == snapshot.id) {
                continue;
            }

            warn!(
                robot = snapshot.id.get(),
                column = snapshot.cell.column(),
                row = snapshot.cell.row(),
                "untracked live robot; drawing it in place"
            );
            let visual = self.painter.robot(
                surface,
                snapshot.id,
                PhantomCell::from_cell(snapshot.cell),
                angle::rotation(snapshot.direction),
                Color::WHITE,
            );
            visual.set_alpha(surface, 0.0);
            transits.push(Transit {
                snapshot,
                motion: Motion::Step,
                current: visual,
                retired: None,
                spawned: true,
            });
        }

        transits
    }

    fn transition<S: GraphicSurface>(&self, surface: &mut S, transits: &mut [Transit]) {
        for transit in transits.iter_mut() {
            let destination = self
                .painter
                .cell_center(PhantomCell::from_cell(transit.snapshot.cell));

            match (transit.motion, transit.retired.as_mut()) {
                (Motion::Wrap { departure, arrival }, Some(retired)) => {
                    trace!(
                        robot = transit.snapshot.id.get(),
                        departure = ?departure,
                        arrival = ?arrival,
                        "robot wraps around the grid"
                    );
                    retired.set_alpha(surface, 0.0);
                    retired.move_to(surface, self.painter.cell_center(departure));
                    transit.current.set_alpha(surface, 1.0);
                    transit.current.move_to(surface, destination);
                }
                _ => {
                    if transit.spawned {
                        transit.current.set_alpha(surface, 1.0);
                    }
                    transit.current.move_to(surface, destination);
                    if transit.snapshot.is_live() {
                        transit
                            .current
                            .rotate(surface, angle::rotation(transit.snapshot.direction));
                    }
                }
            }
        }
    }

    fn finalize<S: GraphicSurface>(&self, surface: &mut S, transits: &mut [Transit]) {
        for transit in transits.iter_mut() {
            trace!(
                robot = transit.snapshot.id.get(),
                motion = ?transit.motion,
                death = ?transit.snapshot.death,
                "robot tick resolved"
            );
            match transit.snapshot.death {
                Some(DeathCause::Void) => transit.current.collapse(surface),
                Some(DeathCause::Other) => transit.current.set_alpha(surface, 0.0),
                None => transit
                    .current
                    .rotate(surface, angle::rotation(transit.snapshot.direction)),
            }
        }
    }

    /// Hides the sprites a rejected tick created and redraws the tracked ones
    /// as they stood before it.
    fn abandon<S: GraphicSurface>(&self, surface: &mut S, transits: &[Transit]) {
        let sprite_scale = self.painter.layout().robot_scale();

        for transit in transits {
            if transit.spawned || transit.retired.is_some() {
                transit.current.set_alpha(surface, 0.0);
            }
            if let Some(visual) = self.visuals.get(&transit.snapshot.id) {
                visual.redraw(surface, sprite_scale);
            }
        }
    }
}

/// Reports the committed tick and keeps the pairs of robots still alive.
fn settle(transits: Vec<Transit>, report: &mut TickReport) -> BTreeMap<RobotId, RobotVisual> {
    let mut visuals = BTreeMap::new();

    for transit in transits {
        let robot = transit.snapshot.id;
        if transit.spawned {
            report.spawned.push(robot);
        } else {
            report.moves.push((robot, transit.motion));
        }

        match transit.snapshot.death {
            Some(cause) => report.deaths.push((robot, cause)),
            None => {
                let _ = visuals.insert(robot, transit.current);
            }
        }
    }

    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_is_strictly_ordered() {
        let times: Vec<f32> = TICK_TIMELINE
            .iter()
            .map(|(_, checkpoint)| checkpoint.time())
            .collect();

        assert_eq!(times, vec![0.0, 0.75, 1.0]);
        assert_eq!(
            TICK_TIMELINE.map(|(phase, _)| phase),
            [Phase::Setup, Phase::Transition, Phase::Finalize]
        );
    }
}
