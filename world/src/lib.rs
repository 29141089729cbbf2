#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Astarcraft simulation.
//!
//! The world is a toroidal grid of platforms, holes and arrows travelled by
//! robots. It is mutated exclusively through [`apply`] and exposes its state
//! read-only through [`query`] and the [`SimulationView`] implementation.

pub mod layout;

use std::collections::HashSet;

use astarcraft_core::{
    CellCoord, Command, DeathCause, Direction, Event, GridSize, MarkerKind, RobotId,
    RobotSnapshot, SimulationView,
};
use tracing::debug;

pub use layout::{LayoutError, MapLayout, RobotPlacement};

/// Represents the authoritative Astarcraft world state.
#[derive(Debug)]
pub struct World {
    size: GridSize,
    markers: Vec<MarkerKind>,
    robots: Vec<Robot>,
    score: u64,
    tick_index: u64,
}

impl World {
    /// Creates a world from the provided layout.
    ///
    /// Robots receive identifiers in declaration order starting at zero.
    #[must_use]
    pub fn new(layout: MapLayout) -> Self {
        let (size, markers, placements) = layout.into_parts();
        let robots = placements
            .into_iter()
            .enumerate()
            .map(|(index, placement)| {
                Robot::spawn(
                    RobotId::new(u32::try_from(index).unwrap_or(u32::MAX)),
                    placement,
                )
            })
            .collect();

        Self {
            size,
            markers,
            robots,
            score: 0,
            tick_index: 0,
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.size.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.size.columns()).ok()?;
        Some(row * width + column)
    }

    fn marker_at(&self, cell: CellCoord) -> MarkerKind {
        self.index(cell)
            .and_then(|index| self.markers.get(index).copied())
            .unwrap_or(MarkerKind::Void)
    }

    fn place_arrow(&mut self, cell: CellCoord, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(index) = self.index(cell) else {
            out_events.push(Event::ArrowRejected { cell });
            return;
        };

        match self.markers.get(index).copied() {
            Some(MarkerKind::None) | Some(MarkerKind::Arrow(_)) => {
                self.markers[index] = MarkerKind::Arrow(direction);
                out_events.push(Event::ArrowPlaced { cell, direction });
            }
            Some(MarkerKind::Void) | None => out_events.push(Event::ArrowRejected { cell }),
        }
    }

    fn advance_robots(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);

        for index in 0..self.robots.len() {
            if !self.robots[index].is_live() {
                continue;
            }

            let from = self.robots[index].cell;
            if let Some(direction) = self.marker_at(from).arrow() {
                self.robots[index].direction = direction;
            }

            let robot = &mut self.robots[index];
            if !robot.visited.insert((robot.cell, robot.direction)) {
                robot.death = Some(DeathCause::Other);
                out_events.push(Event::RobotDied {
                    robot: robot.id,
                    cell: from,
                    cause: DeathCause::Other,
                });
                continue;
            }

            let (delta_column, delta_row) = robot.direction.offset();
            let Some(to) = self.size.wrap(
                signed(from.column()).saturating_add(delta_column),
                signed(from.row()).saturating_add(delta_row),
            ) else {
                continue;
            };

            let landed_on = self.marker_at(to);
            let robot = &mut self.robots[index];
            robot.cell = to;
            out_events.push(Event::RobotMoved {
                robot: robot.id,
                from,
                to,
            });

            if landed_on.is_void() {
                robot.death = Some(DeathCause::Void);
                out_events.push(Event::RobotDied {
                    robot: robot.id,
                    cell: to,
                    cause: DeathCause::Void,
                });
            } else {
                self.score = self.score.saturating_add(1);
            }
        }

        debug!(
            tick = self.tick_index,
            score = self.score,
            live = self.robots.iter().filter(|robot| robot.is_live()).count(),
            "world tick resolved"
        );
        out_events.push(Event::TickCompleted {
            tick: self.tick_index,
            score: self.score,
        });
    }
}

impl SimulationView for World {
    fn grid_size(&self) -> GridSize {
        self.size
    }

    fn marker(&self, column: i32, row: i32) -> MarkerKind {
        self.size
            .wrap(column, row)
            .map_or(MarkerKind::Void, |cell| self.marker_at(cell))
    }

    fn live_robots(&self) -> Vec<RobotSnapshot> {
        self.robots
            .iter()
            .filter(|robot| robot.is_live())
            .map(Robot::snapshot)
            .collect()
    }

    fn robot(&self, id: RobotId) -> Option<RobotSnapshot> {
        self.robots
            .iter()
            .find(|robot| robot.id == id)
            .map(Robot::snapshot)
    }

    fn score(&self) -> u64 {
        self.score
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceArrow { cell, direction } => world.place_arrow(cell, direction, out_events),
        Command::Tick => world.advance_robots(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use astarcraft_core::{RobotSnapshot, SimulationView};

    use super::World;

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether at least one robot is still live.
    #[must_use]
    pub fn has_live_robots(world: &World) -> bool {
        world.robots.iter().any(|robot| robot.is_live())
    }

    /// Captures every robot the world ever created, ordered by identifier.
    #[must_use]
    pub fn all_robots(world: &World) -> Vec<RobotSnapshot> {
        let mut robots: Vec<_> = world.robots.iter().map(super::Robot::snapshot).collect();
        robots.sort_by_key(|robot| robot.id);
        robots
    }

    /// Current score, mirroring [`SimulationView::score`].
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score()
    }
}

#[derive(Clone, Debug)]
struct Robot {
    id: RobotId,
    cell: CellCoord,
    direction: Direction,
    death: Option<DeathCause>,
    visited: HashSet<(CellCoord, Direction)>,
}

impl Robot {
    fn spawn(id: RobotId, placement: RobotPlacement) -> Self {
        Self {
            id,
            cell: placement.cell,
            direction: placement.direction,
            death: None,
            visited: HashSet::new(),
        }
    }

    fn is_live(&self) -> bool {
        self.death.is_none()
    }

    fn snapshot(&self) -> RobotSnapshot {
        RobotSnapshot {
            id: self.id,
            cell: self.cell,
            direction: self.direction,
            death: self.death,
        }
    }
}

fn signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_from(rows: &str, robots: &[(u32, u32, Direction)]) -> World {
        let layout = robots.iter().fold(
            MapLayout::parse(rows).expect("valid layout"),
            |layout, &(column, row, direction)| {
                layout
                    .with_robot(CellCoord::new(column, row), direction)
                    .expect("valid robot")
            },
        );
        World::new(layout)
    }

    #[test]
    fn tick_moves_robots_forward_and_scores() {
        let mut world = world_from(".....", &[(1, 0, Direction::Right)]);
        let mut events = Vec::new();

        apply(&mut world, Command::Tick, &mut events);

        let robot = world.robot(RobotId::new(0)).expect("robot exists");
        assert_eq!(robot.cell, CellCoord::new(2, 0));
        assert_eq!(world.score(), 1);
        assert_eq!(
            events,
            vec![
                Event::RobotMoved {
                    robot: RobotId::new(0),
                    from: CellCoord::new(1, 0),
                    to: CellCoord::new(2, 0),
                },
                Event::TickCompleted { tick: 1, score: 1 },
            ]
        );
    }

    #[test]
    fn robots_wrap_around_grid_edges() {
        let mut world = world_from(".....", &[(4, 0, Direction::Right)]);
        let mut events = Vec::new();

        apply(&mut world, Command::Tick, &mut events);

        let robot = world.robot(RobotId::new(0)).expect("robot exists");
        assert_eq!(robot.cell, CellCoord::new(0, 0));
        assert!(robot.is_live());
    }

    #[test]
    fn arrows_turn_robots_before_stepping() {
        let mut world = world_from("..D\n...", &[(2, 0, Direction::Right)]);
        let mut events = Vec::new();

        apply(&mut world, Command::Tick, &mut events);

        let robot = world.robot(RobotId::new(0)).expect("robot exists");
        assert_eq!(robot.direction, Direction::Down);
        assert_eq!(robot.cell, CellCoord::new(2, 1));
    }

    #[test]
    fn stepping_into_void_kills_with_void_cause() {
        let mut world = world_from("..#", &[(1, 0, Direction::Right)]);
        let mut events = Vec::new();

        apply(&mut world, Command::Tick, &mut events);

        let robot = world.robot(RobotId::new(0)).expect("dead robots stay queryable");
        assert_eq!(robot.death, Some(DeathCause::Void));
        assert_eq!(robot.cell, CellCoord::new(2, 0));
        assert!(world.live_robots().is_empty());
        assert_eq!(world.score(), 0);
    }

    #[test]
    fn revisiting_a_state_kills_with_other_cause() {
        let mut world = world_from("..", &[(0, 0, Direction::Right)]);
        let mut events = Vec::new();

        apply(&mut world, Command::Tick, &mut events);
        apply(&mut world, Command::Tick, &mut events);
        events.clear();
        apply(&mut world, Command::Tick, &mut events);

        let robot = world.robot(RobotId::new(0)).expect("robot exists");
        assert_eq!(robot.death, Some(DeathCause::Other));
        assert_eq!(robot.cell, CellCoord::new(0, 0));
        assert_eq!(
            events[0],
            Event::RobotDied {
                robot: RobotId::new(0),
                cell: CellCoord::new(0, 0),
                cause: DeathCause::Other,
            }
        );
        assert!(!query::has_live_robots(&world));
    }

    #[test]
    fn arrows_only_land_on_platforms() {
        let mut world = world_from("#.", &[]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceArrow {
                cell: CellCoord::new(0, 0),
                direction: Direction::Up,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlaceArrow {
                cell: CellCoord::new(1, 0),
                direction: Direction::Up,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::ArrowRejected {
                    cell: CellCoord::new(0, 0)
                },
                Event::ArrowPlaced {
                    cell: CellCoord::new(1, 0),
                    direction: Direction::Up,
                },
            ]
        );
        assert_eq!(world.marker(1, 0), MarkerKind::Arrow(Direction::Up));
    }

    #[test]
    fn marker_queries_wrap_one_step_outside_the_grid() {
        let world = world_from("#.R", &[]);

        assert_eq!(world.marker(-1, 0), MarkerKind::Arrow(Direction::Right));
        assert_eq!(world.marker(3, 0), MarkerKind::Void);
        assert_eq!(world.marker(1, -1), MarkerKind::None);
    }
}
