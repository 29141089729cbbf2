use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use astarcraft_core::{CellCoord, Command, Direction, Event, RobotSnapshot};
use astarcraft_world::{self as world, query, MapLayout, World};

#[test]
fn deterministic_replay_produces_identical_snapshots() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn score_never_decreases_and_ticks_are_numbered() {
    let outcome = replay(scripted_commands());

    let completed: Vec<(u64, u64)> = outcome
        .events
        .iter()
        .filter_map(|event| match event {
            Event::TickCompleted { tick, score } => Some((*tick, *score)),
            _ => None,
        })
        .collect();

    assert_eq!(completed.len(), 20);
    for (index, window) in completed.windows(2).enumerate() {
        assert_eq!(window[0].0 + 1, window[1].0, "tick {index} skipped");
        assert!(window[0].1 <= window[1].1, "score decreased after tick {index}");
    }
    assert_eq!(completed.last().map(|(_, score)| *score), Some(outcome.score));
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new(MapLayout::demo().expect("demo layout"));
    let mut events = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    ReplayOutcome {
        robots: query::all_robots(&world),
        score: query::score(&world),
        events,
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::PlaceArrow {
            cell: CellCoord::new(4, 0),
            direction: Direction::Down,
        },
        Command::PlaceArrow {
            cell: CellCoord::new(1, 1),
            direction: Direction::Up,
        },
    ];
    commands.extend(std::iter::repeat(Command::Tick).take(20));
    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    robots: Vec<RobotSnapshot>,
    score: u64,
    events: Vec<Event>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
