#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Astarcraft viewer.
//!
//! This crate defines the vocabulary that connects the simulation engine with
//! the animation system. The engine owns grid cells, robots and the score and
//! exposes them read-only through [`SimulationView`]. Orchestrators mutate the
//! engine by submitting [`Command`] values and observe the outcome through
//! [`Event`] values; the animation system only ever reads the view.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of columns in the classic Astarcraft map.
pub const DEFAULT_COLUMNS: u32 = 19;

/// Number of rows in the classic Astarcraft map.
pub const DEFAULT_ROWS: u32 = 10;

/// Compass directions a robot may face or an arrow tile may point to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing column indices.
    Right,
    /// Toward increasing row indices.
    Down,
    /// Toward decreasing column indices.
    Left,
}

impl Direction {
    /// Every direction in clockwise order starting from [`Direction::Up`].
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Decodes the numeric direction code used by engine inputs.
    ///
    /// Codes follow the clockwise order of [`Direction::ALL`].
    pub fn from_code(code: i32) -> Result<Self, DirectionCodeError> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(DirectionCodeError::UnknownCode(code))
    }

    /// Decodes the single letter glyph (`U`, `R`, `D`, `L`) used by map layouts.
    pub fn from_glyph(glyph: char) -> Result<Self, DirectionCodeError> {
        match glyph.to_ascii_uppercase() {
            'U' => Ok(Self::Up),
            'R' => Ok(Self::Right),
            'D' => Ok(Self::Down),
            'L' => Ok(Self::Left),
            _ => Err(DirectionCodeError::UnknownGlyph(glyph)),
        }
    }

    /// Numeric code of the direction.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Layout glyph of the direction.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Right => 'R',
            Self::Down => 'D',
            Self::Left => 'L',
        }
    }

    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Errors raised when decoding untrusted direction representations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DirectionCodeError {
    /// The numeric code does not name one of the four directions.
    #[error("unknown direction code {0}")]
    UnknownCode(i32),
    /// The glyph does not name one of the four directions.
    #[error("unknown direction glyph {0:?}")]
    UnknownGlyph(char),
}

/// Marker layer content of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Hole in the map; robots entering it fall through.
    Void,
    /// Plain platform without an arrow.
    None,
    /// Platform carrying an arrow that turns robots toward the direction.
    Arrow(Direction),
}

impl MarkerKind {
    /// Reports whether the cell is a hole.
    #[must_use]
    pub const fn is_void(self) -> bool {
        matches!(self, Self::Void)
    }

    /// Direction of the arrow carried by the cell, if any.
    #[must_use]
    pub const fn arrow(self) -> Option<Direction> {
        match self {
            Self::Arrow(direction) => Some(direction),
            Self::Void | Self::None => None,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Fixed dimensions of the simulation grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the coordinate lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Folds signed coordinates back onto the torus.
    ///
    /// Returns `None` when the grid has no cells.
    #[must_use]
    pub fn wrap(&self, column: i32, row: i32) -> Option<CellCoord> {
        if self.columns == 0 || self.rows == 0 {
            return None;
        }

        let columns = i64::from(self.columns);
        let rows = i64::from(self.rows);
        let column = i64::from(column).rem_euclid(columns);
        let row = i64::from(row).rem_euclid(rows);
        Some(CellCoord::new(
            u32::try_from(column).ok()?,
            u32::try_from(row).ok()?,
        ))
    }

    /// Iterates every cell of the grid column by column.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let rows = self.rows;
        (0..self.columns)
            .flat_map(move |column| (0..rows).map(move |row| CellCoord::new(column, row)))
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

/// Unique identifier assigned to a robot by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotId(u32);

impl RobotId {
    /// Creates a new robot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reason a robot left the live set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// The robot stepped onto a void cell.
    Void,
    /// Any other reason, such as being caught in a loop.
    Other,
}

/// Immutable representation of a robot used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RobotSnapshot {
    /// Identifier assigned to the robot.
    pub id: RobotId,
    /// Cell the robot currently occupies, or occupied when it died.
    pub cell: CellCoord,
    /// Direction the robot is facing.
    pub direction: Direction,
    /// Cause of death once the robot is no longer live.
    pub death: Option<DeathCause>,
}

impl RobotSnapshot {
    /// Reports whether the robot is still part of the live set.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.death.is_none()
    }
}

/// Read-only surface the animation system consumes from the simulation engine.
pub trait SimulationView {
    /// Fixed dimensions of the grid.
    fn grid_size(&self) -> GridSize;

    /// Marker content of the cell at the signed coordinate.
    ///
    /// Implementations must answer coordinates one step outside the grid.
    fn marker(&self, column: i32, row: i32) -> MarkerKind;

    /// Robots currently in the live set, ordered by identifier.
    fn live_robots(&self) -> Vec<RobotSnapshot>;

    /// Looks up any robot the engine ever created, live or dead.
    fn robot(&self, id: RobotId) -> Option<RobotSnapshot>;

    /// Current score of the simulation.
    fn score(&self) -> u64;
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Places an arrow on a platform cell.
    PlaceArrow {
        /// Cell that receives the arrow.
        cell: CellCoord,
        /// Direction the arrow points to.
        direction: Direction,
    },
    /// Advances every live robot by one step.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that an arrow was written to the marker layer.
    ArrowPlaced {
        /// Cell that received the arrow.
        cell: CellCoord,
        /// Direction of the arrow.
        direction: Direction,
    },
    /// Reports that an arrow placement was refused.
    ArrowRejected {
        /// Cell targeted by the placement.
        cell: CellCoord,
    },
    /// Confirms that a robot moved between two cells.
    RobotMoved {
        /// Identifier of the robot that moved.
        robot: RobotId,
        /// Cell the robot occupied before moving.
        from: CellCoord,
        /// Cell the robot occupies after moving.
        to: CellCoord,
    },
    /// Reports that a robot left the live set.
    RobotDied {
        /// Identifier of the robot.
        robot: RobotId,
        /// Cell where the robot died.
        cell: CellCoord,
        /// Reason of the death.
        cause: DeathCause,
    },
    /// Announces that all robots were processed for the tick.
    TickCompleted {
        /// One-based index of the completed tick.
        tick: u64,
        /// Score after the tick.
        score: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, DirectionCodeError, GridSize, MarkerKind, RobotId};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn direction_codes_follow_clockwise_order() {
        for (index, direction) in Direction::ALL.into_iter().enumerate() {
            let code = i32::try_from(index).expect("index fits");
            assert_eq!(direction.code(), code);
            assert_eq!(Direction::from_code(code), Ok(direction));
            assert_eq!(Direction::from_glyph(direction.glyph()), Ok(direction));
        }
    }

    #[test]
    fn unknown_direction_codes_are_rejected() {
        assert_eq!(
            Direction::from_code(4),
            Err(DirectionCodeError::UnknownCode(4))
        );
        assert_eq!(
            Direction::from_code(-1),
            Err(DirectionCodeError::UnknownCode(-1))
        );
        assert_eq!(
            Direction::from_glyph('x'),
            Err(DirectionCodeError::UnknownGlyph('x'))
        );
    }

    #[test]
    fn grid_wrap_folds_coordinates_one_step_outside() {
        let size = GridSize::new(5, 4);
        assert_eq!(size.wrap(-1, 2), Some(CellCoord::new(4, 2)));
        assert_eq!(size.wrap(5, 2), Some(CellCoord::new(0, 2)));
        assert_eq!(size.wrap(3, -1), Some(CellCoord::new(3, 3)));
        assert_eq!(size.wrap(3, 4), Some(CellCoord::new(3, 0)));
        assert_eq!(GridSize::new(0, 4).wrap(0, 0), None);
    }

    #[test]
    fn grid_cells_visit_every_coordinate_once() {
        let size = GridSize::new(3, 2);
        let cells: Vec<_> = size.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], CellCoord::new(0, 0));
        assert_eq!(cells[1], CellCoord::new(0, 1));
        assert_eq!(cells[5], CellCoord::new(2, 1));
    }

    #[test]
    fn marker_arrow_accessor_ignores_plain_cells() {
        assert_eq!(MarkerKind::Arrow(Direction::Left).arrow(), Some(Direction::Left));
        assert_eq!(MarkerKind::None.arrow(), None);
        assert!(MarkerKind::Void.is_void());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn shared_contracts_round_trip_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
        assert_round_trip(&MarkerKind::Arrow(Direction::Down));
        assert_round_trip(&RobotId::new(42));
    }
}
