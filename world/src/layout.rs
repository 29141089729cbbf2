//! ASCII map layouts used to seed the world.

use astarcraft_core::{CellCoord, Direction, GridSize, MarkerKind};
use thiserror::Error;

/// Layout of the classic demo map with a ring of platforms around a void lake.
pub const DEMO_LAYOUT: &str = "\
...................
.#####.......#####.
.#...#.......#...#.
.#...#.......#...#.
.#####...#...#####.
.........#.........
....###########....
...................
.##.............##.
...................";

/// Robots placed on [`DEMO_LAYOUT`] when no other robots are supplied.
pub const DEMO_ROBOTS: [(u32, u32, Direction); 4] = [
    (0, 0, Direction::Right),
    (18, 9, Direction::Left),
    (9, 7, Direction::Up),
    (3, 5, Direction::Down),
];

/// Starting placement of a robot declared alongside a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobotPlacement {
    /// Cell the robot starts on.
    pub cell: CellCoord,
    /// Direction the robot initially faces.
    pub direction: Direction,
}

/// Parsed marker layer together with the robots that start on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapLayout {
    size: GridSize,
    markers: Vec<MarkerKind>,
    robots: Vec<RobotPlacement>,
}

impl MapLayout {
    /// Parses a layout where each line is a row and each glyph a cell.
    ///
    /// `#` marks a void cell, `.` a platform and `U`, `R`, `D`, `L` an arrow.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(source: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let columns = first.chars().count();

        let mut markers = Vec::with_capacity(columns * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != columns {
                return Err(LayoutError::RaggedRow {
                    row: row_index,
                    expected: columns,
                    found: width,
                });
            }

            for (column_index, glyph) in row.chars().enumerate() {
                let marker = match glyph {
                    '#' => MarkerKind::Void,
                    '.' => MarkerKind::None,
                    other => Direction::from_glyph(other)
                        .map(MarkerKind::Arrow)
                        .map_err(|_| LayoutError::UnknownGlyph {
                            glyph: other,
                            column: column_index,
                            row: row_index,
                        })?,
                };
                markers.push(marker);
            }
        }

        let columns = u32::try_from(columns).map_err(|_| LayoutError::TooLarge)?;
        let rows = u32::try_from(rows.len()).map_err(|_| LayoutError::TooLarge)?;

        Ok(Self {
            size: GridSize::new(columns, rows),
            markers,
            robots: Vec::new(),
        })
    }

    /// Parses [`DEMO_LAYOUT`] and places [`DEMO_ROBOTS`] on it.
    pub fn demo() -> Result<Self, LayoutError> {
        DEMO_ROBOTS.iter().try_fold(
            Self::parse(DEMO_LAYOUT)?,
            |layout, &(column, row, direction)| {
                layout.with_robot(CellCoord::new(column, row), direction)
            },
        )
    }

    /// Adds a robot starting on the provided platform cell.
    pub fn with_robot(mut self, cell: CellCoord, direction: Direction) -> Result<Self, LayoutError> {
        match self.marker(cell) {
            None => Err(LayoutError::RobotOutOfBounds { cell }),
            Some(MarkerKind::Void) => Err(LayoutError::RobotOnVoid { cell }),
            Some(_) => {
                self.robots.push(RobotPlacement { cell, direction });
                Ok(self)
            }
        }
    }

    /// Dimensions of the layout.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Marker of the cell, or `None` when the cell lies outside the layout.
    #[must_use]
    pub fn marker(&self, cell: CellCoord) -> Option<MarkerKind> {
        self.index(cell)
            .and_then(|index| self.markers.get(index).copied())
    }

    /// Robots declared on the layout in declaration order.
    #[must_use]
    pub fn robots(&self) -> &[RobotPlacement] {
        &self.robots
    }

    pub(crate) fn into_parts(self) -> (GridSize, Vec<MarkerKind>, Vec<RobotPlacement>) {
        (self.size, self.markers, self.robots)
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
}

/// Errors that can occur while parsing or populating a layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout contained no rows.
    #[error("layout contains no rows")]
    Empty,
    /// A row did not match the width of the first row.
    #[error("row {row} has {found} cells but {expected} were expected")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A glyph did not name any marker.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Glyph that failed to parse.
        glyph: char,
        /// Zero-based column of the glyph.
        column: usize,
        /// Zero-based row of the glyph.
        row: usize,
    },
    /// The layout dimensions do not fit the coordinate type.
    #[error("layout dimensions exceed the supported range")]
    TooLarge,
    /// A robot was declared outside the grid.
    #[error("robot placed outside the grid at {cell:?}")]
    RobotOutOfBounds {
        /// Requested starting cell.
        cell: CellCoord,
    },
    /// A robot was declared on a void cell.
    #[error("robot placed on a void cell at {cell:?}")]
    RobotOnVoid {
        /// Requested starting cell.
        cell: CellCoord,
    },
}
