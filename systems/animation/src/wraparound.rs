//! Classifies robot moves as adjacent steps or edge-crossing jumps.
//!
//! A robot leaving one edge of the toroidal grid reappears on the opposite
//! edge within a single tick. Instead of sliding the sprite across the whole
//! map, the jump is drawn as two sprites crossfading through cells just
//! outside the grid: one on the edge being left, one on the edge being
//! entered.

use astarcraft_core::{CellCoord, GridSize};

/// Largest grid distance still animated as a direct slide.
pub const STEP_THRESHOLD: u32 = 1;

/// Signed cell coordinate that may lie one step outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhantomCell {
    /// Column, `-1` or `columns` when off-grid horizontally.
    pub column: i32,
    /// Row, `-1` or `rows` when off-grid vertically.
    pub row: i32,
}

impl PhantomCell {
    /// Creates a new signed cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Lifts an in-grid cell into signed coordinates.
    #[must_use]
    pub fn from_cell(cell: CellCoord) -> Self {
        Self::new(signed(cell.column()), signed(cell.row()))
    }
}

/// Visual treatment of a robot's displacement over one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Adjacent step or no displacement; the sprite slides directly.
    Step,
    /// Edge crossing drawn through two off-grid cells.
    Wrap {
        /// Off-grid cell the outgoing sprite exits toward.
        departure: PhantomCell,
        /// Off-grid cell the incoming sprite enters from.
        arrival: PhantomCell,
    },
}

/// Classifies the move from `previous` to `current`.
#[must_use]
pub fn resolve(previous: CellCoord, current: CellCoord, size: GridSize) -> Motion {
    if previous.manhattan_distance(current) <= STEP_THRESHOLD {
        return Motion::Step;
    }

    Motion::Wrap {
        departure: phantom_beyond(previous, current, size),
        arrival: phantom_beyond(current, previous, size),
    }
}

/// Pushes every axis on which `edge` differs from `other` just past the edge
/// `edge` touches.
fn phantom_beyond(edge: CellCoord, other: CellCoord, size: GridSize) -> PhantomCell {
    let column = if edge.column() != other.column() {
        outside(edge.column(), size.columns())
    } else {
        signed(edge.column())
    };
    let row = if edge.row() != other.row() {
        outside(edge.row(), size.rows())
    } else {
        signed(edge.row())
    };
    PhantomCell::new(column, row)
}

fn outside(coordinate: u32, extent: u32) -> i32 {
    if coordinate == 0 {
        -1
    } else {
        signed(extent)
    }
}

/// Converts a grid coordinate into the signed space phantom cells live in.
pub(crate) fn signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exiting_the_right_edge_enters_from_the_left() {
        let motion = resolve(CellCoord::new(4, 2), CellCoord::new(0, 2), GridSize::new(5, 5));

        assert_eq!(
            motion,
            Motion::Wrap {
                departure: PhantomCell::new(5, 2),
                arrival: PhantomCell::new(-1, 2),
            }
        );
    }

    #[test]
    fn exiting_the_top_edge_enters_from_the_bottom() {
        let motion = resolve(CellCoord::new(3, 0), CellCoord::new(3, 9), GridSize::new(19, 10));

        assert_eq!(
            motion,
            Motion::Wrap {
                departure: PhantomCell::new(3, -1),
                arrival: PhantomCell::new(3, 10),
            }
        );
    }

    #[test]
    fn adjacent_steps_are_not_wraps() {
        let size = GridSize::new(5, 5);
        assert_eq!(
            resolve(CellCoord::new(2, 2), CellCoord::new(2, 3), size),
            Motion::Step
        );
        assert_eq!(
            resolve(CellCoord::new(2, 2), CellCoord::new(2, 2), size),
            Motion::Step
        );
    }

    #[test]
    fn narrow_grids_treat_wrapping_neighbours_as_steps() {
        let motion = resolve(CellCoord::new(1, 0), CellCoord::new(0, 0), GridSize::new(2, 1));
        assert_eq!(motion, Motion::Step);
    }
}
