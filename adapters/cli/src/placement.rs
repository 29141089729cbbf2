use std::{error::Error, fmt, num::ParseIntError, str::FromStr};

use astarcraft_core::{CellCoord, Direction, DirectionCodeError};

/// Delimiter separating the column, row and direction of a placement.
const FIELD_DELIMITER: char = ',';

/// Cell and direction parsed from a `COLUMN,ROW,DIRECTION` argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    /// Cell the robot or arrow is placed on.
    pub(crate) cell: CellCoord,
    /// Direction the robot faces or the arrow points.
    pub(crate) direction: Direction,
}

impl FromStr for Placement {
    type Err = PlacementError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PlacementError::Empty);
        }

        let fields: Vec<&str> = trimmed.split(FIELD_DELIMITER).map(str::trim).collect();
        let [column, row, direction] = fields.as_slice() else {
            return Err(PlacementError::FieldCount(fields.len()));
        };

        let column = column.parse::<u32>().map_err(PlacementError::InvalidColumn)?;
        let row = row.parse::<u32>().map_err(PlacementError::InvalidRow)?;
        let direction = parse_direction(direction)?;

        Ok(Self {
            cell: CellCoord::new(column, row),
            direction,
        })
    }
}

/// Accepts a glyph (`R`), a name (`right`) or a clockwise code (`1`).
fn parse_direction(value: &str) -> Result<Direction, PlacementError> {
    match value.to_ascii_lowercase().as_str() {
        "up" => return Ok(Direction::Up),
        "right" => return Ok(Direction::Right),
        "down" => return Ok(Direction::Down),
        "left" => return Ok(Direction::Left),
        _ => {}
    }

    if let Ok(code) = value.parse::<i32>() {
        return Direction::from_code(code).map_err(PlacementError::InvalidDirection);
    }

    let mut glyphs = value.chars();
    match (glyphs.next(), glyphs.next()) {
        (Some(glyph), None) => Direction::from_glyph(glyph.to_ascii_uppercase())
            .map_err(PlacementError::InvalidDirection),
        _ => Err(PlacementError::UnknownDirection(value.to_owned())),
    }
}

/// Errors raised while parsing placement arguments.
#[derive(Debug)]
pub(crate) enum PlacementError {
    /// The argument was empty or contained only whitespace.
    Empty,
    /// The argument did not contain exactly three fields.
    FieldCount(usize),
    /// The column could not be parsed.
    InvalidColumn(ParseIntError),
    /// The row could not be parsed.
    InvalidRow(ParseIntError),
    /// The direction glyph or code was not recognised.
    InvalidDirection(DirectionCodeError),
    /// The direction was neither a glyph, a name nor a code.
    UnknownDirection(String),
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "placement was empty"),
            Self::FieldCount(found) => {
                write!(f, "expected COLUMN,ROW,DIRECTION but found {found} fields")
            }
            Self::InvalidColumn(error) => write!(f, "could not parse column: {error}"),
            Self::InvalidRow(error) => write!(f, "could not parse row: {error}"),
            Self::InvalidDirection(error) => write!(f, "could not parse direction: {error}"),
            Self::UnknownDirection(direction) => {
                write!(f, "direction '{direction}' is not supported")
            }
        }
    }
}

impl Error for PlacementError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidColumn(error) | Self::InvalidRow(error) => Some(error),
            Self::InvalidDirection(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_names_and_codes_are_accepted() {
        let expected = Placement {
            cell: CellCoord::new(4, 2),
            direction: Direction::Right,
        };

        for argument in ["4,2,R", "4,2,r", " 4 , 2 , right ", "4,2,1"] {
            let parsed: Placement = argument.parse().expect("placement parses");
            assert_eq!(parsed, expected, "argument {argument:?}");
        }
    }

    #[test]
    fn malformed_placements_are_rejected() {
        assert!(matches!("".parse::<Placement>(), Err(PlacementError::Empty)));
        assert!(matches!(
            "1,2".parse::<Placement>(),
            Err(PlacementError::FieldCount(2))
        ));
        assert!(matches!(
            "a,2,U".parse::<Placement>(),
            Err(PlacementError::InvalidColumn(_))
        ));
        assert!(matches!(
            "1,2,7".parse::<Placement>(),
            Err(PlacementError::InvalidDirection(_))
        ));
        assert!(matches!(
            "1,2,north".parse::<Placement>(),
            Err(PlacementError::UnknownDirection(_))
        ));
    }
}
