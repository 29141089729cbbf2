//! Maps compass directions onto sprite rotations.
//!
//! Rotations are expressed in radians and grow clockwise from the positive x
//! axis, matching screen coordinates where y points down.

use std::f32::consts::PI;

use astarcraft_core::Direction;

/// Rotation that orients a right-facing sprite toward `direction`.
#[must_use]
pub fn rotation(direction: Direction) -> f32 {
    match direction {
        Direction::Up => PI * 1.5,
        Direction::Right => 0.0,
        Direction::Down => PI * 0.5,
        Direction::Left => PI,
    }
}

/// Rotation for a raw engine direction code.
///
/// Returns `None` for codes that do not name a direction so callers decide
/// how to surface the inconsistency.
#[must_use]
pub fn rotation_for_code(code: i32) -> Option<f32> {
    Direction::from_code(code).ok().map(rotation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_degrees(direction: Direction, expected: f32) {
        let degrees = rotation(direction).to_degrees();
        assert!(
            (degrees - expected).abs() < 1e-3,
            "{direction:?} mapped to {degrees} degrees"
        );
    }

    #[test]
    fn directions_map_to_clockwise_angles() {
        assert_degrees(Direction::Up, 270.0);
        assert_degrees(Direction::Right, 0.0);
        assert_degrees(Direction::Down, 90.0);
        assert_degrees(Direction::Left, 180.0);
    }

    #[test]
    fn mapping_is_deterministic() {
        for direction in Direction::ALL {
            assert_eq!(rotation(direction), rotation(direction));
        }
    }

    #[test]
    fn raw_codes_outside_the_compass_are_reported() {
        assert_eq!(rotation_for_code(1), Some(0.0));
        assert_eq!(rotation_for_code(4), None);
        assert_eq!(rotation_for_code(-7), None);
    }
}
