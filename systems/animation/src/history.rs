use std::collections::BTreeMap;

use astarcraft_core::{CellCoord, RobotId, RobotSnapshot};

/// Last committed cell of every robot that was live at the previous tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionHistory {
    cells: BTreeMap<RobotId, CellCoord>,
}

impl PositionHistory {
    /// Captures the current cell of every provided robot.
    #[must_use]
    pub fn from_robots(robots: &[RobotSnapshot]) -> Self {
        let mut history = Self::default();
        history.refresh(robots);
        history
    }

    /// Replaces the history with the cells of the provided live robots.
    ///
    /// Robots missing from `robots` are forgotten.
    pub fn refresh(&mut self, robots: &[RobotSnapshot]) {
        self.cells = robots.iter().map(|robot| (robot.id, robot.cell)).collect();
    }

    /// Cell recorded for the robot, if it was live at the previous tick.
    #[must_use]
    pub fn get(&self, robot: RobotId) -> Option<CellCoord> {
        self.cells.get(&robot).copied()
    }

    /// Number of robots tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no robot is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates the tracked robots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (RobotId, CellCoord)> + '_ {
        self.cells.iter().map(|(robot, cell)| (*robot, *cell))
    }
}
