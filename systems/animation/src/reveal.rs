//! Pop-in animation for arrows placed after the scene was built.

use astarcraft_core::{CellCoord, Direction, SimulationView};
use astarcraft_rendering::{
    Checkpoint, Curve, EntityId, GraphicSurface, Property, SurfaceError,
};
use tracing::{debug, warn};

use crate::{angle, wraparound::signed, AnimationController, AnimationError};

const REVEAL_TIMELINE: [Checkpoint; 2] = [Checkpoint::SETUP, Checkpoint::FINALIZE];

/// Arrow sprite created by a reveal and the direction it currently shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RevealedArrow {
    sprite: EntityId,
    direction: Direction,
}

impl RevealedArrow {
    pub(crate) const fn sprite(&self) -> EntityId {
        self.sprite
    }
}

impl AnimationController {
    /// Animates arrows that appeared since the scene was built.
    ///
    /// Every new arrow is placed at zero scale, then springs to full size.
    /// Arrows drawn with the static scene, and arrows already revealed, never
    /// pop in again; a revealed arrow whose direction changed is turned
    /// instead. Robot facings are re-applied in the same span. Returns the
    /// cells that popped in. Nothing is remembered as revealed unless both
    /// commits succeed.
    pub fn update_map<S, V>(
        &mut self,
        surface: &mut S,
        simulation: &V,
    ) -> Result<Vec<CellCoord>, AnimationError>
    where
        S: GraphicSurface,
        V: SimulationView,
    {
        let facings = self
            .visuals
            .keys()
            .map(|&robot| {
                simulation
                    .robot(robot)
                    .map(|snapshot| (robot, angle::rotation(snapshot.direction)))
                    .ok_or(AnimationError::UnknownRobot { robot })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let [placement, growth] = REVEAL_TIMELINE;
        let layout = *self.painter.layout();
        let mut popped = Vec::new();
        let mut turned = Vec::new();

        for cell in layout.size().cells() {
            if self.initially_marked.contains(&cell) {
                continue;
            }

            let marker = simulation.marker(signed(cell.column()), signed(cell.row()));
            let Some(direction) = marker.arrow() else {
                continue;
            };

            match self.revealed.get(&cell) {
                Some(arrow) if arrow.direction == direction => {}
                Some(arrow) => turned.push((
                    cell,
                    RevealedArrow {
                        sprite: arrow.sprite,
                        direction,
                    },
                )),
                None => {
                    let sprite = self.painter.arrow(surface, cell, direction);
                    surface.set(sprite, Property::Scale(0.0));
                    popped.push((cell, RevealedArrow { sprite, direction }));
                }
            }
        }

        if let Err(error) = surface.commit(placement) {
            return Err(self.discard(surface, &popped, &turned, error));
        }

        for (_, arrow) in &popped {
            surface.set_with_curve(
                arrow.sprite,
                Property::Scale(layout.arrow_scale()),
                Curve::Elastic,
            );
        }
        for (_, arrow) in &turned {
            surface.set(arrow.sprite, Property::Rotation(angle::rotation(arrow.direction)));
        }
        for (robot, rotation) in facings {
            if let Some(visual) = self.visuals.get_mut(&robot) {
                visual.rotate(surface, rotation);
            }
        }

        if let Err(error) = surface.commit(growth) {
            return Err(self.discard(surface, &popped, &turned, error));
        }

        self.revealed.extend(popped.iter().chain(&turned).copied());
        debug!(
            revealed = popped.len(),
            turned = turned.len(),
            "map change animated"
        );
        Ok(popped.into_iter().map(|(cell, _)| cell).collect())
    }

    /// Shrinks arrows a rejected reveal created and turns redirected ones back.
    fn discard<S: GraphicSurface>(
        &self,
        surface: &mut S,
        popped: &[(CellCoord, RevealedArrow)],
        turned: &[(CellCoord, RevealedArrow)],
        error: SurfaceError,
    ) -> AnimationError {
        warn!(%error, "map change commit rejected; arrows left unrevealed");

        for (_, arrow) in popped {
            surface.set(arrow.sprite, Property::Scale(0.0));
        }
        for (cell, _) in turned {
            if let Some(previous) = self.revealed.get(cell) {
                surface.set(
                    previous.sprite,
                    Property::Rotation(angle::rotation(previous.direction)),
                );
            }
        }

        error.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_places_then_grows() {
        let [placement, growth] = REVEAL_TIMELINE;
        assert_eq!(placement.time(), 0.0);
        assert_eq!(growth.time(), 1.0);
    }
}
