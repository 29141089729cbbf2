use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{Checkpoint, Color, Curve, EntityId, GraphicSurface, Primitive, Property, SurfaceError};

/// Resolved values of every property of a primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Screen position in pixels.
    pub position: Vec2,
    /// Clockwise rotation in radians.
    pub rotation: f32,
    /// Uniform scale factor.
    pub scale: f32,
    /// Opacity in the range 0.0..=1.0.
    pub alpha: f32,
    /// Multiplicative tint.
    pub tint: Color,
    /// Stacking order.
    pub z_index: i32,
    /// Normalised anchor.
    pub anchor: f32,
    /// Text content for text primitives.
    pub text: Option<String>,
    /// Fill color for text primitives.
    pub fill_color: Color,
}

impl EntityState {
    fn for_primitive(primitive: &Primitive) -> Self {
        let text = match primitive {
            Primitive::Text(content) => Some(content.clone()),
            Primitive::Sprite(_) | Primitive::Line { .. } => None,
        };

        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            alpha: 1.0,
            tint: Color::WHITE,
            z_index: 0,
            anchor: 0.0,
            text,
            fill_color: Color::WHITE,
        }
    }

    fn apply(&mut self, property: &Property) {
        match property {
            Property::Position(position) => self.position = *position,
            Property::Rotation(rotation) => self.rotation = *rotation,
            Property::Scale(scale) => self.scale = *scale,
            Property::Alpha(alpha) => self.alpha = *alpha,
            Property::Tint(tint) => self.tint = *tint,
            Property::ZIndex(z_index) => self.z_index = *z_index,
            Property::Anchor(anchor) => self.anchor = *anchor,
            Property::Text(text) => self.text = Some(text.clone()),
            Property::FillColor(color) => self.fill_color = *color,
        }
    }

    /// Moves `self` toward the property value, starting from `start`.
    ///
    /// Discrete properties only switch once the span completes.
    fn blend(&mut self, start: &EntityState, property: &Property, eased: f32, complete: bool) {
        match property {
            Property::Position(target) => self.position = start.position.lerp(*target, eased),
            Property::Rotation(target) => self.rotation = lerp(start.rotation, *target, eased),
            Property::Scale(target) => self.scale = lerp(start.scale, *target, eased),
            Property::Alpha(target) => self.alpha = lerp(start.alpha, *target, eased),
            Property::Tint(target) => self.tint = start.tint.lerp(*target, eased),
            Property::FillColor(target) => self.fill_color = start.fill_color.lerp(*target, eased),
            Property::ZIndex(_) | Property::Anchor(_) | Property::Text(_) => {
                if complete {
                    self.apply(property);
                }
            }
        }
    }
}

fn lerp(from: f32, to: f32, amount: f32) -> f32 {
    from + (to - from) * amount
}

/// Property change captured between two commits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    /// Entity the change applies to.
    pub entity: EntityId,
    /// New property value.
    pub property: Property,
    /// Curve used to interpolate toward the value.
    pub curve: Curve,
}

/// Keyframe commit and the changes it resolves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// Normalised time of the commit within its frame.
    pub time: f32,
    /// Changes made since the previous commit.
    pub mutations: Vec<Mutation>,
}

/// Ordered commits belonging to one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Commits in non-decreasing time order.
    pub commits: Vec<Commit>,
}

impl Frame {
    fn last_time(&self) -> Option<f32> {
        self.commits.last().map(|commit| commit.time)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct EntityRecord {
    primitive: Primitive,
    frame: usize,
}

/// Surface that records every primitive, mutation and commit for replay.
///
/// Frames are opened by the orchestrator with [`Recording::begin_frame`].
/// Mutations left uncommitted when a frame closes are committed at the end of
/// that frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    entities: Vec<EntityRecord>,
    frames: Vec<Frame>,
    #[serde(skip)]
    pending: Vec<Mutation>,
}

impl Recording {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the current frame and opens the next one.
    pub fn begin_frame(&mut self) {
        self.finish();
        self.frames.push(Frame::default());
    }

    /// Commits pending mutations at the end of the current frame.
    pub fn finish(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let mutations = std::mem::take(&mut self.pending);
        self.current_frame()
            .commits
            .push(Commit { time: 1.0, mutations });
    }

    /// Frames captured so far.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of primitives created so far.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Primitive backing the entity, if it exists.
    #[must_use]
    pub fn primitive(&self, entity: EntityId) -> Option<&Primitive> {
        self.record(entity).map(|record| &record.primitive)
    }

    /// Handles of every entity created from the provided primitive predicate.
    pub fn entities_where<'a, F>(&'a self, mut predicate: F) -> impl Iterator<Item = EntityId> + 'a
    where
        F: FnMut(&Primitive) -> bool + 'a,
    {
        self.entities
            .iter()
            .enumerate()
            .filter(move |(_, record)| predicate(&record.primitive))
            .filter_map(|(index, _)| u32::try_from(index).ok().map(EntityId::new))
    }

    /// Latest committed state of the entity.
    #[must_use]
    pub fn entity_state(&self, entity: EntityId) -> Option<EntityState> {
        let last_frame = self.frames.len().checked_sub(1)?;
        self.sample(entity, last_frame, 1.0)
    }

    /// Interpolated state of the entity at normalised time `t` of `frame`.
    ///
    /// Returns `None` when the entity does not exist yet in that frame.
    #[must_use]
    pub fn sample(&self, entity: EntityId, frame: usize, t: f32) -> Option<EntityState> {
        let record = self.record(entity)?;
        if frame < record.frame || frame >= self.frames.len() {
            return None;
        }

        let mut state = EntityState::for_primitive(&record.primitive);
        for earlier in &self.frames[..frame] {
            for commit in &earlier.commits {
                apply_commit(&mut state, entity, commit);
            }
        }

        let mut span_start = 0.0;
        for commit in &self.frames[frame].commits {
            if t >= commit.time {
                apply_commit(&mut state, entity, commit);
                span_start = commit.time;
                continue;
            }

            let span = commit.time - span_start;
            let progress = if span > f32::EPSILON {
                (t - span_start) / span
            } else {
                1.0
            };
            let start = state.clone();
            for mutation in commit.mutations.iter().filter(|m| m.entity == entity) {
                state.blend(&start, &mutation.property, mutation.curve.apply(progress), false);
            }
            break;
        }

        Some(state)
    }

    fn record(&self, entity: EntityId) -> Option<&EntityRecord> {
        usize::try_from(entity.get())
            .ok()
            .and_then(|index| self.entities.get(index))
    }

    fn current_frame(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::default());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

fn apply_commit(state: &mut EntityState, entity: EntityId, commit: &Commit) {
    for mutation in commit.mutations.iter().filter(|m| m.entity == entity) {
        state.apply(&mutation.property);
    }
}

impl GraphicSurface for Recording {
    fn create(&mut self, primitive: Primitive) -> EntityId {
        let frame = self.frames.len().saturating_sub(1);
        let id = EntityId::new(u32::try_from(self.entities.len()).unwrap_or(u32::MAX));
        self.entities.push(EntityRecord { primitive, frame });
        id
    }

    fn set_with_curve(&mut self, entity: EntityId, property: Property, curve: Curve) {
        self.pending.push(Mutation {
            entity,
            property,
            curve,
        });
    }

    fn commit(&mut self, checkpoint: Checkpoint) -> Result<(), SurfaceError> {
        let time = checkpoint.time();
        if !(0.0..=1.0).contains(&time) {
            return Err(SurfaceError::TimeOutOfRange { time });
        }

        if let Some(unknown) = self
            .pending
            .iter()
            .find(|mutation| self.record(mutation.entity).is_none())
        {
            return Err(SurfaceError::UnknownEntity {
                entity: unknown.entity,
            });
        }

        let frame = self.current_frame();
        if let Some(previous) = frame.last_time() {
            if time < previous {
                return Err(SurfaceError::TimeWentBackwards { previous, time });
            }
        }

        let mutations = std::mem::take(&mut self.pending);
        self.current_frame().commits.push(Commit { time, mutations });
        Ok(())
    }
}
