mod resolver;

pub use resolver::{slide_move, SolidityQuery};

use tracing::trace;

use crate::entity::EntityId;
use crate::world::{Body, IntBox, SlideResult, TileField, Vec2};

/// Read access to the bodies the physics engine has registered.
pub trait BodyLookup {
    fn body(&self, id: EntityId) -> Option<&Body>;
}

/// One directional contact found by the overlap sweep: `subject` reacts to `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub subject: EntityId,
    pub other: EntityId,
}

/// Owns the room's tile field and the registration list of live bodies.
#[derive(Debug, Default)]
pub struct Physics {
    tiles: TileField,
    bodies: Vec<EntityId>,
}

impl Physics {
    pub fn new(tiles: TileField) -> Self {
        Self {
            tiles,
            bodies: Vec::new(),
        }
    }

    pub fn tiles(&self) -> &TileField {
        &self.tiles
    }

    pub fn add_body(&mut self, id: EntityId) {
        if !self.bodies.contains(&id) {
            self.bodies.push(id);
        }
    }

    pub fn remove_body(&mut self, id: EntityId) {
        self.bodies.retain(|registered| *registered != id);
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.bodies.contains(&id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Tiles plus every registered solid body other than `exclude`.
    pub fn is_solid(
        &self,
        bodies: &dyn BodyLookup,
        exclude: Option<EntityId>,
        area: IntBox,
    ) -> bool {
        if self.tiles.is_box_solid(area) {
            return true;
        }
        self.bodies
            .iter()
            .filter(|id| Some(**id) != exclude)
            .filter_map(|id| bodies.body(*id))
            .any(|other| other.solid && other.int_box().intersects(&area))
    }

    pub fn slide_move(
        &self,
        bodies: &dyn BodyLookup,
        exclude: Option<EntityId>,
        body: &mut Body,
        delta: Vec2,
    ) -> SlideResult {
        let solid = |area: IntBox| self.is_solid(bodies, exclude, area);
        slide_move(body, delta, &solid)
    }

    /// Broad phase: every ordered pair of distinct registered bodies where the
    /// first reacts to the second's group and the boxes touch. Both directions
    /// of a pair are tested independently.
    pub fn check_for_overlaps(&self, bodies: &dyn BodyLookup) -> Vec<Overlap> {
        let mut overlaps = Vec::new();
        for subject in &self.bodies {
            let Some(subject_body) = bodies.body(*subject) else {
                continue;
            };
            if subject_body.collides_with.is_empty() {
                continue;
            }
            for other in &self.bodies {
                if other == subject {
                    continue;
                }
                let Some(other_body) = bodies.body(*other) else {
                    continue;
                };
                if subject_body.reacts_to(other_body) && subject_body.overlaps(other_body) {
                    overlaps.push(Overlap {
                        subject: *subject,
                        other: *other,
                    });
                }
            }
        }
        trace!(
            bodies = self.bodies.len(),
            overlaps = overlaps.len(),
            "overlap_sweep"
        );
        overlaps
    }
}
