use std::fmt;

use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::app::Actor;
use crate::events::Event;
use crate::physics::{BodyLookup, Physics};
use crate::world::Body;

use super::{Context, Contact, Entity, EntityId, Interaction, SimServices};

/// Tag carried by entities spawned at runtime rather than from a room's
/// spawner list. Spawner tags start above it.
pub const RUNTIME_TAG: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Spawned this tick, not yet entered.
    Pending,
    Live,
}

struct Slot {
    /// `None` while the entity is out for one of its own callbacks.
    entity: Option<Box<dyn Entity>>,
    tag: i32,
    phase: Phase,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleStats {
    pub removed: usize,
    pub integrated: usize,
}

/// Arena of entities plus the ordered live set and the pending-spawn list.
#[derive(Default)]
pub struct EntityRegistry {
    slots: SlotMap<EntityId, Slot>,
    live: Vec<EntityId>,
    pending: Vec<EntityId>,
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("live", &self.live.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl BodyLookup for EntityRegistry {
    fn body(&self, id: EntityId) -> Option<&Body> {
        self.get(id).map(|entity| entity.body())
    }
}

impl EntityRegistry {
    /// Queues `entity` for the next lifecycle boundary. The id is valid at once.
    pub fn spawn(&mut self, entity: Box<dyn Entity>, tag: i32) -> EntityId {
        let id = self.slots.insert(Slot {
            entity: Some(entity),
            tag,
            phase: Phase::Pending,
        });
        self.pending.push(id);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        self.slots.get(id)?.entity.as_deref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut (dyn Entity + 'static)> {
        self.slots.get_mut(id)?.entity.as_deref_mut()
    }

    pub fn phase(&self, id: EntityId) -> Option<Phase> {
        self.slots.get(id).map(|slot| slot.phase)
    }

    pub fn tag(&self, id: EntityId) -> Option<i32> {
        self.slots.get(id).map(|slot| slot.tag)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.phase(id) == Some(Phase::Live)
    }

    pub fn live_ids(&self) -> &[EntityId] {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Runs `f` with the entity taken out of its slot, so the registry it can
    /// reach through the context never aliases it.
    fn with_entity<R>(
        &mut self,
        id: EntityId,
        physics: &Physics,
        services: &mut SimServices,
        f: impl FnOnce(&mut dyn Entity, &mut Context<'_>) -> R,
    ) -> Option<R> {
        let slot = self.slots.get_mut(id)?;
        let tag = slot.tag;
        let mut entity = slot.entity.take()?;
        let result = {
            let mut ctx = Context::new(id, tag, self, physics, services);
            f(entity.as_mut(), &mut ctx)
        };
        if let Some(slot) = self.slots.get_mut(id) {
            slot.entity = Some(entity);
        }
        Some(result)
    }

    /// Ticks every live entity in live-set order. Spawns land in the pending list.
    pub fn tick_all(&mut self, physics: &Physics, services: &mut SimServices) {
        for index in 0..self.live.len() {
            let id = self.live[index];
            self.with_entity(id, physics, services, |entity, ctx| entity.tick(ctx));
        }
    }

    /// One overlap sweep. Returns the number of callbacks invoked.
    pub fn dispatch_collisions(&mut self, physics: &Physics, services: &mut SimServices) -> usize {
        let overlaps = physics.check_for_overlaps(&*self);
        let mut dispatched = 0;
        for overlap in overlaps {
            let Some(contact) = self.contact(overlap.other) else {
                continue;
            };
            let delivered = self.with_entity(overlap.subject, physics, services, |entity, ctx| {
                entity.on_collision(&contact, ctx)
            });
            if delivered.is_some() {
                dispatched += 1;
            }
        }
        dispatched
    }

    fn contact(&self, id: EntityId) -> Option<Contact> {
        let slot = self.slots.get(id)?;
        let entity = slot.entity.as_deref()?;
        Some(Contact {
            id,
            tag: slot.tag,
            body: *entity.body(),
            capabilities: entity.capabilities(),
        })
    }

    /// Applies the interactions queued so far, in post order. Anything queued
    /// while applying waits for the next call.
    pub fn apply_interactions(&mut self, physics: &Physics, services: &mut SimServices) -> usize {
        let queued = std::mem::take(&mut services.interactions);
        let mut applied = 0;
        for request in queued {
            let accepted = self
                .with_entity(request.target, physics, services, |entity, ctx| {
                    match request.interaction {
                        Interaction::Damage(amount) => match entity.as_damageable_mut() {
                            Some(target) => {
                                target.on_damage(amount, ctx);
                                true
                            }
                            None => false,
                        },
                        Interaction::GrantUpgrade(upgrade) => match entity.as_player_mut() {
                            Some(target) => {
                                target.add_upgrade(upgrade, ctx);
                                true
                            }
                            None => false,
                        },
                        Interaction::Push(delta) => {
                            ctx.slide_move(entity.body_mut(), delta);
                            true
                        }
                    }
                })
                .unwrap_or(false);
            if accepted {
                applied += 1;
            } else {
                trace!(interaction = ?request.interaction, "interaction_dropped");
            }
        }
        applied
    }

    /// Lifecycle boundary: dead live entities leave and are dropped, then
    /// pending entities enter and join the live set.
    pub fn integrate(&mut self, physics: &mut Physics, services: &mut SimServices) -> LifecycleStats {
        let dead: Vec<EntityId> = self
            .live
            .iter()
            .copied()
            .filter(|id| self.get(*id).is_some_and(|entity| entity.is_dead()))
            .collect();
        for id in &dead {
            self.with_entity(*id, physics, services, |entity, ctx| entity.leave(ctx));
            physics.remove_body(*id);
            self.slots.remove(*id);
            if services.player == Some(*id) {
                services.player = None;
            }
        }
        if !dead.is_empty() {
            let slots = &self.slots;
            self.live.retain(|id| slots.contains_key(*id));
        }

        let pending = std::mem::take(&mut self.pending);
        let integrated = pending.len();
        for id in pending {
            match self.slots.get_mut(id) {
                Some(slot) => slot.phase = Phase::Live,
                None => continue,
            }
            self.with_entity(id, physics, services, |entity, ctx| entity.enter(ctx));
            physics.add_body(id);
            self.live.push(id);
        }

        let stats = LifecycleStats {
            removed: dead.len(),
            integrated,
        };
        if stats != LifecycleStats::default() {
            debug!(
                removed = stats.removed,
                integrated = stats.integrated,
                live = self.live.len(),
                "lifecycle_boundary"
            );
        }
        stats
    }

    pub fn dispatch_event(&mut self, event: &Event, physics: &Physics, services: &mut SimServices) {
        for index in 0..self.live.len() {
            let id = self.live[index];
            self.with_entity(id, physics, services, |entity, ctx| entity.on_event(event, ctx));
        }
    }

    /// Every live entity leaves, in live-set order. The entity named by `keep`
    /// is handed back instead of dropped. Pending entities never entered, so
    /// they are dropped without callbacks.
    pub fn teardown(
        &mut self,
        keep: Option<EntityId>,
        physics: &mut Physics,
        services: &mut SimServices,
    ) -> Option<Box<dyn Entity>> {
        let live = std::mem::take(&mut self.live);
        for id in &live {
            self.with_entity(*id, physics, services, |entity, ctx| entity.leave(ctx));
            physics.remove_body(*id);
        }
        let kept = keep
            .and_then(|id| self.slots.remove(id))
            .and_then(|slot| slot.entity);
        let dropped = self.slots.len();
        self.slots.clear();
        self.pending.clear();
        debug!(left = live.len(), dropped, "registry_teardown");
        kept
    }

    pub fn actors(&self, out: &mut Vec<Actor>) {
        for id in &self.live {
            if let Some(entity) = self.get(*id) {
                entity.add_actors(out);
            }
        }
    }
}
