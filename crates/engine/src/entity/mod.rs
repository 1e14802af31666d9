mod context;
mod registry;

pub use context::{Context, SimServices};
pub use registry::{EntityRegistry, LifecycleStats, Phase, RUNTIME_TAG};

use bitflags::bitflags;

use crate::app::Actor;
use crate::events::Event;
use crate::world::{Body, Vec2};

slotmap::new_key_type! {
    /// Stable for the entity's lifetime. Never reused while the old entity exists.
    pub struct EntityId;
}

bitflags! {
    /// What other entities may ask of this one through an [`Interaction`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        const DAMAGEABLE = 1 << 0;
        const PLAYER = 1 << 1;
        const CLIMBABLE = 1 << 2;
    }
}

/// Data every entity carries. Behaviors own one and expose it through
/// [`Entity::state`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntityState {
    pub body: Body,
    /// Once set, the entity is removed at the next lifecycle boundary.
    pub dead: bool,
}

impl EntityState {
    pub fn new(body: Body) -> Self {
        Self { body, dead: false }
    }
}

pub trait Damageable {
    fn on_damage(&mut self, amount: i32, ctx: &mut Context<'_>);
}

pub trait Player {
    /// Remaining life in `0.0..=1.0`.
    fn health(&self) -> f32;
    fn add_upgrade(&mut self, upgrade: i32, ctx: &mut Context<'_>);
}

/// What a collision callback is told about the other body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: EntityId,
    pub tag: i32,
    pub body: Body,
    pub capabilities: Capabilities,
}

impl Contact {
    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }
}

/// Effect one entity requests on another. Applied after the overlap sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    Damage(i32),
    /// Slide-moves the target's body by the given delta.
    Push(Vec2),
    GrantUpgrade(i32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuedInteraction {
    pub source: EntityId,
    pub target: EntityId,
    pub interaction: Interaction,
}

pub trait Entity {
    /// Short type name used in logs.
    fn name(&self) -> &'static str;

    fn state(&self) -> &EntityState;

    fn state_mut(&mut self) -> &mut EntityState;

    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Called exactly once when the entity joins the live set.
    fn enter(&mut self, _ctx: &mut Context<'_>) {}

    /// Called exactly once when the entity leaves the live set.
    fn leave(&mut self, _ctx: &mut Context<'_>) {}

    fn tick(&mut self, _ctx: &mut Context<'_>) {}

    fn on_collision(&mut self, _other: &Contact, _ctx: &mut Context<'_>) {}

    /// Receives the tick's events after the room state machine handled them.
    fn on_event(&mut self, _event: &Event, _ctx: &mut Context<'_>) {}

    fn add_actors(&self, _actors: &mut Vec<Actor>) {}

    fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        None
    }

    fn as_player(&self) -> Option<&dyn Player> {
        None
    }

    fn as_player_mut(&mut self) -> Option<&mut dyn Player> {
        None
    }

    fn body(&self) -> &Body {
        &self.state().body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.state_mut().body
    }

    fn is_dead(&self) -> bool {
        self.state().dead
    }

    fn kill(&mut self) {
        self.state_mut().dead = true;
    }
}
