use engine::{
    Actor, Capabilities, CollisionGroups, Context, Contact, Entity, EntityState, Interaction,
    Size, Vec2,
};

use super::models;

/// Damage large enough to kill outright.
const SPIKES_DAMAGE: i32 = 1000;

/// Horizontal push per tick applied to anything standing on a conveyor.
pub(crate) const CONVEYOR_SPEED: f32 = -0.004;

/// Solid floor tile that kills anything vulnerable standing on it.
#[derive(Debug)]
pub(crate) struct Spikes {
    state: EntityState,
}

impl Spikes {
    pub(crate) fn new() -> Self {
        let mut state = EntityState::default();
        state.body.size = Size::new(1.0, 0.95);
        state.body.solid = true;
        state.body.collision_group = CollisionGroups::WALLS;
        state.body.collides_with = CollisionGroups::SOLIDPLAYER;
        Self { state }
    }
}

impl Entity for Spikes {
    fn name(&self) -> &'static str {
        "spikes"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn on_collision(&mut self, other: &Contact, ctx: &mut Context<'_>) {
        if other.has(Capabilities::DAMAGEABLE) {
            ctx.interact(other.id, Interaction::Damage(SPIKES_DAMAGE));
        }
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        actors.push(Actor::new(self.state.body.pos, models::SPIKES));
    }
}

/// Solid block that drags the player sideways.
#[derive(Debug)]
pub(crate) struct Conveyor {
    state: EntityState,
    speed: f32,
    time: u32,
}

impl Conveyor {
    pub(crate) fn new(speed: f32) -> Self {
        let mut state = EntityState::default();
        state.body.size = Size::new(1.0, 1.0);
        state.body.solid = true;
        state.body.collision_group = CollisionGroups::WALLS;
        state.body.collides_with = CollisionGroups::PLAYER;
        Self {
            state,
            speed,
            time: 0,
        }
    }
}

impl Entity for Conveyor {
    fn name(&self) -> &'static str {
        "conveyor"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn tick(&mut self, _ctx: &mut Context<'_>) {
        self.time = self.time.wrapping_add(1);
    }

    fn on_collision(&mut self, other: &Contact, ctx: &mut Context<'_>) {
        // Only bodies resting on top get carried.
        let top = self.state.body.pos.y + self.state.body.size.height;
        if other.body.pos.y < top - 0.01 {
            return;
        }
        ctx.interact(other.id, Interaction::Push(Vec2::new(self.speed, 0.0)));
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(self.state.body.pos, models::RECT);
        actor.action = 1;
        actor.ratio = (self.time % 100) as f32 / 100.0;
        actors.push(actor);
    }
}
