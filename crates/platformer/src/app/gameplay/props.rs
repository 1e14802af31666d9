use engine::{
    Actor, Capabilities, CollisionGroups, Context, Contact, Entity, EntityState, Event,
    Interaction, Size,
};

use super::{models, sounds};

#[derive(Debug)]
pub(crate) struct Ladder {
    state: EntityState,
}

impl Ladder {
    pub(crate) fn new() -> Self {
        let mut state = EntityState::default();
        state.body.size = Size::new(1.0, 1.0);
        state.body.collision_group = CollisionGroups::LADDER;
        Self { state }
    }
}

impl Entity for Ladder {
    fn name(&self) -> &'static str {
        "ladder"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CLIMBABLE
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        actors.push(Actor::new(self.state.body.pos, models::LADDER));
    }
}

/// One-shot pickup. Its persistent tag doubles as the variable that remembers
/// it was taken.
#[derive(Debug)]
pub(crate) struct Bonus {
    state: EntityState,
    action: i32,
    upgrade: i32,
    message: &'static str,
    time: u32,
}

impl Bonus {
    pub(crate) fn new(action: i32, upgrade: i32, message: &'static str) -> Self {
        let mut state = EntityState::default();
        state.body.size = Size::new(1.0, 1.0);
        state.body.collision_group = CollisionGroups::BONUS;
        state.body.collides_with = CollisionGroups::SOLIDPLAYER;
        Self {
            state,
            action,
            upgrade,
            message,
            time: 0,
        }
    }
}

impl Entity for Bonus {
    fn name(&self) -> &'static str {
        "bonus"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn enter(&mut self, ctx: &mut Context<'_>) {
        if ctx.variable(ctx.tag()) != 0 {
            self.kill();
        }
    }

    fn tick(&mut self, _ctx: &mut Context<'_>) {
        self.time = self.time.wrapping_add(1);
    }

    fn on_collision(&mut self, other: &Contact, ctx: &mut Context<'_>) {
        if self.is_dead() || !other.has(Capabilities::PLAYER) {
            return;
        }
        ctx.interact(other.id, Interaction::GrantUpgrade(self.upgrade));
        ctx.stop_music();
        ctx.play_sound(sounds::VICTORY);
        ctx.text_box(self.message);
        let tag = ctx.tag();
        ctx.set_variable(tag, 1);
        self.kill();
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(self.state.body.pos, models::BONUS);
        actor.action = self.action;
        actor.ratio = (self.time % 200) as f32 / 200.0;
        actors.push(actor);
    }
}

/// Solid wall that opens for good once detector `key` is touched.
#[derive(Debug)]
pub(crate) struct Door {
    state: EntityState,
    key: i32,
}

impl Door {
    pub(crate) fn new(key: i32) -> Self {
        let mut state = EntityState::default();
        state.body.size = Size::new(1.0, 3.0);
        state.body.solid = true;
        state.body.collision_group = CollisionGroups::WALLS | CollisionGroups::DOORS;
        Self { state, key }
    }
}

impl Entity for Door {
    fn name(&self) -> &'static str {
        "door"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn enter(&mut self, ctx: &mut Context<'_>) {
        if ctx.variable(ctx.tag()) != 0 {
            self.kill();
        }
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context<'_>) {
        let Event::DetectorTouched { which } = event else {
            return;
        };
        if *which != self.key || self.is_dead() {
            return;
        }
        ctx.play_sound(sounds::DOOR);
        let tag = ctx.tag();
        ctx.set_variable(tag, 1);
        self.kill();
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(self.state.body.pos, models::DOOR);
        actor.scale = self.state.body.size;
        actors.push(actor);
    }
}
