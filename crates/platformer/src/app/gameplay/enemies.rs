use engine::{
    Actor, Capabilities, CollisionGroups, Context, Contact, Damageable, Effect, Entity, EntityState,
    Interaction, ModelId, Size, Vec2,
};

use super::{decrement, models, sounds};

const GRAVITY: f32 = 0.005;
const AIR_SPEED: f32 = 0.03;
const START_LIFE: i32 = 30;
const HURT_BLINK: i32 = 100;
/// Ticks between jumps while standing.
const JUMP_PERIOD: u32 = 200;
const CADAVER_LIFE: i32 = 100;

/// Tuning that tells one walking enemy from another.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WalkerKind {
    name: &'static str,
    model: ModelId,
    size: Size,
    ground_speed: f32,
    jump_vel: f32,
    contact_damage: i32,
}

pub(crate) const SKELETON: WalkerKind = WalkerKind {
    name: "skeleton",
    model: models::SKELETON,
    size: Size::new(1.0, 2.0),
    ground_speed: 0.02,
    jump_vel: 0.07,
    contact_damage: 20,
};

/// Only moves while airborne.
pub(crate) const HOPPER: WalkerKind = WalkerKind {
    name: "hopper",
    model: models::HOPPER,
    size: Size::UNIT,
    ground_speed: 0.0,
    jump_vel: 0.13,
    contact_damage: 5,
};

/// Patrols under gravity, turns around at walls and hurts the player on contact.
#[derive(Debug)]
pub(crate) struct Walker {
    state: EntityState,
    kind: WalkerKind,
    vel: Vec2,
    dir: f32,
    ground: bool,
    life: i32,
    blinking: i32,
    time: u32,
}

impl Walker {
    pub(crate) fn new(kind: WalkerKind) -> Self {
        let mut state = EntityState::default();
        state.body.size = kind.size;
        state.body.collision_group = CollisionGroups::ENEMIES;
        state.body.collides_with = CollisionGroups::SOLIDPLAYER;
        Self {
            state,
            kind,
            vel: Vec2::ZERO,
            dir: -1.0,
            ground: false,
            life: START_LIFE,
            blinking: 0,
            time: 0,
        }
    }
}

impl Entity for Walker {
    fn name(&self) -> &'static str {
        self.kind.name
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::DAMAGEABLE
    }

    fn tick(&mut self, ctx: &mut Context<'_>) {
        self.time = self.time.wrapping_add(1);
        self.vel.y -= GRAVITY;

        if self.ground && self.time % JUMP_PERIOD == 0 {
            self.vel.y = self.kind.jump_vel;
            self.ground = false;
        }
        let speed = if self.ground {
            self.kind.ground_speed
        } else {
            AIR_SPEED
        };
        self.vel.x = self.dir * speed;

        let trace = ctx.slide_move(&mut self.state.body, self.vel);
        if !trace.moved_horizontally {
            self.dir = -self.dir;
        }
        if !trace.moved_vertically {
            self.ground = true;
            self.vel.y = 0.0;
        }
        decrement(&mut self.blinking);
    }

    fn on_collision(&mut self, other: &Contact, ctx: &mut Context<'_>) {
        if other.has(Capabilities::DAMAGEABLE) {
            ctx.interact(other.id, Interaction::Damage(self.kind.contact_damage));
        }
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(self.state.body.pos, self.kind.model);
        actor.ratio = (self.time % 80) as f32 / 80.0;
        // Sprites face left; mirror when walking right.
        let width = if self.dir > 0.0 {
            -self.kind.size.width
        } else {
            self.kind.size.width
        };
        actor.scale = Size::new(width, self.kind.size.height);
        if self.blinking > 0 {
            actor.effect = Effect::Blinking;
        }
        actors.push(actor);
    }

    fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        Some(self)
    }
}

impl Damageable for Walker {
    fn on_damage(&mut self, amount: i32, ctx: &mut Context<'_>) {
        if self.is_dead() {
            return;
        }
        self.blinking = HURT_BLINK;
        self.life -= amount;
        ctx.play_sound(sounds::HURT_ENEMY);
        if self.life < 0 {
            ctx.play_sound(sounds::DIE_ENEMY);
            ctx.spawn(Box::new(Cadaver::new(self.state.body.pos)));
            self.kill();
        }
    }
}

/// Remains left behind by a dead enemy. Blinks, then disappears.
#[derive(Debug)]
pub(crate) struct Cadaver {
    state: EntityState,
    counter: i32,
}

impl Cadaver {
    pub(crate) fn new(pos: Vec2) -> Self {
        let mut state = EntityState::default();
        state.body.pos = pos;
        state.body.size = Size::new(1.0, 0.5);
        Self { state, counter: 0 }
    }
}

impl Entity for Cadaver {
    fn name(&self) -> &'static str {
        "cadaver"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn tick(&mut self, _ctx: &mut Context<'_>) {
        self.counter += 1;
        if self.counter >= CADAVER_LIFE {
            self.kill();
        }
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(self.state.body.pos, models::CADAVER);
        actor.ratio = self.counter as f32 / CADAVER_LIFE as f32;
        actor.effect = Effect::Blinking;
        actors.push(actor);
    }
}
