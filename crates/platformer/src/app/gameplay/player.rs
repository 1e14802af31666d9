use engine::{
    Actor, Capabilities, CollisionGroups, Context, Contact, Control, Damageable, Effect, Entity,
    EntityState, Event, InputAction, Interaction, Player, Rect, Size, Toggle, Vec2, UPGRADES_KEY,
};

use super::{decrement, models, sounds, try_activate, upgrades};

/// Physics runs this many sub-steps per simulation tick.
const SUB_STEPS: usize = 10;

const GRAVITY: f32 = 0.00005;
const WALK_SPEED: f32 = 0.0075;
const MAX_HORZ_SPEED: f32 = 0.02;
const MAX_FALL_SPEED: f32 = 0.02;
const JUMP_VEL: f32 = 0.015;

const MAX_LIFE: i32 = 31;
const HURT_DELAY: i32 = 500;
const BLINK_DELAY: i32 = 2000;
const DIE_DELAY: i32 = 1500;
const WHIP_DELAY: i32 = 300;
const FIRE_DEBOUNCE: i32 = 150;
const LANDING_DEBOUNCE: i32 = 150;
const LADDER_GRACE: i32 = 10;

const SIZE: Size = Size::new(0.9, 1.9);

mod actions {
    pub(super) const STAND: i32 = 1;
    pub(super) const WALK: i32 = 2;
    pub(super) const JUMP: i32 = 3;
    pub(super) const FALL: i32 = 4;
    pub(super) const LADDER: i32 = 5;
    pub(super) const HURT: i32 = 6;
    pub(super) const DIE: i32 = 7;
    pub(super) const WHIP: i32 = 8;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Facing {
    Left,
    Right,
}

impl Facing {
    fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The player character.
#[derive(Debug)]
pub(crate) struct Rockman {
    state: EntityState,
    control: Control,
    vel: Vec2,
    facing: Facing,
    ground: bool,
    ladder: bool,
    ladder_delay: i32,
    ladder_x: f32,
    life: i32,
    upgrades: i32,
    hurt_delay: i32,
    blinking: i32,
    die_delay: i32,
    whip_delay: i32,
    debounce_fire: i32,
    debounce_landing: i32,
    time: i32,
    jump_button: Toggle,
    fire_button: Toggle,
    restart_button: Toggle,
}

impl Rockman {
    pub(crate) fn new() -> Self {
        let mut state = EntityState::default();
        state.body.size = SIZE;
        Self {
            state,
            control: Control::empty(),
            vel: Vec2::ZERO,
            facing: Facing::Right,
            ground: false,
            ladder: false,
            ladder_delay: 0,
            ladder_x: 0.0,
            life: MAX_LIFE,
            upgrades: 0,
            hurt_delay: 0,
            blinking: 0,
            die_delay: 0,
            whip_delay: 0,
            debounce_fire: 0,
            debounce_landing: 0,
            time: 0,
            jump_button: Toggle::default(),
            fire_button: Toggle::default(),
            restart_button: Toggle::default(),
        }
    }

    fn update_collision_masks(&mut self) {
        let body = &mut self.state.body;
        body.collision_group = CollisionGroups::PLAYER;
        if self.blinking == 0 {
            body.collision_group |= CollisionGroups::SOLIDPLAYER;
        }
        body.collides_with = CollisionGroups::WALLS
            | CollisionGroups::LADDER
            | CollisionGroups::BONUS
            | CollisionGroups::DOORS;
    }

    fn sub_tick(&mut self, ctx: &mut Context<'_>) {
        decrement(&mut self.blinking);
        decrement(&mut self.hurt_delay);

        if self.restart_button.toggle(self.control.is_down(InputAction::Restart)) {
            self.life = 0;
        }
        if self.hurt_delay > 0 || self.life <= 0 {
            self.control = Control::empty();
        }
        if self.life <= 0 {
            decrement(&mut self.die_delay);
            if self.die_delay == 0 {
                self.respawn(ctx);
            }
        }

        self.time += 1;
        self.compute_velocity(ctx);

        let trace = ctx.slide_move(&mut self.state.body, self.vel);
        if !trace.moved_vertically {
            self.vel.y = 0.0;
        }
        if !trace.moved_horizontally {
            self.vel.x = 0.0;
        }

        let was_on_ground = self.ground;
        let body = &self.state.body;
        let feet = Rect::new(
            Vec2::new(body.pos.x, body.pos.y - 0.1),
            Size::new(body.size.width, 0.1),
        );
        self.ground = ctx.is_solid_rect(feet);
        if self.ground && !was_on_ground && try_activate(&mut self.debounce_landing, LANDING_DEBOUNCE) {
            ctx.play_sound(sounds::LAND);
        }

        decrement(&mut self.debounce_fire);
        decrement(&mut self.debounce_landing);
        decrement(&mut self.whip_delay);
        decrement(&mut self.ladder_delay);

        self.handle_whip(ctx);
    }

    fn compute_velocity(&mut self, ctx: &mut Context<'_>) {
        let control = self.control;
        self.climb(control);

        if self.vel.x > 0.0 {
            self.facing = Facing::Right;
        } else if self.vel.x < 0.0 {
            self.facing = Facing::Left;
        }

        if self.life > 0 && !self.ladder {
            self.vel.y -= GRAVITY;
        }

        let jump = control.is_down(InputAction::Jump);
        if self.jump_button.toggle(jump) && (self.ground || self.ladder) {
            ctx.play_sound(sounds::JUMP);
            self.vel.y = JUMP_VEL;
            self.ladder = false;
        }

        // Releasing jump cuts the ascent short.
        if !self.ladder && self.vel.y > 0.0 && !jump {
            self.vel.y = 0.0;
        }

        self.vel.x = self.vel.x.clamp(-MAX_HORZ_SPEED, MAX_HORZ_SPEED);
        self.vel.y = self.vel.y.max(-MAX_FALL_SPEED);
    }

    fn climb(&mut self, control: Control) {
        let up = control.is_down(InputAction::Up);
        let down = control.is_down(InputAction::Down);
        let can_climb = self.upgrades & upgrades::CLIMB != 0;

        if can_climb && self.ladder_delay > 0 && (up || down) {
            self.ladder = true;
        }
        if self.ladder_delay == 0 {
            self.ladder = false;
        }

        if self.ladder {
            self.state.body.pos.x = self.ladder_x + 0.1;
            if control.is_down(InputAction::Left) || control.is_down(InputAction::Right) {
                self.ladder = false;
            } else {
                self.vel.y = match (up, down) {
                    (true, false) => WALK_SPEED,
                    (false, true) => -WALK_SPEED,
                    _ => 0.0,
                };
            }
        }

        let mut wanted = 0.0;
        if !self.ladder && self.whip_delay == 0 {
            if control.is_down(InputAction::Left) {
                wanted -= WALK_SPEED;
            }
            if control.is_down(InputAction::Right) {
                wanted += WALK_SPEED;
            }
        }
        self.vel.x = self.vel.x * 0.95 + wanted * 0.05;
        if self.vel.x.abs() < 0.00001 {
            self.vel.x = 0.0;
        }
    }

    fn handle_whip(&mut self, ctx: &mut Context<'_>) {
        let pressed = self.fire_button.toggle(self.control.is_down(InputAction::Fire));
        if self.upgrades & upgrades::WHIP == 0 || !pressed {
            return;
        }
        if !try_activate(&mut self.debounce_fire, FIRE_DEBOUNCE) {
            return;
        }
        if self.ground {
            self.vel.x = 0.0;
        }
        let sign = self.facing.sign();
        let body = &self.state.body;
        let origin = Vec2::new(
            body.pos.x + body.size.width * 0.5 + sign * 0.5 - 0.25,
            body.pos.y,
        );
        ctx.spawn(Box::new(WhipHit::new(origin, Vec2::new(sign * 0.25, 0.0))));
        ctx.play_sound(sounds::FIRE);
        self.whip_delay = WHIP_DELAY;
    }

    fn die(&mut self, ctx: &mut Context<'_>) {
        ctx.play_sound(sounds::DIE);
        self.die_delay = DIE_DELAY;
    }

    fn respawn(&mut self, ctx: &mut Context<'_>) {
        ctx.post(Event::Respawn);
        self.blinking = BLINK_DELAY;
        self.vel = Vec2::ZERO;
        self.life = MAX_LIFE;
    }

    fn action(&self) -> i32 {
        if self.life <= 0 {
            actions::DIE
        } else if self.hurt_delay > 0 {
            actions::HURT
        } else if self.whip_delay > 0 {
            actions::WHIP
        } else if self.ladder {
            actions::LADDER
        } else if !self.ground {
            if self.vel.y > 0.0 {
                actions::JUMP
            } else {
                actions::FALL
            }
        } else if self.vel.x != 0.0 {
            actions::WALK
        } else {
            actions::STAND
        }
    }
}

impl Entity for Rockman {
    fn name(&self) -> &'static str {
        "player"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::DAMAGEABLE | Capabilities::PLAYER
    }

    fn enter(&mut self, ctx: &mut Context<'_>) {
        self.upgrades = ctx.variable(UPGRADES_KEY);
        self.update_collision_masks();
        ctx.set_ambient_light(0.0);
    }

    fn tick(&mut self, ctx: &mut Context<'_>) {
        self.control = ctx.control();
        self.update_collision_masks();
        for _ in 0..SUB_STEPS {
            self.sub_tick(ctx);
        }
        if self.life <= 0 {
            ctx.set_ambient_light((self.die_delay - DIE_DELAY) as f32 / DIE_DELAY as f32);
        }
    }

    fn on_collision(&mut self, other: &Contact, _ctx: &mut Context<'_>) {
        if other.has(Capabilities::CLIMBABLE) {
            self.ladder_delay = LADDER_GRACE;
            self.ladder_x = other.body.pos.x;
        }
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(self.state.body.pos, models::ROCKMAN);
        actor.action = self.action();
        actor.ratio = (self.time % 1000) as f32 / 1000.0;
        actor.scale = Size::new(self.facing.sign() * 3.0, 3.0);
        if self.blinking > 0 {
            actor.effect = Effect::Blinking;
        }
        actor.z_order = 1;
        actors.push(actor);
    }

    fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        Some(self)
    }

    fn as_player(&self) -> Option<&dyn Player> {
        Some(self)
    }

    fn as_player_mut(&mut self) -> Option<&mut dyn Player> {
        Some(self)
    }
}

impl Damageable for Rockman {
    fn on_damage(&mut self, amount: i32, ctx: &mut Context<'_>) {
        if self.life <= 0 || self.blinking > 0 {
            return;
        }
        self.life -= amount;
        if self.life <= 0 {
            self.life = 0;
            self.die(ctx);
            return;
        }
        self.hurt_delay = HURT_DELAY;
        self.blinking = BLINK_DELAY;
        ctx.play_sound(sounds::HURT);
    }
}

impl Player for Rockman {
    fn health(&self) -> f32 {
        (self.life as f32 / MAX_LIFE as f32).clamp(0.0, 1.0)
    }

    fn add_upgrade(&mut self, upgrade: i32, ctx: &mut Context<'_>) {
        self.upgrades |= upgrade;
        self.blinking = BLINK_DELAY;
        self.life = MAX_LIFE;
        ctx.set_variable(UPGRADES_KEY, self.upgrades);
    }
}

const WHIP_LIFE: i32 = 13;
const WHIP_DAMAGE: i32 = 10;

/// Short-lived hitbox thrown by the whip.
#[derive(Debug)]
pub(crate) struct WhipHit {
    state: EntityState,
    vel: Vec2,
    life: i32,
}

impl WhipHit {
    pub(crate) fn new(pos: Vec2, vel: Vec2) -> Self {
        let mut state = EntityState::default();
        state.body.pos = pos;
        state.body.size = Size::new(0.5, 2.0);
        state.body.collides_with = CollisionGroups::WALLS | CollisionGroups::ENEMIES;
        Self {
            state,
            vel,
            life: WHIP_LIFE,
        }
    }
}

impl Entity for WhipHit {
    fn name(&self) -> &'static str {
        "whip_hit"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn tick(&mut self, _ctx: &mut Context<'_>) {
        self.state.body.pos += self.vel;
        decrement(&mut self.life);
        if self.life == 0 {
            self.kill();
        }
    }

    fn on_collision(&mut self, other: &Contact, ctx: &mut Context<'_>) {
        if self.is_dead() {
            return;
        }
        if other.has(Capabilities::DAMAGEABLE) {
            ctx.interact(other.id, Interaction::Damage(WHIP_DAMAGE));
        }
        self.kill();
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(self.state.body.pos, models::BULLET);
        actor.ratio = 1.0 - self.life as f32 / WHIP_LIFE as f32;
        actor.scale = self.state.body.size;
        actors.push(actor);
    }
}
