use engine::{
    Actor, CollisionGroups, Context, Contact, Effect, Entity, EntityState, Event, Size, Vec2,
    UPGRADES_KEY,
};

use super::{decrement, models, sounds, try_activate};

/// Ticks before a detector can fire again.
const TOUCH_DELAY: i32 = 1000;

/// Thin vertical switch. Posts its id whenever the player walks through it.
#[derive(Debug)]
pub(crate) struct Detector {
    state: EntityState,
    which: i32,
    touch_delay: i32,
}

impl Detector {
    pub(crate) fn new(which: i32) -> Self {
        let mut state = EntityState::default();
        state.body.size = Size::new(0.1, 3.0);
        state.body.collides_with = CollisionGroups::PLAYER | CollisionGroups::SOLIDPLAYER;
        Self {
            state,
            which,
            touch_delay: 0,
        }
    }
}

impl Entity for Detector {
    fn name(&self) -> &'static str {
        "detector"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn tick(&mut self, _ctx: &mut Context<'_>) {
        decrement(&mut self.touch_delay);
    }

    fn on_collision(&mut self, _other: &Contact, ctx: &mut Context<'_>) {
        if !try_activate(&mut self.touch_delay, TOUCH_DELAY) {
            return;
        }
        ctx.play_sound(sounds::SWITCH);
        ctx.post(Event::DetectorTouched { which: self.which });
    }
}

/// Sends the player to another room. `transform` is added to the player's
/// position so it comes out on the matching edge.
#[derive(Debug)]
pub(crate) struct RoomBoundaryDetector {
    state: EntityState,
    target_room: usize,
    transform: Vec2,
    touched: bool,
}

impl RoomBoundaryDetector {
    pub(crate) fn new(target_room: usize, transform: Vec2) -> Self {
        let mut state = EntityState::default();
        state.body.size = Size::new(1.0, 1.0);
        state.body.collides_with = CollisionGroups::PLAYER | CollisionGroups::SOLIDPLAYER;
        Self {
            state,
            target_room,
            transform,
            touched: false,
        }
    }
}

impl Entity for RoomBoundaryDetector {
    fn name(&self) -> &'static str {
        "room_boundary"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn on_collision(&mut self, _other: &Contact, ctx: &mut Context<'_>) {
        if self.touched {
            return;
        }
        self.touched = true;
        ctx.post(Event::TouchLevelBoundary {
            target_room: self.target_room,
            transform: self.transform,
        });
    }
}

/// Invisible wall at a room edge with no neighbour.
#[derive(Debug)]
pub(crate) struct RoomBoundaryBlocker {
    state: EntityState,
}

impl RoomBoundaryBlocker {
    pub(crate) fn new(blocks: CollisionGroups) -> Self {
        let mut state = EntityState::default();
        state.body.size = Size::new(1.0, 1.0);
        state.body.solid = true;
        state.body.collision_group = CollisionGroups::WALLS;
        state.body.collides_with = blocks;
        Self { state }
    }
}

impl Entity for RoomBoundaryBlocker {
    fn name(&self) -> &'static str {
        "blocker"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(self.state.body.pos, models::RECT);
        actor.effect = Effect::Blinking;
        actors.push(actor);
    }
}

/// Ends the game when the player reaches it holding every upgrade in
/// `required`.
#[derive(Debug)]
pub(crate) struct FinishTrigger {
    state: EntityState,
    required: i32,
    finished: bool,
    warned: bool,
}

impl FinishTrigger {
    pub(crate) fn new(required: i32) -> Self {
        let mut state = EntityState::default();
        state.body.size = Size::new(1.0, 1.0);
        // A blinking player drops SOLIDPLAYER but can still open the chest.
        state.body.collides_with = CollisionGroups::PLAYER | CollisionGroups::SOLIDPLAYER;
        Self {
            state,
            required,
            finished: false,
            warned: false,
        }
    }
}

impl Entity for FinishTrigger {
    fn name(&self) -> &'static str {
        "chest"
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn on_collision(&mut self, _other: &Contact, ctx: &mut Context<'_>) {
        if self.finished {
            return;
        }
        let held = ctx.variable(UPGRADES_KEY);
        if held & self.required != self.required {
            if !self.warned {
                self.warned = true;
                ctx.text_box("The chest is locked.");
            }
            return;
        }
        self.finished = true;
        ctx.stop_music();
        ctx.play_sound(sounds::VICTORY);
        ctx.post(Event::FinishGame);
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(self.state.body.pos, models::CHEST);
        actor.action = i32::from(self.finished);
        actors.push(actor);
    }
}
