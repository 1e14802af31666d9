use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::SimConfig;
use super::input::{Control, InputAction};
use super::presentation::{flush_cues, Actor, Audio, Cue, View};
use crate::content::{
    parse_spawner_call, persistent_tag, EntityConfig, EntityFactory, FactoryError, Quest,
    SaveSlot, SpawnerParseError,
};
use crate::entity::{
    Entity, EntityId, EntityRegistry, Interaction, QueuedInteraction, SimServices,
};
use crate::events::Event;
use crate::physics::{BodyLookup, Physics};
use crate::variables::VariableStore;
use crate::world::{Size, Vec2};

/// Upgrade value meaning "every upgrade at once".
pub const ALL_UPGRADES: i32 = -1;

/// Small lift applied on respawn so the player does not start inside the floor.
const RESPAWN_LIFT: Vec2 = Vec2::new(0.0, 0.01);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoomState {
    NoRoom,
    LoadRequested { room: usize, transform: Vec2 },
    Active { room: usize },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// The game is over; the view layer should replace this scene.
    Completed,
}

#[derive(Debug, Error)]
pub enum RoomLoadError {
    #[error("no such room {room} (quest has {count} rooms)")]
    NoSuchRoom { room: usize, count: usize },
    #[error("room {room}, spawner {index}: {source}")]
    MalformedSpawner {
        room: usize,
        index: usize,
        #[source]
        source: SpawnerParseError,
    },
    #[error("room {room}, spawner {index}: unknown entity type `{name}`")]
    UnknownEntityType {
        room: usize,
        index: usize,
        name: String,
    },
    #[error("room {room}, spawner {index} (`{name}`): {source}")]
    InvalidEntityConfig {
        room: usize,
        index: usize,
        name: String,
        #[source]
        source: FactoryError,
    },
    #[error("failed to create player `{name}`: {source}")]
    Player {
        name: String,
        #[source]
        source: FactoryError,
    },
}

/// Owns one room's world and moves between rooms on boundary, respawn and
/// finish events.
#[derive(Debug)]
pub struct GameState {
    config: SimConfig,
    quest: Quest,
    factory: EntityFactory,
    registry: EntityRegistry,
    physics: Physics,
    services: SimServices,
    state: RoomState,
    active_room: Option<usize>,
    theme: i32,
    restore_on_load: bool,
    resume_position: Option<Vec2>,
    checkpoint: SaveSlot,
    checkpoint_dirty: bool,
    camera: Vec2,
    debug_view: bool,
    debug_upgrade_granted: bool,
}

impl GameState {
    pub fn new(config: SimConfig, quest: Quest, factory: EntityFactory) -> Self {
        let state = RoomState::LoadRequested {
            room: config.start_room,
            transform: Vec2::ZERO,
        };
        Self {
            debug_view: config.debug_actors,
            config,
            quest,
            factory,
            registry: EntityRegistry::default(),
            physics: Physics::default(),
            services: SimServices::default(),
            state,
            active_room: None,
            theme: 0,
            restore_on_load: true,
            resume_position: None,
            checkpoint: SaveSlot::default(),
            checkpoint_dirty: false,
            camera: Vec2::ZERO,
            debug_upgrade_granted: false,
        }
    }

    /// Starts from a persisted checkpoint instead of the configured room.
    pub fn resume_from(mut self, slot: SaveSlot) -> Self {
        self.state = RoomState::LoadRequested {
            room: slot.room,
            transform: Vec2::ZERO,
        };
        self.resume_position = Some(slot.position);
        self.restore_on_load = true;
        self.checkpoint = slot;
        self
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn active_room(&self) -> Option<usize> {
        self.active_room
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    pub fn variables(&self) -> &VariableStore {
        &self.services.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.services.variables
    }

    pub fn post(&mut self, event: Event) {
        self.services.events.post(event);
    }

    pub fn checkpoint(&self) -> &SaveSlot {
        &self.checkpoint
    }

    /// Returns the checkpoint once after each save event.
    pub fn take_new_checkpoint(&mut self) -> Option<SaveSlot> {
        if !self.checkpoint_dirty {
            return None;
        }
        self.checkpoint_dirty = false;
        Some(self.checkpoint.clone())
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.services.player
    }

    pub fn player_position(&self) -> Option<Vec2> {
        let player = self.services.player?;
        self.registry.body(player).map(|body| body.pos)
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn tick_count(&self) -> u64 {
        self.services.tick
    }

    /// Advances the simulation by one fixed step.
    ///
    /// A failed room load is returned once; the request is cleared and the
    /// previous room stays authoritative.
    pub fn tick(
        &mut self,
        control: Control,
        audio: &mut dyn Audio,
        view: &mut dyn View,
    ) -> Result<TickOutcome, RoomLoadError> {
        if self.state == RoomState::Completed {
            return Ok(TickOutcome::Completed);
        }
        self.services.tick += 1;
        self.services.control = control;

        self.load_room_if_requested()?;
        self.update_debug_flag(control);

        self.registry.tick_all(&self.physics, &mut self.services);
        self.registry
            .dispatch_collisions(&self.physics, &mut self.services);
        self.registry
            .apply_interactions(&self.physics, &mut self.services);
        self.registry.integrate(&mut self.physics, &mut self.services);

        self.process_events();
        self.update_camera(view);
        flush_cues(self.services.take_cues(), audio, view);

        Ok(match self.state {
            RoomState::Completed => TickOutcome::Completed,
            _ => TickOutcome::Running,
        })
    }

    fn load_room_if_requested(&mut self) -> Result<(), RoomLoadError> {
        let RoomState::LoadRequested { room, transform } = self.state else {
            return Ok(());
        };
        match self.load_room(room, transform) {
            Ok(()) => Ok(()),
            Err(error) => {
                warn!(room, error = %error, "room_load_failed");
                self.state = match self.active_room {
                    Some(active) => RoomState::Active { room: active },
                    None => RoomState::NoRoom,
                };
                self.restore_on_load = false;
                Err(error)
            }
        }
    }

    /// Builds everything the new room needs before touching the old one.
    fn load_room(&mut self, room: usize, transform: Vec2) -> Result<(), RoomLoadError> {
        let descriptor = self
            .quest
            .room(room)
            .ok_or(RoomLoadError::NoSuchRoom {
                room,
                count: self.quest.room_count(),
            })?;

        let mut built = Vec::with_capacity(descriptor.spawners.len());
        for (index, spawner) in descriptor.spawners.iter().enumerate() {
            let call = parse_spawner_call(&spawner.name)
                .map_err(|source| RoomLoadError::MalformedSpawner { room, index, source })?;
            if !self.factory.contains(&call.name) {
                return Err(RoomLoadError::UnknownEntityType {
                    room,
                    index,
                    name: call.name,
                });
            }
            let config = EntityConfig::from_call(spawner.config.clone(), call.args);
            let mut entity = self.factory.create(&call.name, &config).map_err(|source| {
                RoomLoadError::InvalidEntityConfig {
                    room,
                    index,
                    name: call.name.clone(),
                    source,
                }
            })?;
            entity.body_mut().pos = spawner.pos;
            built.push((entity, persistent_tag(room, index)));
        }

        let new_player = match self.services.player {
            Some(_) => None,
            None => {
                let name = self.config.player_type.as_str();
                let player = self
                    .factory
                    .create(name, &EntityConfig::default())
                    .map_err(|source| RoomLoadError::Player {
                        name: name.to_string(),
                        source,
                    })?;
                Some(player)
            }
        };

        let tiles = descriptor.tiles.clone();
        let start = descriptor.start;
        let theme = descriptor.theme;
        let entity_count = built.len();

        let kept = self
            .registry
            .teardown(self.services.player, &mut self.physics, &mut self.services);
        self.services.interactions.clear();
        self.physics = Physics::new(tiles);

        if self.restore_on_load {
            self.services.variables.restore(&self.checkpoint.variables);
            self.restore_on_load = false;
        }

        for (entity, tag) in built {
            self.registry.spawn(entity, tag);
        }

        let created = kept.is_none();
        self.services.player = match kept.or(new_player) {
            Some(mut player) => {
                if created {
                    player.body_mut().pos = self.resume_position.take().unwrap_or(start);
                    self.services.events.post(Event::Save);
                }
                player.body_mut().pos += transform;
                Some(self.registry.spawn(player, 0))
            }
            None => {
                warn!(room, "room_loaded_without_player");
                None
            }
        };

        self.theme = theme;
        self.services.cues.push(Cue::Music(theme));
        self.services.cues.push(Cue::AmbientLight(0.0));
        self.state = RoomState::Active { room };
        self.active_room = Some(room);
        info!(room, entity_count, theme, "room_loaded");
        Ok(())
    }

    fn update_debug_flag(&mut self, control: Control) {
        self.debug_view = self.config.debug_actors || control.is_down(InputAction::Debug);
        if !control.is_down(InputAction::Debug) || self.debug_upgrade_granted {
            return;
        }
        if let Some(player) = self.services.player {
            self.debug_upgrade_granted = true;
            self.services.interactions.push(QueuedInteraction {
                source: player,
                target: player,
                interaction: Interaction::GrantUpgrade(ALL_UPGRADES),
            });
            info!("debug_upgrades_granted");
        }
    }

    fn process_events(&mut self) {
        let events = self.services.events.drain();
        let counts = self.services.events.last_drain_counts();
        if counts.total > 0 {
            debug!(
                tick = self.services.tick,
                total = counts.total,
                boundary = counts.touch_level_boundary,
                save = counts.save,
                respawn = counts.respawn,
                finish = counts.finish_game,
                detector = counts.detector_touched,
                "events_drained"
            );
        }
        for event in &events {
            match event {
                Event::TouchLevelBoundary {
                    target_room,
                    transform,
                } => self.request_load(*target_room, *transform),
                Event::Save => self.save_checkpoint(),
                Event::Respawn => self.respawn(),
                Event::FinishGame => {
                    self.state = RoomState::Completed;
                    info!(tick = self.services.tick, "game_finished");
                }
                Event::DetectorTouched { which } => debug!(which, "detector_touched"),
            }
            self.registry
                .dispatch_event(event, &self.physics, &mut self.services);
        }
    }

    fn request_load(&mut self, room: usize, transform: Vec2) {
        if self.state == RoomState::Completed {
            return;
        }
        debug!(room, dx = transform.x, dy = transform.y, "room_load_requested");
        self.state = RoomState::LoadRequested { room, transform };
    }

    fn save_checkpoint(&mut self) {
        let (Some(room), Some(position)) = (self.active_room, self.player_position()) else {
            warn!("save_ignored_without_player");
            return;
        };
        self.checkpoint = SaveSlot {
            room,
            position,
            variables: self.services.variables.snapshot(),
        };
        self.checkpoint_dirty = true;
        info!(
            room,
            x = position.x,
            y = position.y,
            variables = self.checkpoint.variables.len(),
            "checkpoint_saved"
        );
    }

    fn respawn(&mut self) {
        let transform = match self.player_position() {
            Some(current) => self.checkpoint.position - current + RESPAWN_LIFT,
            None => Vec2::ZERO,
        };
        self.restore_on_load = true;
        info!(room = self.checkpoint.room, "respawn_requested");
        self.request_load(self.checkpoint.room, transform);
    }

    fn update_camera(&mut self, view: &mut dyn View) {
        let Some(player) = self.player_position() else {
            return;
        };
        let tiles = self.physics.tiles();
        let margin = self.config.camera_margin;
        self.camera = Vec2::new(
            clamp_to_field(player.x, margin, tiles.width() as f32),
            clamp_to_field(player.y + self.config.camera_offset_y, margin, tiles.height() as f32),
        );
        view.set_camera_pos(self.camera);
    }

    /// Everything the view should draw this frame.
    pub fn actors(&self) -> Vec<Actor> {
        let mut actors = Vec::new();

        let model = self.config.tile_model_base + self.theme.rem_euclid(8);
        self.physics.tiles().scan(|x, y, tile| {
            if tile == 0 {
                return;
            }
            let mut actor = Actor::new(Vec2::new(x as f32, y as f32), model);
            actor.action = tile;
            actor.z_order = -1;
            actors.push(actor);
        });

        let mut entity_actors = Vec::new();
        for id in self.registry.live_ids() {
            let Some(entity) = self.registry.get(*id) else {
                continue;
            };
            entity_actors.clear();
            entity.add_actors(&mut entity_actors);
            actors.extend_from_slice(&entity_actors);
            if self.debug_view {
                actors.push(self.debug_actor(entity));
            }
        }

        if let Some(health) = self.player_health() {
            let mut lifebar = Actor::new(Vec2::new(-7.0, 3.5), self.config.lifebar_model);
            lifebar.ratio = health;
            lifebar.scale = Size::new(0.8, 4.0);
            lifebar.screen_ref_frame = true;
            lifebar.z_order = 10;
            actors.push(lifebar);
        }
        actors
    }

    fn debug_actor(&self, entity: &dyn Entity) -> Actor {
        let body = entity.body();
        let mut actor = Actor::new(body.pos, self.config.debug_model);
        actor.scale = body.size;
        actor.z_order = 10;
        actor
    }

    fn player_health(&self) -> Option<f32> {
        let player = self.registry.get(self.services.player?)?;
        player.as_player().map(|player| player.health())
    }
}

/// Keeps the camera `margin` away from both field edges; centres it when the
/// field is too small for that.
fn clamp_to_field(value: f32, margin: f32, extent: f32) -> f32 {
    if extent < margin * 2.0 {
        extent * 0.5
    } else {
        value.clamp(margin, extent - margin)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::app::CueLog;
    use crate::content::{RoomDescriptor, Spawner};
    use crate::entity::{Capabilities, Context, Contact, EntityState, Player};
    use crate::world::{Body, CollisionGroups, TileField};

    type Log = Rc<RefCell<Vec<String>>>;

    struct TestPlayer {
        state: EntityState,
        log: Log,
        upgrades: i32,
    }

    impl Player for TestPlayer {
        fn health(&self) -> f32 {
            0.5
        }

        fn add_upgrade(&mut self, upgrade: i32, ctx: &mut Context<'_>) {
            self.upgrades |= upgrade;
            ctx.set_variable(crate::variables::UPGRADES_KEY, self.upgrades);
        }
    }

    impl Entity for TestPlayer {
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
            Capabilities::PLAYER
        }

        fn enter(&mut self, _ctx: &mut Context<'_>) {
            self.log.borrow_mut().push("player:enter".to_string());
        }

        fn leave(&mut self, _ctx: &mut Context<'_>) {
            self.log.borrow_mut().push("player:leave".to_string());
        }

        fn as_player(&self) -> Option<&dyn Player> {
            Some(self)
        }

        fn as_player_mut(&mut self) -> Option<&mut dyn Player> {
            Some(self)
        }
    }

    /// Posts a boundary event the first time the player touches it.
    struct Seam {
        state: EntityState,
        target: usize,
        transform: Vec2,
        touched: bool,
    }

    impl Entity for Seam {
        fn name(&self) -> &'static str {
            "seam"
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
                target_room: self.target,
                transform: self.transform,
            });
        }
    }

    fn factory(log: &Log) -> EntityFactory {
        let mut factory = EntityFactory::default();
        let player_log = Rc::clone(log);
        factory.register("player", move |_| {
            let mut body = Body::new(Size::new(0.5, 1.0));
            body.collision_group = CollisionGroups::PLAYER;
            Ok(Box::new(TestPlayer {
                state: EntityState::new(body),
                log: Rc::clone(&player_log),
                upgrades: 0,
            }) as Box<dyn Entity>)
        });
        factory.register("seam", |config| {
            let mut body = Body::new(Size::UNIT);
            body.collides_with = CollisionGroups::PLAYER;
            Ok(Box::new(Seam {
                state: EntityState::new(body),
                target: config.get_int("0", 0)? as usize,
                transform: Vec2::new(config.get_float("1", 0.0)?, 0.0),
                touched: false,
            }) as Box<dyn Entity>)
        });
        factory
    }

    fn room(width: u32, start: Vec2, spawners: Vec<Spawner>) -> RoomDescriptor {
        RoomDescriptor {
            tiles: TileField::filled(width, 20, 0),
            start,
            spawners,
            theme: 3,
        }
    }

    fn quest() -> Quest {
        Quest {
            rooms: vec![
                room(30, Vec2::new(2.0, 2.0), vec![Spawner::new("seam(1, -20)", Vec2::new(20.0, 2.0))]),
                room(30, Vec2::new(5.0, 5.0), Vec::new()),
            ],
        }
    }

    fn config() -> SimConfig {
        SimConfig {
            start_room: 0,
            ..SimConfig::default()
        }
    }

    fn step(game: &mut GameState, sink: &mut CueLog) -> Result<TickOutcome, RoomLoadError> {
        let mut view = CueLog::default();
        let outcome = game.tick(Control::empty(), sink, &mut view);
        sink.cues.extend(view.cues);
        sink.camera = view.camera;
        outcome
    }

    fn teleport_player(game: &mut GameState, pos: Vec2) {
        let id = game.player_id().expect("player");
        let player = game.registry.get_mut(id).expect("player entity");
        player.body_mut().pos = pos;
    }

    #[test]
    fn first_tick_builds_the_start_room_and_saves() {
        let log = Log::default();
        let mut game = GameState::new(config(), quest(), factory(&log));
        let mut sink = CueLog::default();

        assert_eq!(step(&mut game, &mut sink).expect("tick"), TickOutcome::Running);

        assert_eq!(game.state(), RoomState::Active { room: 0 });
        assert_eq!(game.player_position(), Some(Vec2::new(2.0, 2.0)));
        assert_eq!(game.registry().live_count(), 2);
        assert_eq!(game.checkpoint().room, 0);
        assert_eq!(game.checkpoint().position, Vec2::new(2.0, 2.0));
        assert!(game.take_new_checkpoint().is_some());
        assert!(game.take_new_checkpoint().is_none());
        assert_eq!(sink.cues, vec![Cue::Music(3), Cue::AmbientLight(0.0)]);
        assert_eq!(*log.borrow(), vec!["player:enter"]);
    }

    #[test]
    fn boundary_touch_transitions_exactly_once() {
        let log = Log::default();
        let mut game = GameState::new(config(), quest(), factory(&log));
        let mut sink = CueLog::default();
        step(&mut game, &mut sink).expect("load");

        teleport_player(&mut game, Vec2::new(20.2, 2.0));
        step(&mut game, &mut sink).expect("touch");
        assert_eq!(
            game.state(),
            RoomState::LoadRequested {
                room: 1,
                transform: Vec2::new(-20.0, 0.0)
            }
        );

        step(&mut game, &mut sink).expect("transition");
        assert_eq!(game.state(), RoomState::Active { room: 1 });
        let pos = game.player_position().expect("player");
        assert!((pos.x - 0.2).abs() < 1e-4);
        assert_eq!(
            *log.borrow(),
            vec!["player:enter", "player:leave", "player:enter"]
        );

        for _ in 0..5 {
            step(&mut game, &mut sink).expect("idle");
        }
        assert_eq!(game.state(), RoomState::Active { room: 1 });
    }

    #[test]
    fn failed_load_keeps_the_previous_room() {
        let log = Log::default();
        let mut game = GameState::new(config(), quest(), factory(&log));
        let mut sink = CueLog::default();
        step(&mut game, &mut sink).expect("load");
        let before = game.registry().live_count();

        game.post(Event::TouchLevelBoundary {
            target_room: 9,
            transform: Vec2::ZERO,
        });
        step(&mut game, &mut sink).expect("event tick");
        let error = step(&mut game, &mut sink).expect_err("bad room");

        assert!(matches!(error, RoomLoadError::NoSuchRoom { room: 9, count: 2 }));
        assert_eq!(game.state(), RoomState::Active { room: 0 });
        assert_eq!(game.registry().live_count(), before);
        assert!(step(&mut game, &mut sink).is_ok());
    }

    #[test]
    fn unknown_entity_types_fail_the_load() {
        let log = Log::default();
        let mut bad = quest();
        bad.rooms[1]
            .spawners
            .push(Spawner::new("dragon(3)", Vec2::ZERO));
        let mut game = GameState::new(config(), bad, factory(&log));
        let mut sink = CueLog::default();
        step(&mut game, &mut sink).expect("load");

        game.post(Event::TouchLevelBoundary {
            target_room: 1,
            transform: Vec2::ZERO,
        });
        step(&mut game, &mut sink).expect("event tick");
        let error = step(&mut game, &mut sink).expect_err("unknown type");

        assert!(matches!(
            error,
            RoomLoadError::UnknownEntityType { room: 1, index: 0, ref name } if name == "dragon"
        ));
        assert_eq!(game.state(), RoomState::Active { room: 0 });
    }

    #[test]
    fn respawn_restores_variables_and_checkpoint_position() {
        let log = Log::default();
        let mut game = GameState::new(config(), quest(), factory(&log));
        let mut sink = CueLog::default();
        step(&mut game, &mut sink).expect("load");
        game.variables_mut().set(42, 1);
        game.post(Event::Save);
        step(&mut game, &mut sink).expect("save");

        game.variables_mut().set(42, 7);
        game.variables_mut().set(43, 1);
        teleport_player(&mut game, Vec2::new(9.0, 4.0));
        game.post(Event::Respawn);
        step(&mut game, &mut sink).expect("respawn request");
        step(&mut game, &mut sink).expect("respawn load");

        assert_eq!(game.state(), RoomState::Active { room: 0 });
        assert_eq!(game.variables().peek(42), Some(1));
        assert_eq!(game.variables().peek(43), None);
        let pos = game.player_position().expect("player");
        assert!((pos.x - 2.0).abs() < 1e-4);
        assert!((pos.y - 2.01).abs() < 1e-4);
    }

    #[test]
    fn boundary_transition_keeps_variables() {
        let log = Log::default();
        let mut game = GameState::new(config(), quest(), factory(&log));
        let mut sink = CueLog::default();
        step(&mut game, &mut sink).expect("load");
        game.variables_mut().set(5, 3);

        game.post(Event::TouchLevelBoundary {
            target_room: 1,
            transform: Vec2::ZERO,
        });
        step(&mut game, &mut sink).expect("event tick");
        step(&mut game, &mut sink).expect("transition");

        assert_eq!(game.variables().peek(5), Some(3));
    }

    #[test]
    fn finish_game_completes_and_stays_completed() {
        let log = Log::default();
        let mut game = GameState::new(config(), quest(), factory(&log));
        let mut sink = CueLog::default();
        step(&mut game, &mut sink).expect("load");

        game.post(Event::FinishGame);
        assert_eq!(step(&mut game, &mut sink).expect("finish"), TickOutcome::Completed);
        assert_eq!(step(&mut game, &mut sink).expect("after"), TickOutcome::Completed);
        assert_eq!(game.state(), RoomState::Completed);
    }

    #[test]
    fn camera_is_clamped_to_the_field() {
        let log = Log::default();
        let mut game = GameState::new(config(), quest(), factory(&log));
        let mut sink = CueLog::default();
        step(&mut game, &mut sink).expect("load");

        assert_eq!(sink.camera, Some(Vec2::new(8.0, 8.0)));

        teleport_player(&mut game, Vec2::new(15.0, 11.0));
        step(&mut game, &mut sink).expect("move");
        assert_eq!(game.camera(), Vec2::new(15.0, 12.0));
    }

    #[test]
    fn small_fields_centre_the_camera() {
        assert_eq!(clamp_to_field(3.0, 8.0, 10.0), 5.0);
        assert_eq!(clamp_to_field(-4.0, 8.0, 30.0), 8.0);
        assert_eq!(clamp_to_field(29.0, 8.0, 30.0), 22.0);
    }

    #[test]
    fn actors_include_tiles_entities_and_lifebar() {
        let log = Log::default();
        let mut quest = quest();
        quest.rooms[0].tiles = TileField::from_rows(&["#..", "..."]).expect("tiles");
        let mut game = GameState::new(config(), quest, factory(&log));
        let mut sink = CueLog::default();
        step(&mut game, &mut sink).expect("load");

        let actors = game.actors();

        let tile = actors.iter().find(|actor| actor.z_order == -1).expect("tile");
        assert_eq!(tile.model, 103);
        assert_eq!(tile.pos, Vec2::new(0.0, 1.0));
        let lifebar = actors.iter().find(|actor| actor.screen_ref_frame).expect("lifebar");
        assert_eq!(lifebar.ratio, 0.5);
    }

    #[test]
    fn debug_button_grants_all_upgrades_once() {
        let log = Log::default();
        let mut game = GameState::new(config(), quest(), factory(&log));
        let mut sink = CueLog::default();
        step(&mut game, &mut sink).expect("load");

        let debug = Control::empty().with_action_down(InputAction::Debug, true);
        let mut view = CueLog::default();
        game.tick(debug, &mut sink, &mut view).expect("debug tick");

        assert_eq!(game.variables().peek(crate::variables::UPGRADES_KEY), Some(ALL_UPGRADES));
        let debug_actors = game
            .actors()
            .iter()
            .filter(|actor| actor.model == SimConfig::default().debug_model)
            .count();
        assert_eq!(debug_actors, 2);
    }
}
