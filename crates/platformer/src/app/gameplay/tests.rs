use engine::{
    Control, Cue, CueLog, EntityConfig, Event, GameState, InputAction, Quest, RoomDescriptor,
    RoomState, SimConfig, Spawner, TickOutcome, TileField, Vec2, UPGRADES_KEY,
};

use super::{build_factory, sounds, upgrades};

const OPEN_ROOM: [&str; 5] = ["......", "......", "......", "......", "######"];

fn room(rows: &[&str], spawners: &[(&str, f32, f32)], theme: i32) -> RoomDescriptor {
    RoomDescriptor {
        tiles: TileField::from_rows(rows).expect("tiles"),
        start: Vec2::new(1.0, 1.0),
        spawners: spawners
            .iter()
            .map(|(name, x, y)| Spawner::new(*name, Vec2::new(*x, *y)))
            .collect(),
        theme,
    }
}

/// Room 0 is never visited; play starts in room 1.
fn game(rooms: Vec<RoomDescriptor>) -> GameState {
    let mut all = vec![room(&["#"], &[], 0)];
    all.extend(rooms);
    GameState::new(SimConfig::default(), Quest { rooms: all }, build_factory())
}

struct Harness {
    game: GameState,
    audio: CueLog,
    view: CueLog,
}

impl Harness {
    fn new(rooms: Vec<RoomDescriptor>) -> Self {
        Self {
            game: game(rooms),
            audio: CueLog::default(),
            view: CueLog::default(),
        }
    }

    fn run(&mut self, control: Control, ticks: usize) -> TickOutcome {
        let mut outcome = TickOutcome::Running;
        for _ in 0..ticks {
            outcome = self
                .game
                .tick(control, &mut self.audio, &mut self.view)
                .expect("tick");
        }
        outcome
    }

    fn run_until(
        &mut self,
        control: Control,
        limit: usize,
        done: impl Fn(&GameState) -> bool,
    ) -> bool {
        for _ in 0..limit {
            self.run(control, 1);
            if done(&self.game) {
                return true;
            }
        }
        false
    }

    fn player_pos(&self) -> Vec2 {
        self.game.player_position().expect("player")
    }

    fn health(&self) -> f32 {
        player_health(&self.game).expect("player")
    }

    fn live_names(&self) -> Vec<&'static str> {
        let registry = self.game.registry();
        registry
            .live_ids()
            .iter()
            .filter_map(|id| registry.get(*id))
            .map(|entity| entity.name())
            .collect()
    }

    fn all_cues(&mut self) -> Vec<Cue> {
        let mut cues = self.audio.take();
        cues.extend(self.view.take());
        cues
    }
}

fn player_health(game: &GameState) -> Option<f32> {
    let player = game.registry().get(game.player_id()?)?;
    player.as_player().map(|player| player.health())
}

fn hold(actions: &[InputAction]) -> Control {
    actions
        .iter()
        .fold(Control::empty(), |control, action| control.with_action_down(*action, true))
}

#[test]
fn every_registered_type_builds_with_defaults() {
    let factory = build_factory();
    for name in factory.names() {
        factory
            .create(name, &EntityConfig::default())
            .unwrap_or_else(|err| panic!("{name}: {err}"));
    }
    assert!(factory.contains("player"));
    assert!(factory.contains("room_boundary"));
}

#[test]
fn negative_boundary_target_is_a_config_error() {
    let mut harness = Harness::new(vec![room(&OPEN_ROOM, &[("room_boundary(-1)", 5.0, 1.0)], 0)]);
    let error = harness
        .game
        .tick(Control::empty(), &mut harness.audio, &mut harness.view)
        .expect_err("bad target");

    assert!(error.to_string().contains("room_boundary"), "{error}");
    assert_eq!(harness.game.state(), RoomState::NoRoom);
}

#[test]
fn spikes_kill_and_the_player_respawns_at_the_checkpoint() {
    let rows = ["......", "......", "......", "#.####"];
    let mut harness = Harness::new(vec![room(&rows, &[("spikes", 1.0, 0.0)], 0)]);
    harness.run(Control::empty(), 1);
    harness.game.variables_mut().set(42, 5);

    assert!(harness.run_until(Control::empty(), 20, |game| {
        player_health(game) == Some(0.0)
    }));
    assert!(harness.all_cues().contains(&Cue::Sound(sounds::DIE)));

    assert!(harness.run_until(Control::empty(), 200, |game| {
        player_health(game) == Some(1.0)
    }));
    harness.run(Control::empty(), 1);

    assert_eq!(harness.game.active_room(), Some(1));
    assert_eq!(harness.health(), 1.0);
    let pos = harness.player_pos();
    assert_eq!(pos.x, 1.0);
    assert!((pos.y - 1.01).abs() < 0.005, "{pos:?}");
    assert_eq!(harness.game.variables().peek(42), None);
}

#[test]
fn pickup_is_one_shot_and_survives_room_changes() {
    let first = room(
        &OPEN_ROOM,
        &[("upgrade_whip", 3.0, 1.0), ("room_boundary(2, -4, 0)", 5.0, 1.0)],
        0,
    );
    let second = room(&OPEN_ROOM, &[], 7);
    let mut harness = Harness::new(vec![first, second]);

    assert!(harness.run_until(hold(&[InputAction::Right]), 120, |game| {
        game.active_room() == Some(2)
    }));
    let cues = harness.all_cues();
    assert!(cues.contains(&Cue::TextBox("You got the WHIP (press Z)".to_string())));
    assert_eq!(cues.iter().filter(|cue| **cue == Cue::Music(7)).count(), 1);
    assert_eq!(harness.game.variables().peek(UPGRADES_KEY), Some(upgrades::WHIP));
    assert_eq!(harness.game.variables().peek(1001), Some(1));
    assert!(harness.player_pos().x < 2.0);

    harness.game.post(Event::TouchLevelBoundary {
        target_room: 1,
        transform: Vec2::ZERO,
    });
    harness.run(Control::empty(), 3);

    assert_eq!(harness.game.active_room(), Some(1));
    assert!(!harness.live_names().contains(&"bonus"));
    assert_eq!(harness.game.variables().peek(UPGRADES_KEY), Some(upgrades::WHIP));
}

#[test]
fn respawn_brings_back_pickups_taken_since_the_checkpoint() {
    let mut harness = Harness::new(vec![room(&OPEN_ROOM, &[("upgrade_whip", 3.0, 1.0)], 0)]);

    assert!(harness.run_until(hold(&[InputAction::Right]), 60, |game| {
        game.variables().peek(UPGRADES_KEY) == Some(upgrades::WHIP)
    }));
    harness.game.post(Event::Respawn);
    harness.run(Control::empty(), 3);

    assert!(harness.live_names().contains(&"bonus"));
    assert_eq!(harness.game.variables().peek(UPGRADES_KEY).unwrap_or(0), 0);
}

#[test]
fn detector_opens_the_matching_door() {
    let rows = ["........", "........", "........", "........", "########"];
    let mut harness = Harness::new(vec![room(
        &rows,
        &[("detector(5)", 3.0, 1.0), ("door(5)", 5.0, 1.0), ("door(6)", 7.0, 1.0)],
        0,
    )]);

    assert!(harness.run_until(hold(&[InputAction::Right]), 120, |game| {
        game.player_position().map_or(false, |pos| pos.x > 5.5)
    }));
    assert_eq!(
        harness.live_names().iter().filter(|name| **name == "door").count(),
        1
    );
    assert_eq!(harness.game.variables().peek(1002), Some(1));
    assert!(harness.all_cues().contains(&Cue::Sound(sounds::SWITCH)));

    // The remaining door blocks the way.
    harness.run(hold(&[InputAction::Right]), 60);
    assert!(harness.player_pos().x < 6.2);
}

#[test]
fn conveyor_carries_a_standing_player() {
    let rows = ["......", "......", "......", "#.####"];
    let mut harness = Harness::new(vec![room(&rows, &[("conveyor", 1.0, 0.0)], 0)]);

    harness.run(Control::empty(), 51);

    let pos = harness.player_pos();
    assert!(pos.x < 0.85, "{pos:?}");
    assert_eq!(pos.y, 1.0);
}

#[test]
fn standing_player_stays_on_the_floor_and_can_walk_off() {
    let mut harness = Harness::new(vec![room(&OPEN_ROOM, &[], 0)]);

    harness.run(Control::empty(), 200);
    assert_eq!(harness.player_pos().y, 1.0);

    harness.run(hold(&[InputAction::Right]), 20);
    let pos = harness.player_pos();
    assert!(pos.x > 2.0, "{pos:?}");
    assert_eq!(pos.y, 1.0);
}

#[test]
fn ladders_need_the_climb_upgrade() {
    let rows = ["......", "......", "......", "......", "......", "######"];
    let mut harness = Harness::new(vec![room(
        &rows,
        &[("ladder", 1.0, 1.0), ("ladder", 1.0, 2.0), ("ladder", 1.0, 3.0)],
        0,
    )]);

    harness.run(hold(&[InputAction::Up]), 10);
    assert_eq!(harness.player_pos().y, 1.0);

    harness.run(hold(&[InputAction::Debug]), 1);
    harness.run(hold(&[InputAction::Up]), 20);
    assert!(harness.player_pos().y > 2.0, "{:?}", harness.player_pos());
}

#[test]
fn whip_needs_its_upgrade() {
    let mut harness = Harness::new(vec![room(&OPEN_ROOM, &[], 0)]);
    harness.run(Control::empty(), 2);

    harness.run(hold(&[InputAction::Fire]), 1);
    harness.run(Control::empty(), 1);
    assert!(!harness.live_names().contains(&"whip_hit"));

    harness.run(hold(&[InputAction::Debug]), 1);
    harness.run(hold(&[InputAction::Fire]), 1);
    assert!(harness.live_names().contains(&"whip_hit"));
    assert!(harness.all_cues().contains(&Cue::Sound(sounds::FIRE)));

    harness.run(Control::empty(), 20);
    assert!(!harness.live_names().contains(&"whip_hit"));
}

#[test]
fn whip_kills_a_skeleton_and_leaves_remains() {
    // The skeleton is walled in so it cannot reach the player.
    let rows = ["......", "...#.#", "...#.#", "...#.#", "######"];
    let mut harness = Harness::new(vec![room(&rows, &[("skeleton", 4.0, 1.0)], 0)]);
    harness.run(Control::empty(), 2);
    harness.run(hold(&[InputAction::Debug]), 1);
    harness.all_cues();

    let mut swings = 0;
    while harness.live_names().contains(&"skeleton") && swings < 6 {
        harness.run(hold(&[InputAction::Fire]), 1);
        harness.run(Control::empty(), 19);
        swings += 1;
    }

    assert_eq!(swings, 4);
    assert!(harness.live_names().contains(&"cadaver"));
    let cues = harness.all_cues();
    assert_eq!(cues.iter().filter(|cue| **cue == Cue::Sound(sounds::HURT_ENEMY)).count(), 4);
    assert_eq!(cues.iter().filter(|cue| **cue == Cue::Sound(sounds::DIE_ENEMY)).count(), 1);

    harness.run(Control::empty(), 100);
    assert!(!harness.live_names().contains(&"cadaver"));
}

#[test]
fn skeleton_walking_into_the_player_hurts_once() {
    let mut harness = Harness::new(vec![room(&OPEN_ROOM, &[("skeleton", 4.0, 1.0)], 0)]);

    assert!(harness.run_until(Control::empty(), 160, |game| {
        player_health(game).map_or(false, |health| health < 1.0)
    }));
    let hurt = harness.health();
    assert!((hurt - 11.0 / 31.0).abs() < 1e-6, "{hurt}");
    assert!(harness.all_cues().contains(&Cue::Sound(sounds::HURT)));

    // Blinking keeps the player out of SOLIDPLAYER while they overlap.
    harness.run(Control::empty(), 50);
    assert_eq!(harness.health(), hurt);
}

#[test]
fn locked_chest_finishes_once_the_key_is_held() {
    let mut harness = Harness::new(vec![room(&OPEN_ROOM, &[("chest(4)", 3.0, 1.0)], 0)]);

    harness.run(hold(&[InputAction::Right]), 20);
    harness.run(Control::empty(), 5);
    assert_eq!(harness.game.state(), RoomState::Active { room: 1 });
    assert!(harness
        .all_cues()
        .contains(&Cue::TextBox("The chest is locked.".to_string())));

    // The grant leaves the player blinking, without SOLIDPLAYER.
    harness.run(hold(&[InputAction::Debug]), 1);
    assert_eq!(harness.run(Control::empty(), 2), TickOutcome::Completed);
    assert_eq!(harness.game.state(), RoomState::Completed);
}
