use std::process::ExitCode;

use engine::{Audio, GameState, MusicId, RoomLoadError, SoundId, TickOutcome, Vec2, View};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::bootstrap::AppWiring;
use super::gameplay;
use super::persistence::{load_slot, store_slot, SaveSlotError};
use super::quest_file::{load_quest, QuestLoadError};
use super::script::ScriptError;

#[derive(Debug, Error)]
pub(crate) enum RunError {
    #[error(transparent)]
    Quest(#[from] QuestLoadError),
    #[error(transparent)]
    Save(#[from] SaveSlotError),
    #[error("input script: {0}")]
    Script(#[from] ScriptError),
    #[error("first room failed to load: {0}")]
    FirstRoom(#[source] RoomLoadError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) ticks: u64,
    pub(crate) completed: bool,
    pub(crate) room: Option<usize>,
    pub(crate) saves: u32,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    match run_headless(app) {
        Ok(summary) => {
            info!(
                ticks = summary.ticks,
                completed = summary.completed,
                room = ?summary.room,
                saves = summary.saves,
                "run_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}

fn run_headless(app: AppWiring) -> Result<RunSummary, RunError> {
    let script = app.script?;
    if script.len_ticks() > 0 {
        info!(ticks = script.len_ticks(), "input_script_loaded");
    }
    let quest = load_quest(&app.quest_path)?;
    info!(rooms = quest.room_count(), "quest_loaded");

    let mut game = GameState::new(app.config, quest, gameplay::build_factory());
    if let Some(slot) = load_slot(&app.save_path)? {
        info!(room = slot.room, "save_resumed");
        game = game.resume_from(slot);
    }

    let mut audio = LoggedAudio;
    let mut view = LoggedView::default();
    let mut summary = RunSummary {
        ticks: 0,
        completed: false,
        room: None,
        saves: 0,
    };

    for tick in 0..app.max_ticks {
        let control = script.control_at(tick);
        let outcome = match game.tick(control, &mut audio, &mut view) {
            Ok(outcome) => outcome,
            Err(err) if game.active_room().is_none() => return Err(RunError::FirstRoom(err)),
            Err(err) => {
                warn!(error = %err, "room_change_rejected");
                TickOutcome::Running
            }
        };
        summary.ticks = tick + 1;

        if let Some(slot) = game.take_new_checkpoint() {
            store_slot(&app.save_path, &slot)?;
            summary.saves += 1;
        }
        if outcome == TickOutcome::Completed {
            summary.completed = true;
            break;
        }
    }

    summary.room = game.active_room();
    Ok(summary)
}

/// Stands in for a mixer when running without a window.
struct LoggedAudio;

impl Audio for LoggedAudio {
    fn play_sound(&mut self, sound: SoundId) {
        debug!(sound, "play_sound");
    }

    fn play_music(&mut self, music: MusicId) {
        debug!(music, "play_music");
    }

    fn stop_music(&mut self) {
        debug!("stop_music");
    }
}

#[derive(Default)]
struct LoggedView {
    camera: Vec2,
}

impl View for LoggedView {
    fn set_camera_pos(&mut self, pos: Vec2) {
        self.camera = pos;
    }

    fn text_box(&mut self, message: &str) {
        info!(text = message, "text_box");
    }

    fn set_ambient_light(&mut self, amount: f32) {
        debug!(amount, x = self.camera.x, y = self.camera.y, "ambient_light");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use engine::SimConfig;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::app::script::InputScript;

    fn quest_json() -> String {
        json!({
            "rooms": [
                { "tiles": ["#"], "start": { "x": 0, "y": 0 } },
                {
                    "tiles": [".....", ".....", ".....", "#####"],
                    "start": { "x": 1, "y": 1 },
                    "spawners": [{ "name": "chest", "pos": { "x": 3, "y": 1 } }]
                }
            ]
        })
        .to_string()
    }

    fn wiring(dir: &TempDir, script: &str, max_ticks: u64) -> AppWiring {
        let quest_path = dir.path().join("quest.json");
        fs::write(&quest_path, quest_json()).expect("write quest");
        AppWiring {
            config: SimConfig::default(),
            quest_path,
            save_path: dir.path().join("saves").join("slot.json"),
            max_ticks,
            script: InputScript::parse(script),
        }
    }

    #[test]
    fn walking_into_the_chest_completes_and_saves() {
        let dir = TempDir::new().expect("temp dir");
        let app = wiring(&dir, "right*600", 600);
        let save_path = app.save_path.clone();

        let summary = run_headless(app).expect("run");

        assert!(summary.completed);
        assert!(summary.ticks < 600);
        assert_eq!(summary.saves, 1);
        assert_eq!(summary.room, Some(1));
        let slot = load_slot(&save_path).expect("load").expect("slot");
        assert_eq!(slot.room, 1);
        assert_eq!(slot.position, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn idle_run_stops_at_the_tick_limit() {
        let dir = TempDir::new().expect("temp dir");
        let summary = run_headless(wiring(&dir, "", 30)).expect("run");

        assert_eq!(summary.ticks, 30);
        assert!(!summary.completed);
    }

    #[test]
    fn missing_quest_fails_before_ticking() {
        let dir = TempDir::new().expect("temp dir");
        let mut app = wiring(&dir, "", 30);
        app.quest_path = dir.path().join("missing.json");

        assert!(matches!(run_headless(app), Err(RunError::Quest(_))));
    }

    #[test]
    fn bad_start_room_is_fatal() {
        let dir = TempDir::new().expect("temp dir");
        let mut app = wiring(&dir, "", 30);
        app.config.start_room = 7;

        assert!(matches!(
            run_headless(app),
            Err(RunError::FirstRoom(RoomLoadError::NoSuchRoom { room: 7, .. }))
        ));
    }
}
