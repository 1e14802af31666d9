use std::env;
use std::str::FromStr;

use tracing::warn;

use super::presentation::ModelId;

pub const START_ROOM_ENV_VAR: &str = "PLATFORMER_START_ROOM";
pub const DEBUG_ACTORS_ENV_VAR: &str = "PLATFORMER_DEBUG_ACTORS";

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub start_room: usize,
    /// Factory name used to create the player on the first load.
    pub player_type: String,
    /// Closest the camera centre may get to a field edge.
    pub camera_margin: f32,
    /// Added to the player position before clamping.
    pub camera_offset_y: f32,
    /// Tile actors use `tile_model_base + theme % 8`.
    pub tile_model_base: ModelId,
    pub debug_model: ModelId,
    pub lifebar_model: ModelId,
    pub debug_actors: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_room: 1,
            player_type: "player".to_string(),
            camera_margin: 8.0,
            camera_offset_y: 1.5,
            tile_model_base: 100,
            debug_model: 90,
            lifebar_model: 91,
            debug_actors: false,
        }
    }
}

impl SimConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|var| match env::var(var) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(err) => {
                warn!(env_var = var, error = %err, "unable to read env var; falling back to config");
                None
            }
        })
    }

    /// Overlays values produced by `lookup` for the known variables.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(room) = parse_override::<usize>(START_ROOM_ENV_VAR, lookup(START_ROOM_ENV_VAR)) {
            self.start_room = room;
        }
        if let Some(raw) = lookup(DEBUG_ACTORS_ENV_VAR) {
            match raw.trim() {
                "1" | "true" | "on" => self.debug_actors = true,
                "0" | "false" | "off" | "" => self.debug_actors = false,
                other => warn!(
                    env_var = DEBUG_ACTORS_ENV_VAR,
                    value = other,
                    "invalid flag value; falling back to config"
                ),
            }
        }
        self
    }
}

fn parse_override<T: FromStr>(var: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                env_var = var,
                value = raw.as_str(),
                "invalid env var value; falling back to config"
            );
            None
        }
    }
}
