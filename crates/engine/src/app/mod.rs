mod config;
mod input;
mod presentation;
mod state;

pub use config::{SimConfig, DEBUG_ACTORS_ENV_VAR, START_ROOM_ENV_VAR};
pub use input::{Control, InputAction, Toggle};
pub use presentation::{Actor, Audio, Cue, CueLog, Effect, ModelId, MusicId, SoundId, View};
pub use state::{GameState, RoomLoadError, RoomState, TickOutcome, ALL_UPGRADES};
