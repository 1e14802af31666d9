use std::env;
use std::path::PathBuf;

use engine::SimConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::script::{InputScript, ScriptError};

const QUEST_ENV_VAR: &str = "PLATFORMER_QUEST";
const SAVE_ENV_VAR: &str = "PLATFORMER_SAVE";
const TICKS_ENV_VAR: &str = "PLATFORMER_TICKS";
const SCRIPT_ENV_VAR: &str = "PLATFORMER_SCRIPT";

const DEFAULT_QUEST_PATH: &str = "assets/quest.json";
const DEFAULT_SAVE_PATH: &str = "saves/slot.json";
const DEFAULT_MAX_TICKS: u64 = 3600;

pub(crate) struct AppWiring {
    pub(crate) config: SimConfig,
    pub(crate) quest_path: PathBuf,
    pub(crate) save_path: PathBuf,
    pub(crate) max_ticks: u64,
    pub(crate) script: Result<InputScript, ScriptError>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Platformer Startup ===");

    let wiring = AppWiring {
        config: SimConfig::from_env(),
        quest_path: path_from_env(QUEST_ENV_VAR, DEFAULT_QUEST_PATH),
        save_path: path_from_env(SAVE_ENV_VAR, DEFAULT_SAVE_PATH),
        max_ticks: parse_max_ticks_from_env(),
        script: InputScript::parse(&env::var(SCRIPT_ENV_VAR).unwrap_or_default()),
    };
    info!(
        quest = %wiring.quest_path.display(),
        save = %wiring.save_path.display(),
        max_ticks = wiring.max_ticks,
        start_room = wiring.config.start_room,
        "app_wired"
    );
    wiring
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn path_from_env(var: &str, default: &str) -> PathBuf {
    env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn parse_max_ticks_from_env() -> u64 {
    let Ok(raw) = env::var(TICKS_ENV_VAR) else {
        return DEFAULT_MAX_TICKS;
    };
    match raw.trim().parse::<u64>() {
        Ok(ticks) if ticks > 0 => ticks,
        _ => {
            warn!(
                env_var = TICKS_ENV_VAR,
                value = raw.as_str(),
                "invalid env var value; falling back to default"
            );
            DEFAULT_MAX_TICKS
        }
    }
}
