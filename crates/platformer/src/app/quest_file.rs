use std::fs;
use std::path::Path;

use engine::{Quest, RoomDescriptor, Spawner, TileField, TileFieldError, Vec2};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum QuestLoadError {
    #[error("read quest '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse quest json at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("rooms[{room}].tiles: {source}")]
    Tiles {
        room: usize,
        #[source]
        source: TileFieldError,
    },
    #[error("quest has no rooms")]
    Empty,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestFile {
    rooms: Vec<RoomFile>,
}

/// Tile rows are listed top row first.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoomFile {
    tiles: Vec<String>,
    start: Vec2,
    #[serde(default)]
    theme: i32,
    #[serde(default)]
    spawners: Vec<Spawner>,
}

pub(crate) fn load_quest(path: &Path) -> Result<Quest, QuestLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| QuestLoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_quest(&raw)
}

pub(crate) fn parse_quest(raw: &str) -> Result<Quest, QuestLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let file: QuestFile =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let path = error.path().to_string();
            QuestLoadError::Parse {
                path,
                source: error.into_inner(),
            }
        })?;
    if file.rooms.is_empty() {
        return Err(QuestLoadError::Empty);
    }

    let mut rooms = Vec::with_capacity(file.rooms.len());
    for (index, room) in file.rooms.into_iter().enumerate() {
        let tiles = TileField::from_rows(&room.tiles)
            .map_err(|source| QuestLoadError::Tiles { room: index, source })?;
        rooms.push(RoomDescriptor {
            tiles,
            start: room.start,
            spawners: room.spawners,
            theme: room.theme,
        });
    }
    Ok(Quest { rooms })
}
