use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::SaveSlot;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub(crate) enum SaveSlotError {
    #[error("read save '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("write save '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("encode save json: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("parse save json at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed at {path}: {message}")]
    Invalid { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SaveFile {
    save_version: u32,
    slot: SaveSlot,
}

/// Reads the slot at `path`; `Ok(None)` when no save exists yet.
pub(crate) fn load_slot(path: &Path) -> Result<Option<SaveSlot>, SaveSlotError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SaveSlotError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };
    let save = parse_save(&raw)?;
    validate(&save)?;
    Ok(Some(save.slot))
}

pub(crate) fn store_slot(path: &Path, slot: &SaveSlot) -> Result<(), SaveSlotError> {
    let save = SaveFile {
        save_version: SAVE_VERSION,
        slot: slot.clone(),
    };
    let json = serde_json::to_string_pretty(&save).map_err(SaveSlotError::Encode)?;
    replace_contents(path, &json).map_err(|source| SaveSlotError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn parse_save(raw: &str) -> Result<SaveFile, SaveSlotError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        SaveSlotError::Parse {
            path,
            source: error.into_inner(),
        }
    })
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> SaveSlotError {
    SaveSlotError::Invalid {
        path: path.to_string(),
        message: format!("expected {expected}, got {actual}"),
    }
}

fn validate(save: &SaveFile) -> Result<(), SaveSlotError> {
    if save.save_version != SAVE_VERSION {
        return Err(expected_actual(
            "save_version",
            SAVE_VERSION,
            save.save_version,
        ));
    }
    let position = save.slot.position;
    if !position.x.is_finite() {
        return Err(expected_actual("slot.position.x", "finite number", position.x));
    }
    if !position.y.is_finite() {
        return Err(expected_actual("slot.position.y", "finite number", position.y));
    }
    Ok(())
}

/// Writes a sibling `.tmp` file and renames it over `path`, so a reader never
/// sees a half-written save.
fn replace_contents(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let staging = staging_path(path);
    fs::write(&staging, text)?;
    if let Err(error) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(error);
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "save.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
