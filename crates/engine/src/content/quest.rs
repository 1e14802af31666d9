use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::world::{TileField, Vec2};

/// A named entity placement inside a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Call syntax: `name`, `name(a,b)`, `name("quoted")`.
    pub name: String,
    pub pos: Vec2,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl Spawner {
    pub fn new(name: impl Into<String>, pos: Vec2) -> Self {
        Self {
            name: name.into(),
            pos,
            config: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoomDescriptor {
    pub tiles: TileField,
    pub start: Vec2,
    pub spawners: Vec<Spawner>,
    pub theme: i32,
}

/// Ordered room list. Rooms are addressed by index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quest {
    pub rooms: Vec<RoomDescriptor>,
}

impl Quest {
    pub fn room(&self, index: usize) -> Option<&RoomDescriptor> {
        self.rooms.get(index)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

/// Spawner `index` of room `room` gets a tag unique across the quest and
/// distinct from [`RUNTIME_TAG`](crate::entity::RUNTIME_TAG).
pub fn persistent_tag(room: usize, index: usize) -> i32 {
    let tag = room.saturating_mul(1000).saturating_add(index).saturating_add(1);
    i32::try_from(tag).unwrap_or(i32::MAX)
}
