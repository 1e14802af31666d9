pub mod app;
pub mod content;
pub mod entity;
pub mod events;
pub mod physics;
pub mod variables;
pub mod world;

pub use app::{
    Actor, Audio, Control, Cue, CueLog, Effect, GameState, InputAction, ModelId, MusicId,
    RoomLoadError, RoomState, SimConfig, SoundId, TickOutcome, Toggle, View, ALL_UPGRADES,
};
pub use content::{
    parse_spawner_call, EntityConfig, EntityFactory, FactoryError, Quest, RoomDescriptor,
    SaveSlot, Spawner, SpawnerParseError,
};
pub use entity::{
    Capabilities, Contact, Context, Damageable, Entity, EntityId, EntityState, Interaction,
    Player,
};
pub use events::{Event, EventBus};
pub use physics::{BodyLookup, Physics};
pub use variables::{ObserverHandle, VariableSnapshot, VariableStore, UPGRADES_KEY};
pub use world::{
    Body, CollisionGroups, IntBox, Rect, Size, SlideResult, TileField, TileFieldError, Vec2,
    PRECISION,
};
