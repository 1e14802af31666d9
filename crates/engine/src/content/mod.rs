mod factory;
mod quest;
mod save;

pub use factory::{
    parse_spawner_call, Constructor, EntityConfig, EntityFactory, FactoryError, SpawnerCall,
    SpawnerParseError,
};
pub use quest::{persistent_tag, Quest, RoomDescriptor, Spawner};
pub use save::SaveSlot;
