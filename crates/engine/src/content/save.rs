use serde::{Deserialize, Serialize};

use crate::variables::VariableSnapshot;
use crate::world::Vec2;

/// Checkpoint captured on a save event and restored on respawn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaveSlot {
    pub room: usize,
    pub position: Vec2,
    pub variables: VariableSnapshot,
}
