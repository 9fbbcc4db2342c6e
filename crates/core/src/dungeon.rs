//! Procedural dungeon domain split into coherent submodules.

pub mod model;

mod generator;
mod graph;
mod layout;
mod populate;

pub use generator::{DungeonGenerator, GenerationError, GenerationPhase};
pub use graph::DungeonGraph;
pub use model::{
    AnchorKind, CoverSpot, GeneratedDungeon, Link, LinkEnd, MainRoomData, Room, RoomKind,
    SideRoomData,
};

use crate::config::GenerationConfig;
use crate::rng::RunRng;
use crate::types::LogEvent;

pub fn generate_dungeon(
    config: &GenerationConfig,
    rng: &mut RunRng,
    log: &mut Vec<LogEvent>,
) -> Result<GeneratedDungeon, GenerationError> {
    DungeonGenerator::new().generate(config, rng, log)
}
