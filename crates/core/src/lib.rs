pub mod config;
pub mod difficulty;
pub mod dungeon;
pub mod rng;
pub mod run;
pub mod telemetry;
pub mod types;

pub use config::{ConfigError, DifficultyConfig, GeneBounds, GenerationConfig, RunConfig};
pub use difficulty::{
    DifficultyChromosome, DifficultyEngine, DifficultyError, DifficultyPopulation, EnemyLoadout,
    LevelSummary, WeaponStats, GENE_COUNT, HEALTH_FLOOR, MODIFIER_FLOOR,
};
pub use dungeon::{
    AnchorKind, CoverSpot, DungeonGenerator, DungeonGraph, GeneratedDungeon, GenerationError,
    GenerationPhase, Link, LinkEnd, MainRoomData, Room, RoomKind, SideRoomData,
};
pub use rng::RunRng;
pub use run::{ClusterSpawn, RoomClearance, Run, RunError, TeleportOutcome};
pub use telemetry::{CombatTelemetry, RoomCombatSample, WeaponClass};
pub use types::*;
