//! Adaptive difficulty domain: genome, population, and room binding.

mod chromosome;
mod engine;
mod population;

pub use chromosome::{
    DifficultyChromosome, EnemyLoadout, WeaponStats, GENE_COUNT, HEALTH_FLOOR, MODIFIER_FLOOR,
};
pub use engine::{DifficultyEngine, DifficultyError, LevelSummary};
pub use population::DifficultyPopulation;
