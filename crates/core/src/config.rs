//! Caller-facing configuration surface. Loaded externally (any serde format),
//! validated once at run construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of combat rooms in the main chain, excluding the start and end anchors.
    pub main_room_count: usize,
    pub min_main_room_size: i32,
    pub max_main_room_size: i32,
    /// Side length of the fixed-size start/end anchors and side rooms.
    pub anchor_room_size: i32,
    /// Placement step between room centers is `max_main_room_size + corridor_margin`.
    pub corridor_margin: i32,
    /// Per-direction probability of branching a side room off a main room.
    pub side_room_probability: f32,
    pub max_enemies_per_room: usize,
    /// Direction draws allowed per placement before generation fails.
    pub placement_retry_limit: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            main_room_count: 5,
            min_main_room_size: 14,
            max_main_room_size: 20,
            anchor_room_size: 10,
            corridor_margin: 10,
            side_room_probability: 0.25,
            max_enemies_per_room: 5,
            placement_retry_limit: 64,
        }
    }
}

/// Sampling ranges for fresh chromosomes, each half-open `[min, max)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneBounds {
    pub health_min: i32,
    pub health_max: i32,
    pub attack_range_min: f32,
    pub attack_range_max: f32,
    pub accuracy_min: f32,
    pub accuracy_max: f32,
    pub damage_min: f32,
    pub damage_max: f32,
}

impl Default for GeneBounds {
    fn default() -> Self {
        Self {
            health_min: 100,
            health_max: 300,
            attack_range_min: 0.7,
            attack_range_max: 1.4,
            accuracy_min: 0.5,
            accuracy_max: 1.5,
            damage_min: 0.7,
            damage_max: 1.4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub population_size: usize,
    /// Fittest chromosomes cloned verbatim into the next generation.
    pub elitism_count: usize,
    pub crossover_rate: f32,
    pub mutation_rate: f32,
    /// How quickly fairness decays as observed effectiveness leaves the expected band.
    pub fairness_scaling: f32,
    /// When false the initial population is reused unchanged across levels.
    pub dynamic: bool,
    /// Combined health + armour pool the effectiveness fraction is measured against.
    pub player_resource_pool: f32,
    pub gene_bounds: GeneBounds,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            population_size: 5,
            elitism_count: 1,
            crossover_rate: 0.8,
            mutation_rate: 0.3,
            fairness_scaling: 1.5,
            dynamic: true,
            player_resource_pool: 600.0,
            gene_bounds: GeneBounds::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub generation: GenerationConfig,
    pub difficulty: DifficultyConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("population size must be at least 1")]
    EmptyPopulation,
    #[error("elitism count {elitism} must be between 1 and population size {population}")]
    ElitismOutOfRange { elitism: usize, population: usize },
    #[error("gene range for {gene} is empty or inverted")]
    InvalidGeneBounds { gene: &'static str },
    #[error("main room size range [{min}, {max}) is empty")]
    InvalidRoomSizeRange { min: i32, max: i32 },
    #[error("{field} must lie within [0, 1]")]
    ProbabilityOutOfRange { field: &'static str },
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        self.difficulty.validate()
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.main_room_count == 0 {
            return Err(ConfigError::NonPositive { field: "main_room_count" });
        }
        // The populator samples a quarter-extent grid around the room center,
        // which needs at least a 4-wide room to be non-degenerate.
        if self.min_main_room_size < 4 || self.min_main_room_size >= self.max_main_room_size {
            return Err(ConfigError::InvalidRoomSizeRange {
                min: self.min_main_room_size,
                max: self.max_main_room_size,
            });
        }
        if self.anchor_room_size < 2 {
            return Err(ConfigError::NonPositive { field: "anchor_room_size" });
        }
        if self.corridor_margin < 0 {
            return Err(ConfigError::NonPositive { field: "corridor_margin" });
        }
        if !(0.0..=1.0).contains(&self.side_room_probability) {
            return Err(ConfigError::ProbabilityOutOfRange { field: "side_room_probability" });
        }
        if self.max_enemies_per_room == 0 {
            return Err(ConfigError::NonPositive { field: "max_enemies_per_room" });
        }
        if self.placement_retry_limit == 0 {
            return Err(ConfigError::NonPositive { field: "placement_retry_limit" });
        }
        Ok(())
    }
}

impl DifficultyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.elitism_count == 0 || self.elitism_count > self.population_size {
            return Err(ConfigError::ElitismOutOfRange {
                elitism: self.elitism_count,
                population: self.population_size,
            });
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::ProbabilityOutOfRange { field: "crossover_rate" });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::ProbabilityOutOfRange { field: "mutation_rate" });
        }
        if self.fairness_scaling <= 0.0 {
            return Err(ConfigError::NonPositive { field: "fairness_scaling" });
        }
        if self.player_resource_pool <= 0.0 {
            return Err(ConfigError::NonPositive { field: "player_resource_pool" });
        }
        self.gene_bounds.validate()
    }
}

impl GeneBounds {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.health_min >= self.health_max {
            return Err(ConfigError::InvalidGeneBounds { gene: "enemy_health" });
        }
        if self.attack_range_min >= self.attack_range_max {
            return Err(ConfigError::InvalidGeneBounds { gene: "attack_range_modifier" });
        }
        if self.accuracy_min >= self.accuracy_max {
            return Err(ConfigError::InvalidGeneBounds { gene: "accuracy_modifier" });
        }
        if self.damage_min >= self.damage_max {
            return Err(ConfigError::InvalidGeneBounds { gene: "damage_modifier" });
        }
        Ok(())
    }
}
