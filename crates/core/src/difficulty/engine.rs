//! Binds one chromosome to each main room's cluster and routes fairness
//! feedback into the population between rooms and levels.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::DifficultyConfig;
use crate::rng::RunRng;
use crate::telemetry::RoomCombatSample;
use crate::types::{LogEvent, RoomId};

use super::chromosome::DifficultyChromosome;
use super::population::DifficultyPopulation;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DifficultyError {
    /// Fairness feedback arrived for a room with no bound chromosome; the
    /// caller sequenced room events incorrectly.
    #[error("no chromosome bound to room {room:?}")]
    UnboundChromosome { room: RoomId },
}

/// Per-level digest for the caller's analytics layer; nothing is transmitted
/// by the core itself.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelSummary {
    pub average_fairness: f32,
    pub best_fairness: f32,
    pub fairest: DifficultyChromosome,
}

pub struct DifficultyEngine {
    population: DifficultyPopulation,
    dynamic: bool,
    bindings: BTreeMap<RoomId, usize>,
}

impl DifficultyEngine {
    pub fn new(config: &DifficultyConfig, rng: &mut RunRng) -> Self {
        Self {
            population: DifficultyPopulation::initialise(config, rng),
            dynamic: config.dynamic,
            bindings: BTreeMap::new(),
        }
    }

    /// Use a caller-authored static population instead of sampling one.
    pub fn with_population(config: &DifficultyConfig, population: DifficultyPopulation) -> Self {
        Self { population, dynamic: config.dynamic, bindings: BTreeMap::new() }
    }

    pub fn population(&self) -> &DifficultyPopulation {
        &self.population
    }

    /// Advance to the next generation at a level boundary. With dynamic
    /// difficulty off the static population is reused unchanged.
    pub fn advance_generation(
        &mut self,
        config: &DifficultyConfig,
        rng: &mut RunRng,
        log: &mut Vec<LogEvent>,
    ) {
        if !self.dynamic {
            return;
        }
        self.population = self.population.evolve(config, rng);
        log.push(LogEvent::PopulationEvolved {
            generation: self.population.generation(),
            elites_retained: config.elitism_count,
        });
    }

    /// Bind one chromosome per main room for the lifetime of its cluster.
    /// Population order was shuffled during evolution, so this straight zip
    /// is already uncorrelated with fitness rank. With more rooms than
    /// chromosomes the assignment wraps.
    pub fn assign_rooms(&mut self, main_chain: &[RoomId]) {
        self.bindings.clear();
        for (index, &room) in main_chain.iter().enumerate() {
            self.bindings.insert(room, index % self.population.len());
        }
    }

    pub fn chromosome_for(&self, room: RoomId) -> Option<&DifficultyChromosome> {
        self.bindings.get(&room).and_then(|&index| self.population.get(index))
    }

    /// The room's cluster emptied: score the bound chromosome against the
    /// accumulated telemetry and release the binding.
    pub fn room_cleared(
        &mut self,
        room: RoomId,
        sample: &RoomCombatSample,
        scaling_factor: f32,
    ) -> Result<f32, DifficultyError> {
        let index = self
            .bindings
            .remove(&room)
            .ok_or(DifficultyError::UnboundChromosome { room })?;
        let chromosome = self
            .population
            .get_mut(index)
            .ok_or(DifficultyError::UnboundChromosome { room })?;
        chromosome.evaluate_fairness(sample, scaling_factor);
        Ok(chromosome.fairness)
    }

    pub fn level_summary(&self) -> LevelSummary {
        let ranked = self.population.ranked();
        let total: f32 = ranked.iter().map(|chromosome| chromosome.fairness).sum();
        LevelSummary {
            average_fairness: total / ranked.len() as f32,
            best_fairness: ranked[0].fairness,
            fairest: ranked[0].clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use crate::types::RoomId;

    use super::*;

    fn room_ids(count: usize) -> Vec<RoomId> {
        let mut arena: SlotMap<RoomId, ()> = SlotMap::with_key();
        (0..count).map(|_| arena.insert(())).collect()
    }

    fn engine() -> (DifficultyEngine, DifficultyConfig, RunRng) {
        let config = DifficultyConfig::default();
        let mut rng = RunRng::seed_from_u64(8);
        let engine = DifficultyEngine::new(&config, &mut rng);
        (engine, config, rng)
    }

    #[test]
    fn every_main_room_gets_a_bound_chromosome() {
        let (mut engine, _, _) = engine();
        let rooms = room_ids(5);
        engine.assign_rooms(&rooms);
        for room in rooms {
            assert!(engine.chromosome_for(room).is_some());
        }
    }

    #[test]
    fn clearing_a_room_scores_the_bound_chromosome_and_releases_it() {
        let (mut engine, config, _) = engine();
        let rooms = room_ids(3);
        engine.assign_rooms(&rooms);

        let sample = RoomCombatSample { effectiveness: 0.6, aggression: 0.5 };
        let fairness = engine
            .room_cleared(rooms[0], &sample, config.fairness_scaling)
            .expect("room was bound");
        assert_eq!(fairness, 1.0);
        assert!(engine.chromosome_for(rooms[0]).is_none(), "binding is released");
    }

    #[test]
    fn scoring_an_unbound_room_is_a_contract_violation() {
        let (mut engine, config, _) = engine();
        let rooms = room_ids(1);
        let sample = RoomCombatSample { effectiveness: 0.5, aggression: 0.5 };
        assert_eq!(
            engine.room_cleared(rooms[0], &sample, config.fairness_scaling),
            Err(DifficultyError::UnboundChromosome { room: rooms[0] })
        );
    }

    #[test]
    fn static_mode_never_evolves_the_population() {
        let config = DifficultyConfig { dynamic: false, ..DifficultyConfig::default() };
        let mut rng = RunRng::seed_from_u64(9);
        let mut engine = DifficultyEngine::new(&config, &mut rng);
        let before = engine.population().clone();
        let mut log = Vec::new();

        engine.advance_generation(&config, &mut rng, &mut log);
        assert_eq!(engine.population(), &before);
        assert!(log.is_empty());
    }

    #[test]
    fn a_caller_authored_population_is_adopted_verbatim() {
        let config = DifficultyConfig { dynamic: false, ..DifficultyConfig::default() };
        let mut rng = RunRng::seed_from_u64(10);
        let bounds = crate::config::GeneBounds::default();
        let authored = DifficultyPopulation::from_chromosomes(
            (0..3).map(|_| DifficultyChromosome::sample(&bounds, &mut rng)).collect(),
        );
        let engine = DifficultyEngine::with_population(&config, authored.clone());
        assert_eq!(engine.population(), &authored);
    }

    #[test]
    fn dynamic_mode_advances_the_generation_counter() {
        let (mut engine, config, mut rng) = engine();
        let mut log = Vec::new();
        engine.advance_generation(&config, &mut rng, &mut log);
        assert_eq!(engine.population().generation(), 1);
        assert_eq!(
            log,
            vec![LogEvent::PopulationEvolved { generation: 1, elites_retained: 1 }]
        );
    }

    #[test]
    fn level_summary_reports_the_fairest_chromosome() {
        let (mut engine, config, _) = engine();
        let rooms = room_ids(5);
        engine.assign_rooms(&rooms);

        let close = RoomCombatSample { effectiveness: 0.58, aggression: 0.5 };
        let far = RoomCombatSample { effectiveness: 0.1, aggression: 1.0 };
        engine.room_cleared(rooms[0], &far, config.fairness_scaling).expect("bound");
        engine.room_cleared(rooms[1], &close, config.fairness_scaling).expect("bound");

        let summary = engine.level_summary();
        assert!(summary.best_fairness > 0.9);
        assert!(summary.average_fairness < summary.best_fairness);
        assert_eq!(summary.fairest.fairness, summary.best_fairness);
    }
}
