//! The chromosome population and its generational evolution.

use crate::config::DifficultyConfig;
use crate::rng::RunRng;

use super::chromosome::DifficultyChromosome;

#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyPopulation {
    chromosomes: Vec<DifficultyChromosome>,
    generation: u32,
}

impl DifficultyPopulation {
    /// Sample a fresh generation-zero population. The config must have been
    /// validated; an empty or inverted gene range is a startup error, not a
    /// sampling concern.
    pub fn initialise(config: &DifficultyConfig, rng: &mut RunRng) -> Self {
        let chromosomes = (0..config.population_size)
            .map(|_| DifficultyChromosome::sample(&config.gene_bounds, rng))
            .collect();
        Self { chromosomes, generation: 0 }
    }

    /// Adopt a caller-authored population, e.g. the fixed set used when
    /// dynamic difficulty is switched off.
    pub fn from_chromosomes(chromosomes: Vec<DifficultyChromosome>) -> Self {
        Self { chromosomes, generation: 0 }
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn chromosomes(&self) -> &[DifficultyChromosome] {
        &self.chromosomes
    }

    pub fn get(&self, index: usize) -> Option<&DifficultyChromosome> {
        self.chromosomes.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut DifficultyChromosome> {
        self.chromosomes.get_mut(index)
    }

    /// Chromosomes ranked by fairness, best first. The sort is stable, so
    /// equal scores keep their population order and rankings reproduce
    /// exactly across runs.
    pub fn ranked(&self) -> Vec<&DifficultyChromosome> {
        let mut ranked: Vec<&DifficultyChromosome> = self.chromosomes.iter().collect();
        ranked.sort_by(|left, right| right.fairness.total_cmp(&left.fairness));
        ranked
    }

    /// Produce the next generation: elite clones (fairness reset), then
    /// children bred from the elite slice by midpoint crossover or cloning,
    /// each mutated at the configured rate, and finally a full shuffle so
    /// room assignment is uncorrelated with fitness rank. The population
    /// size is invariant.
    pub fn evolve(&self, config: &DifficultyConfig, rng: &mut RunRng) -> Self {
        let ranked = self.ranked();
        let elite_count = config.elitism_count.min(ranked.len());

        let mut next: Vec<DifficultyChromosome> =
            ranked[..elite_count].iter().map(|elite| elite.clone_reset()).collect();

        while next.len() < self.chromosomes.len() {
            let parent_a = ranked[rng.pick_index(elite_count)];
            let parent_b = ranked[rng.pick_index(elite_count)];
            let mut child = if rng.chance(config.crossover_rate) {
                DifficultyChromosome::child_of(parent_a, parent_b)
            } else {
                parent_a.clone_reset()
            };
            if rng.chance(config.mutation_rate) {
                child.mutate_random_gene(rng);
            }
            next.push(child);
        }

        rng.shuffle(&mut next);
        Self { chromosomes: next, generation: self.generation + 1 }
    }
}
