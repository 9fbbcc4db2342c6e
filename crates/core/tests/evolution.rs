use proptest::prelude::*;

use deepgate_core::telemetry::RoomCombatSample;
use deepgate_core::{
    DifficultyChromosome, DifficultyConfig, DifficultyPopulation, GeneBounds, RunRng,
    HEALTH_FLOOR, MODIFIER_FLOOR,
};

fn population_with_fairness(scores: &[f32], seed: u64) -> DifficultyPopulation {
    let bounds = GeneBounds::default();
    let mut rng = RunRng::seed_from_u64(seed);
    DifficultyPopulation::from_chromosomes(
        scores
            .iter()
            .map(|&fairness| {
                let mut chromosome = DifficultyChromosome::sample(&bounds, &mut rng);
                chromosome.fairness = fairness;
                chromosome
            })
            .collect(),
    )
}

fn genes(chromosome: &DifficultyChromosome) -> (i32, f32, f32, f32) {
    (
        chromosome.enemy_health,
        chromosome.attack_range_modifier,
        chromosome.accuracy_modifier,
        chromosome.damage_modifier,
    )
}

#[test]
fn forced_crossover_scenario_fills_the_population_with_the_elite_genes() {
    // Five chromosomes, one elite, crossover always, no mutation: the evolved
    // population is one verbatim clone plus four self-pair children, all of
    // which carry the elite's genes with fairness reset to zero.
    let config = DifficultyConfig {
        population_size: 5,
        elitism_count: 1,
        crossover_rate: 1.0,
        mutation_rate: 0.0,
        ..DifficultyConfig::default()
    };
    let population = population_with_fairness(&[0.31, 0.87, 0.55, 0.12, 0.64], 10);
    let best = population.ranked()[0].clone();
    assert_eq!(best.fairness, 0.87);

    let mut rng = RunRng::seed_from_u64(11);
    let evolved = population.evolve(&config, &mut rng);

    assert_eq!(evolved.len(), 5);
    for chromosome in evolved.chromosomes() {
        assert_eq!(genes(chromosome), genes(&best));
        assert_eq!(chromosome.fairness, 0.0);
    }
}

#[test]
fn elite_gene_values_reappear_after_evolution() {
    let config = DifficultyConfig {
        elitism_count: 2,
        mutation_rate: 0.0,
        ..DifficultyConfig::default()
    };
    let population = population_with_fairness(&[0.2, 0.9, 0.4, 0.8, 0.1], 20);
    let ranked = population.ranked();
    let top_genes = [genes(ranked[0]), genes(ranked[1])];

    let mut rng = RunRng::seed_from_u64(21);
    let evolved = population.evolve(&config, &mut rng);

    for expected in top_genes {
        assert!(
            evolved.chromosomes().iter().any(|chromosome| genes(chromosome) == expected),
            "elite genes {expected:?} missing from the evolved population"
        );
    }
}

#[test]
fn balanced_play_at_expected_effectiveness_scores_perfect_fairness() {
    let mut chromosome = {
        let mut rng = RunRng::seed_from_u64(1);
        DifficultyChromosome::sample(&GeneBounds::default(), &mut rng)
    };
    chromosome.evaluate_fairness(&RoomCombatSample { effectiveness: 0.6, aggression: 0.5 }, 1.5);
    assert_eq!(chromosome.fairness, 1.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn evolution_preserves_population_size(
        size in 1_usize..16,
        seed in any::<u64>(),
        crossover_rate in 0.0_f32..=1.0,
        mutation_rate in 0.0_f32..=1.0,
    ) {
        let config = DifficultyConfig {
            population_size: size,
            elitism_count: 1,
            crossover_rate,
            mutation_rate,
            ..DifficultyConfig::default()
        };
        let scores: Vec<f32> = (0..size).map(|index| (index as f32 * 0.37).fract()).collect();
        let population = population_with_fairness(&scores, seed);
        let mut rng = RunRng::seed_from_u64(seed ^ 0xD1CE);
        let evolved = population.evolve(&config, &mut rng);
        prop_assert_eq!(evolved.len(), size);
    }

    #[test]
    fn fairness_is_bounded_in_the_half_open_unit_interval(
        effectiveness in 0.0_f32..10.0,
        aggression in 0.0_f32..=1.0,
        scaling in 0.1_f32..5.0,
    ) {
        let mut chromosome = {
            let mut rng = RunRng::seed_from_u64(3);
            DifficultyChromosome::sample(&GeneBounds::default(), &mut rng)
        };
        chromosome.evaluate_fairness(&RoomCombatSample { effectiveness, aggression }, scaling);
        prop_assert!(chromosome.fairness > 0.0);
        prop_assert!(chromosome.fairness <= 1.0);
    }

    #[test]
    fn mutated_generations_respect_the_gene_floors(seed in any::<u64>()) {
        let config = DifficultyConfig {
            mutation_rate: 1.0,
            ..DifficultyConfig::default()
        };
        let population = population_with_fairness(&[0.4, 0.6, 0.2, 0.8, 0.5], seed);
        let mut rng = RunRng::seed_from_u64(seed);
        let mut current = population;
        for _ in 0..5 {
            current = current.evolve(&config, &mut rng);
            for chromosome in current.chromosomes() {
                prop_assert!(chromosome.enemy_health >= HEALTH_FLOOR);
                prop_assert!(chromosome.attack_range_modifier >= MODIFIER_FLOOR);
                prop_assert!(chromosome.accuracy_modifier >= MODIFIER_FLOOR);
                prop_assert!(chromosome.damage_modifier >= MODIFIER_FLOOR);
            }
        }
    }
}
