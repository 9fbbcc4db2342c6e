//! The difficulty genome, its fairness evaluation, and the enemy loadout a
//! chromosome resolves to.

use serde::{Deserialize, Serialize};

use crate::config::GeneBounds;
use crate::rng::RunRng;
use crate::telemetry::RoomCombatSample;

pub const GENE_COUNT: usize = 4;

/// Mutation may never push a gene below these, so a degenerate or negative
/// difficulty slice cannot evolve.
pub const HEALTH_FLOOR: i32 = 50;
pub const MODIFIER_FLOOR: f32 = 0.1;

const HEALTH_MUTATION_SPAN: i32 = 50;
const MODIFIER_MUTATION_SPAN: f32 = 0.5;

/// Expected enemy effectiveness band: defensive play tolerates 30% of the
/// player's pool, aggressive play up to 90%.
const EXPECTED_EFFECTIVENESS_DEFENSIVE: f32 = 0.3;
const EXPECTED_EFFECTIVENESS_AGGRESSIVE: f32 = 0.9;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyChromosome {
    pub enemy_health: i32,
    pub attack_range_modifier: f32,
    pub accuracy_modifier: f32,
    pub damage_modifier: f32,
    /// Fitness, higher is fairer; 0 is the neutral baseline for chromosomes
    /// that have not faced a player yet.
    pub fairness: f32,
}

impl DifficultyChromosome {
    pub fn sample(bounds: &GeneBounds, rng: &mut RunRng) -> Self {
        Self {
            enemy_health: rng.range_i32(bounds.health_min, bounds.health_max),
            attack_range_modifier: rng.range_f32(bounds.attack_range_min, bounds.attack_range_max),
            accuracy_modifier: rng.range_f32(bounds.accuracy_min, bounds.accuracy_max),
            damage_modifier: rng.range_f32(bounds.damage_min, bounds.damage_max),
            fairness: 0.0,
        }
    }

    /// Gene-wise copy with fairness reset; the score of a past generation
    /// says nothing about the next one's conditions.
    pub fn clone_reset(&self) -> Self {
        Self { fairness: 0.0, ..self.clone() }
    }

    /// Midpoint crossover.
    pub fn child_of(parent_a: &Self, parent_b: &Self) -> Self {
        Self {
            enemy_health: ((parent_a.enemy_health + parent_b.enemy_health) as f32 / 2.0).round()
                as i32,
            attack_range_modifier: (parent_a.attack_range_modifier
                + parent_b.attack_range_modifier)
                / 2.0,
            accuracy_modifier: (parent_a.accuracy_modifier + parent_b.accuracy_modifier) / 2.0,
            damage_modifier: (parent_a.damage_modifier + parent_b.damage_modifier) / 2.0,
            fairness: 0.0,
        }
    }

    /// Perturb one uniformly chosen gene by a bounded delta, clamped to the
    /// per-gene floor.
    pub fn mutate_random_gene(&mut self, rng: &mut RunRng) {
        match rng.pick_index(GENE_COUNT) {
            0 => {
                self.enemy_health = (self.enemy_health
                    + rng.range_i32(-HEALTH_MUTATION_SPAN, HEALTH_MUTATION_SPAN + 1))
                .max(HEALTH_FLOOR);
            }
            1 => {
                self.attack_range_modifier = (self.attack_range_modifier
                    + rng.range_f32(-MODIFIER_MUTATION_SPAN, MODIFIER_MUTATION_SPAN))
                .max(MODIFIER_FLOOR);
            }
            2 => {
                self.accuracy_modifier = (self.accuracy_modifier
                    + rng.range_f32(-MODIFIER_MUTATION_SPAN, MODIFIER_MUTATION_SPAN))
                .max(MODIFIER_FLOOR);
            }
            _ => {
                self.damage_modifier = (self.damage_modifier
                    + rng.range_f32(-MODIFIER_MUTATION_SPAN, MODIFIER_MUTATION_SPAN))
                .max(MODIFIER_FLOOR);
            }
        }
    }

    /// Score how well this slice matched the player: expected effectiveness
    /// scales with observed aggression, and fairness decays exponentially
    /// with the deviation from it. Always in `(0, 1]` for finite input.
    pub fn evaluate_fairness(&mut self, sample: &RoomCombatSample, scaling_factor: f32) {
        let expected = lerp(
            EXPECTED_EFFECTIVENESS_DEFENSIVE,
            EXPECTED_EFFECTIVENESS_AGGRESSIVE,
            sample.aggression,
        );
        let difference = (sample.effectiveness - expected).abs();
        self.fairness = (-difference * scaling_factor).exp();
    }

    /// Resolve the concrete enemy stats this chromosome dictates.
    pub fn loadout(&self) -> EnemyLoadout {
        EnemyLoadout {
            health: self.enemy_health,
            weapon: WeaponStats {
                damage: BASE_RIFLE.damage * self.damage_modifier,
                attack_range: BASE_RIFLE.attack_range * self.attack_range_modifier,
                accuracy: (BASE_RIFLE.accuracy * self.accuracy_modifier).min(1.0),
                fire_rate: BASE_RIFLE.fire_rate,
                reload_seconds: BASE_RIFLE.reload_seconds,
                ammo_per_clip: BASE_RIFLE.ammo_per_clip,
            },
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: f32,
    pub fire_rate: f32,
    pub reload_seconds: f32,
    pub attack_range: f32,
    pub accuracy: f32,
    pub ammo_per_clip: u32,
}

/// Baseline stats for the rifle cluster enemy; the chromosome's modifiers
/// scale these.
const BASE_RIFLE: WeaponStats = WeaponStats {
    damage: 10.0,
    fire_rate: 2.0,
    reload_seconds: 1.5,
    attack_range: 8.0,
    accuracy: 0.8,
    ammo_per_clip: 12,
};

/// Everything the external combat layer needs to apply one difficulty slice
/// to a freshly spawned cluster.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyLoadout {
    pub health: i32,
    pub weapon: WeaponStats,
}
