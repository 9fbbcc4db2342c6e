//! Seeded pseudo-random stream shared by layout placement and evolution.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// The single injectable randomness source. Every operation that draws
/// randomness takes `&mut RunRng`, so a run is fully determined by its seed.
pub struct RunRng {
    stream: ChaCha8Rng,
}

impl RunRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self { stream: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Uniform draw from the half-open range `[min, max)`.
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min < max);
        let span = (max - min) as u32;
        min + (self.stream.next_u32() % span) as i32
    }

    /// Uniform draw from `[0, 1)` with 24 bits of resolution.
    pub fn unit_f32(&mut self) -> f32 {
        (self.stream.next_u32() >> 8) as f32 / (1_u32 << 24) as f32
    }

    /// Uniform draw from the half-open range `[min, max)`.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        debug_assert!(min < max);
        min + (max - min) * self.unit_f32()
    }

    /// True with the given probability; `1.0` always succeeds, `0.0` never does.
    pub fn chance(&mut self, probability: f32) -> bool {
        self.unit_f32() < probability
    }

    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.stream.next_u32() as usize) % len
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in 0..items.len() {
            let other = index + self.pick_index(items.len() - index);
            items.swap(index, other);
        }
    }
}
