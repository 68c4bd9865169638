//! RNG module - injectable random sources
//!
//! Every random decision in the engine (ticket sampling, draw selection) goes
//! through [`RandomSource`], so a session is fully reproducible from a seed.
//!
//! - [`SimpleRng`]: deterministic LCG for tests and seeded play
//! - `rand::rngs::StdRng`: entropy-seeded generator for normal play

use rand::Rng;

/// A source of uniformly distributed indices.
pub trait RandomSource {
    /// Random value in `[0, max)`. `max` must be non-zero.
    fn next_range(&mut self, max: u32) -> u32;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_range(&mut self, max: u32) -> u32 {
        (**self).next_range(max)
    }
}

impl RandomSource for rand::rngs::StdRng {
    fn next_range(&mut self, max: u32) -> u32 {
        self.random_range(0..max)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_range(&mut self, max: u32) -> u32 {
        // The high bits of an LCG are far better distributed than the low ones.
        (((self.next_u32() >> 16) as u64 * max as u64) >> 16) as u32
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..=60u32 {
            for _ in 0..50 {
                assert!(rng.next_range(max) < max);
            }
        }
    }

    #[test]
    fn test_next_range_covers_small_domain() {
        let mut rng = SimpleRng::new(99);
        let mut seen = [false; 5];
        for _ in 0..200 {
            seen[rng.next_range(5) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_std_rng_source() {
        let mut rng: Box<dyn RandomSource> = Box::new(rand::rngs::StdRng::seed_from_u64(42));
        for _ in 0..100 {
            assert!(rng.next_range(51) < 51);
        }
    }
}
