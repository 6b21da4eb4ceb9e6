//! Seedable randomness for particle jitter.
//!
//! The simulation only ever needs uniform samples in [0, 1), so it depends on
//! the small [`UniformSource`] trait rather than a concrete generator. The
//! default generator is [`Xorshift64`]: same seed, same jitter, on every
//! platform.

use serde::{Deserialize, Serialize};

/// A source of uniformly distributed samples in [0, 1).
pub trait UniformSource {
    /// Returns the next sample in [0, 1).
    fn next_f64(&mut self) -> f64;
}

/// Xorshift64 deterministic PRNG with shifts (13, 7, 17).
///
/// Seed of 0 is replaced with a non-zero fallback, since 0 is a fixed point
/// of the algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl UniformSource for Xorshift64 {
    /// Upper 53 bits of `next_u64()` divided by 2^53.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Useful when a caller needs exact control over jitter, e.g. to reproduce a
/// recorded run or to pin down rounding edges.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    samples: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// Creates a source replaying `samples`. An empty list yields 0.5 forever,
    /// which maps to zero jitter.
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples, cursor: 0 }
    }
}

impl UniformSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.5;
        }
        let v = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // If this breaks, every recorded scene seed renders differently.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_produce_all_zeros() {
        let mut rng = Xorshift64::new(0);
        for _ in 0..3 {
            assert_ne!(rng.next_u64(), 0);
        }
    }

    #[test]
    fn two_instances_with_same_seed_produce_identical_sequences() {
        let mut rng_a = Xorshift64::new(42);
        let mut rng_b = Xorshift64::new(42);
        for i in 0..1000 {
            assert_eq!(
                rng_a.next_u64(),
                rng_b.next_u64(),
                "sequences diverged at index {i}"
            );
        }
    }

    #[test]
    fn next_f64_always_in_unit_interval() {
        let mut rng = Xorshift64::new(12345);
        for i in 0..10_000 {
            let v = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&v),
                "next_f64() = {v} out of [0, 1) at iteration {i}"
            );
        }
    }

    #[test]
    fn sequence_source_cycles() {
        let mut src = SequenceSource::new(vec![0.1, 0.9]);
        assert_eq!(src.next_f64(), 0.1);
        assert_eq!(src.next_f64(), 0.9);
        assert_eq!(src.next_f64(), 0.1);
    }

    #[test]
    fn empty_sequence_source_yields_midpoint() {
        let mut src = SequenceSource::new(Vec::new());
        assert_eq!(src.next_f64(), 0.5);
        assert_eq!(src.next_f64(), 0.5);
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for i in 0..100 {
            assert_eq!(
                rng.next_u64(),
                restored.next_u64(),
                "sequences diverged after deserialization at index {i}"
            );
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v} for seed {seed}");
                }
            }

            #[test]
            fn next_f64_approximate_uniformity(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                let mut buckets = [0u32; 10];
                for _ in 0..10_000 {
                    let idx = (rng.next_f64() * 10.0).min(9.0) as usize;
                    buckets[idx] += 1;
                }
                // Expected ~1000 per bucket; loose bound to avoid flakes.
                for (i, &count) in buckets.iter().enumerate() {
                    prop_assert!(count >= 500, "bucket {i} has only {count} for seed {seed}");
                }
            }
        }
    }
}
