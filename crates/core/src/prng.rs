//! Random sources for placement and per-frame color draws.
//!
//! Every random draw in the sketch goes through [`RandomSource`], passed in
//! explicitly. Front-ends seed a [`Xorshift64`] from the clock for the usual
//! nondeterministic look; tests and headless renders pass a fixed seed and get
//! bit-identical output.

use serde::{Deserialize, Serialize};

/// A stream of uniformly distributed random values.
///
/// Only [`next_u64`](RandomSource::next_u64) is required; the derived draws
/// are provided.
pub trait RandomSource {
    /// Returns the next 64 random bits.
    fn next_u64(&mut self) -> u64;

    /// Uniform f64 in [0, 1), built from the upper 53 bits.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 between `min` and `max`.
    ///
    /// Inclusive of `min`, exclusive of `max`. Reversed bounds are allowed and
    /// yield values in (max, min].
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform angle in degrees, [0, 360).
    fn next_degrees(&mut self) -> f64 {
        self.next_f64() * 360.0
    }

    /// Uniform index in [0, n). Returns 0 when `n` is 0.
    ///
    /// Modulo reduction; the bias is negligible at 64-bit width.
    fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        (self.next_u64() % n as u64) as usize
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }
}

/// Xorshift64 deterministic PRNG with shifts (13, 7, 17).
///
/// A seed of 0 is the all-zeros fixed point of xorshift and is replaced by a
/// non-zero fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }
}

impl RandomSource for Xorshift64 {
    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // If this breaks, every scripted render with this seed changes.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_stick_at_zero() {
        let mut rng = Xorshift64::new(0);
        for _ in 0..3 {
            assert_ne!(rng.next_u64(), 0);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(1234);
        let mut b = Xorshift64::new(1234);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at index {i}");
        }
    }

    #[test]
    fn next_range_accepts_reversed_bounds() {
        let mut rng = Xorshift64::new(3);
        for _ in 0..1000 {
            let v = rng.next_range(20.0, 10.0);
            assert!((10.0..=20.0).contains(&v), "reversed range produced {v}");
        }
    }

    #[test]
    fn next_degrees_stays_in_a_turn() {
        let mut rng = Xorshift64::new(77);
        for _ in 0..1000 {
            let d = rng.next_degrees();
            assert!((0.0..360.0).contains(&d));
        }
    }

    #[test]
    fn below_zero_returns_zero() {
        let mut rng = Xorshift64::new(9);
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn mutable_reference_forwards_to_the_source() {
        let mut a = Xorshift64::new(11);
        let mut b = Xorshift64::new(11);
        let mut by_ref = &mut b;
        assert_eq!(a.next_u64(), RandomSource::next_u64(&mut by_ref));
    }

    #[test]
    fn serialization_preserves_mid_stream_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for i in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64(), "diverged at {i}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "{v} out of [0, 1)");
                }
            }

            #[test]
            fn next_range_within_bounds(
                seed: u64,
                min in -1e4_f64..1e4,
                span in 1e-3_f64..1e4,
            ) {
                let mut rng = Xorshift64::new(seed);
                let max = min + span;
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v <= max, "{v} outside [{min}, {max}]");
                }
            }

            #[test]
            fn below_within_bounds(seed: u64, n in 1_usize..10_000) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    prop_assert!(rng.below(n) < n);
                }
            }
        }
    }
}
