//! Per-iteration RNG seeding and pool shuffling.
//!
//! Every permutation draws from its own generator seeded by
//! `counter_rng_seed(base, i)`, so iteration `i` produces the same shuffle
//! no matter which thread runs it or in what order.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Counter-based RNG seed generation using SplitMix64.
///
/// A stateless mix of a base seed and an iteration counter. Using this
/// instead of `base + counter` avoids correlated streams between
/// neighbouring iterations.
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    // SplitMix64 finalizer, see https://xoshiro.di.unimi.it/splitmix64.c
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generator for permutation `iteration` under `base_seed`.
pub fn iteration_rng(base_seed: u64, iteration: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(base_seed, iteration))
}

/// Copy `pool` into `out` and shuffle it uniformly.
///
/// `SliceRandom::shuffle` is a Fisher–Yates shuffle: each of the `len!`
/// orderings is equally likely.
///
/// # Panics
///
/// Panics if `out.len() != pool.len()`.
pub fn shuffle_into<R: Rng + ?Sized>(pool: &[f64], rng: &mut R, out: &mut [f64]) {
    assert_eq!(
        out.len(),
        pool.len(),
        "Output buffer must have same length as the pool"
    );
    out.copy_from_slice(pool);
    out.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn counter_seeds_differ_and_repeat() {
        assert_eq!(counter_rng_seed(42, 7), counter_rng_seed(42, 7));
        assert_ne!(counter_rng_seed(42, 7), counter_rng_seed(42, 8));
        assert_ne!(counter_rng_seed(42, 7), counter_rng_seed(43, 7));
    }

    #[test]
    fn shuffle_keeps_the_multiset() {
        let pool: Vec<f64> = (0..50).map(f64::from).collect();
        let mut out = vec![0.0; pool.len()];
        shuffle_into(&pool, &mut iteration_rng(1, 0), &mut out);

        let mut sorted = out.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(sorted, pool);
    }

    #[test]
    fn same_iteration_same_shuffle() {
        let pool: Vec<f64> = (0..20).map(f64::from).collect();
        let mut a = vec![0.0; 20];
        let mut b = vec![0.0; 20];
        shuffle_into(&pool, &mut iteration_rng(9, 3), &mut a);
        shuffle_into(&pool, &mut iteration_rng(9, 3), &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn all_orderings_are_roughly_equally_likely() {
        // 3! = 6 orderings; 60k draws gives ~10k each.
        let pool = [0.0, 1.0, 2.0];
        let mut out = [0.0; 3];
        let mut counts: HashMap<[u8; 3], usize> = HashMap::new();
        for i in 0..60_000u64 {
            shuffle_into(&pool, &mut iteration_rng(2024, i), &mut out);
            let key = [out[0] as u8, out[1] as u8, out[2] as u8];
            *counts.entry(key).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        for (ordering, count) in counts {
            assert!((9_000..=11_000).contains(&count), "{ordering:?}: {count}");
        }
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn mismatched_buffer_panics() {
        let mut out = [0.0; 2];
        shuffle_into(&[1.0, 2.0, 3.0], &mut iteration_rng(0, 0), &mut out);
    }
}
