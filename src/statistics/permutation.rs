//! Two-sample permutation test on the paired mean difference.
//!
//! Both samples are truncated to a common length `n`. The statistic is
//! `|mean(second[i] - first[i])|`. Under the null hypothesis the `2n`
//! values are exchangeable, so each permutation shuffles the pooled values
//! and recomputes the statistic with the first half playing `second` and
//! the remaining half playing `first`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::resample::{iteration_rng, shuffle_into};
use crate::error::{Result, SwayError};

/// Shared flag for aborting a long permutation run.
///
/// Clones observe the same flag. A run that sees the flag set returns
/// [`SwayError::Cancelled`] instead of a partial result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Parameters of the shuffling loop.
#[derive(Debug, Clone, Copy)]
pub struct PermutationPlan {
    /// Number of shuffles.
    pub permutations: usize,
    /// Base seed; iteration `i` uses `counter_rng_seed(seed, i)`.
    pub seed: u64,
    /// Run iterations on the shared thread pool.
    pub parallel: bool,
}

/// `|mean(second[i] - first[i])|` over the common prefix.
///
/// When the plain sum of differences overflows, the mean is accumulated
/// from pre-scaled terms instead, so the result is infinite only when the
/// mean itself is out of range. Returns NaN when either slice is empty;
/// callers reject empty input first.
pub fn paired_mean_abs_difference(first: &[f64], second: &[f64]) -> f64 {
    let n = first.len().min(second.len());
    let pairs = || second[..n].iter().zip(&first[..n]);

    let sum: f64 = pairs().map(|(b, a)| b - a).sum();
    if sum.is_finite() {
        return (sum / n as f64).abs();
    }
    let scale = n as f64;
    let mean: f64 = pairs().map(|(b, a)| b / scale - a / scale).sum();
    mean.abs()
}

/// Fraction of permutation statistics at least as large as `observed`.
pub fn p_value(permutation_statistics: &[f64], observed: f64) -> f64 {
    if permutation_statistics.is_empty() {
        return f64::NAN;
    }
    let extreme = permutation_statistics
        .iter()
        .filter(|&&s| s >= observed)
        .count();
    extreme as f64 / permutation_statistics.len() as f64
}

/// Statistic for every permutation, in iteration order.
///
/// `first` and `second` must already have equal, non-zero length.
pub fn permutation_statistics(
    first: &[f64],
    second: &[f64],
    plan: &PermutationPlan,
    cancel: Option<&CancelToken>,
) -> Result<Vec<f64>> {
    debug_assert_eq!(first.len(), second.len());
    let pool: Vec<f64> = first.iter().chain(second).copied().collect();
    let n = first.len();

    #[cfg(feature = "parallel")]
    if plan.parallel {
        return crate::thread_pool::install(|| {
            (0..plan.permutations)
                .into_par_iter()
                .map_init(
                    || vec![0.0; pool.len()],
                    |buffer, i| {
                        if cancel.is_some_and(CancelToken::is_cancelled) {
                            return None;
                        }
                        Some(one_permutation(&pool, n, plan.seed, i, buffer))
                    },
                )
                .collect::<Option<Vec<f64>>>()
                .ok_or(SwayError::Cancelled)
        });
    }

    let mut buffer = vec![0.0; pool.len()];
    let mut stats = Vec::with_capacity(plan.permutations);
    for i in 0..plan.permutations {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(SwayError::Cancelled);
        }
        stats.push(one_permutation(&pool, n, plan.seed, i, &mut buffer));
    }
    Ok(stats)
}

fn one_permutation(pool: &[f64], n: usize, seed: u64, iteration: usize, buffer: &mut [f64]) -> f64 {
    let mut rng = iteration_rng(seed, iteration as u64);
    shuffle_into(pool, &mut rng, buffer);
    let (as_second, as_first) = buffer.split_at(n);
    paired_mean_abs_difference(as_first, as_second)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(permutations: usize, seed: u64) -> PermutationPlan {
        PermutationPlan {
            permutations,
            seed,
            parallel: false,
        }
    }

    #[test]
    fn paired_difference() {
        assert_eq!(paired_mean_abs_difference(&[1.0, 1.0, 1.0], &[5.0, 5.0, 5.0]), 4.0);
        assert_eq!(paired_mean_abs_difference(&[5.0, 5.0], &[1.0, 1.0]), 4.0);
        assert_eq!(paired_mean_abs_difference(&[1.0, 2.0], &[2.0, 1.0]), 0.0);
    }

    #[test]
    fn paired_difference_survives_an_overflowing_sum() {
        // 1e308 + 1e308 overflows, the mean of the differences does not.
        let m = paired_mean_abs_difference(&[0.0, 0.0], &[1e308, 1e308]);
        assert_eq!(m, 1e308);
        let m = paired_mean_abs_difference(&[-1e308, 0.0], &[0.0, 1e308]);
        assert_eq!(m, 1e308);
        // A mean beyond f64::MAX stays infinite for the caller to reject.
        assert!(paired_mean_abs_difference(&[-1e308], &[1e308]).is_infinite());
    }

    #[test]
    fn p_value_counts_ties_as_extreme() {
        assert_eq!(p_value(&[1.0, 2.0, 3.0, 4.0], 3.0), 0.5);
        assert_eq!(p_value(&[1.0, 2.0], 9.0), 0.0);
        assert_eq!(p_value(&[1.0, 2.0], 0.0), 1.0);
        assert!(p_value(&[], 1.0).is_nan());
    }

    #[test]
    fn one_statistic_per_permutation() {
        let stats = permutation_statistics(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &plan(250, 1), None)
            .unwrap();
        assert_eq!(stats.len(), 250);
        assert!(stats.iter().all(|s| s.is_finite() && *s >= 0.0));
    }

    #[test]
    fn seeded_runs_repeat() {
        let a = [0.1, 0.4, 0.2, 0.9];
        let b = [0.5, 0.3, 0.8, 0.7];
        let first = permutation_statistics(&a, &b, &plan(100, 77), None).unwrap();
        let second = permutation_statistics(&a, &b, &plan(100, 77), None).unwrap();
        let other = permutation_statistics(&a, &b, &plan(100, 78), None).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn statistics_bounded_by_pool_spread() {
        // |mean difference| can never exceed max - min of the pool.
        let a = [1.0, 1.0, 1.0];
        let b = [5.0, 5.0, 5.0];
        let stats = permutation_statistics(&a, &b, &plan(500, 5), None).unwrap();
        assert!(stats.iter().all(|&s| s <= 4.0 + 1e-12));
        // Possible values for n=3 are k * 4/3 for k = 0..=3.
        for s in stats {
            let k = s / (4.0 / 3.0);
            assert!((k - k.round()).abs() < 1e-9, "{s}");
        }
    }

    #[test]
    fn cancelled_token_stops_the_run() {
        let token = CancelToken::new();
        token.cancel();
        let err = permutation_statistics(&[1.0], &[2.0], &plan(10, 0), Some(&token)).unwrap_err();
        assert!(matches!(err, SwayError::Cancelled));
    }

    #[test]
    fn token_clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let a: Vec<f64> = (0..40).map(|i| (i as f64).sin()).collect();
        let b: Vec<f64> = (0..40).map(|i| (i as f64).cos()).collect();
        let sequential = permutation_statistics(&a, &b, &plan(300, 11), None).unwrap();
        let parallel_plan = PermutationPlan {
            parallel: true,
            ..plan(300, 11)
        };
        let parallel = permutation_statistics(&a, &b, &parallel_plan, None).unwrap();
        assert_eq!(sequential, parallel);
    }
}
