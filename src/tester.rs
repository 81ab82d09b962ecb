//! `PermutationTester` entry point and builder.

use std::time::Instant;

use rand::Rng;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, SwayError};
use crate::result::{Metadata, PermutationReport, PermutationResult};
use crate::statistics::{
    critical_value, domain_upper, histogram, kernel_density, linspace, p_value,
    paired_mean_abs_difference, permutation_statistics, CancelToken, PermutationPlan,
};

/// Significance level used for the reported critical value.
const CRITICAL_ALPHA: f64 = 0.05;

/// Runs a permutation test on the paired mean difference of two samples.
///
/// Use the builder methods to configure a run.
///
/// # Example
///
/// ```
/// use sway_analysis::PermutationTester;
///
/// let report = PermutationTester::new()
///     .permutations(200)
///     .seed(7)
///     .run(&[1.0, 1.2, 0.9], &[1.4, 1.5, 1.3])
///     .unwrap();
///
/// assert!((0.0..=1.0).contains(&report.result.p_value));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PermutationTester {
    config: Config,
    cancel: Option<CancelToken>,
}

impl PermutationTester {
    /// Create with default configuration (1,000 permutations, 30 bins,
    /// bandwidth 7).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Create with a reduced permutation count for interactive use.
    ///
    /// Settings:
    /// - 200 permutations (vs 1,000 default)
    /// - 20 bins (vs 30 default)
    pub fn quick() -> Self {
        Self::with_config(Config {
            permutations: 200,
            bin_count: 20,
            ..Config::default()
        })
    }

    /// Set the number of shuffles.
    pub fn permutations(mut self, n: usize) -> Self {
        self.config.permutations = n;
        self
    }

    /// Set the histogram bin count.
    pub fn bins(mut self, n: usize) -> Self {
        self.config.bin_count = n;
        self
    }

    /// Set the Epanechnikov bandwidth.
    pub fn bandwidth(mut self, k: f64) -> Self {
        self.config.bandwidth = k;
        self
    }

    /// Set how many points the density curve is evaluated at.
    pub fn density_points(mut self, n: usize) -> Self {
        self.config.density_points = n;
        self
    }

    /// Set a deterministic seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Run iterations on the shared thread pool (`parallel` feature).
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.config.parallel = enabled;
        self
    }

    /// Attach a token that aborts the run when cancelled.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Test whether `sample_b` differs from `sample_a` in paired mean.
    ///
    /// # How It Works
    ///
    /// 1. Truncates both samples to the shorter length `n`
    /// 2. Observed statistic: `|mean(b[i] - a[i])|`
    /// 3. Shuffles the `2n` pooled values once per permutation and
    ///    recomputes the statistic on the two halves
    /// 4. p-value: share of permutation statistics `>=` the observed one
    /// 5. Bins the permutation statistics over `[0, max * 1.1]` and
    ///    smooths them with an Epanechnikov kernel over the same domain
    ///
    /// # Errors
    ///
    /// - [`SwayError::EmptySample`] if either sample is empty
    /// - [`SwayError::NonFiniteSample`] if a paired value is NaN or infinite
    /// - [`SwayError::NonFiniteStatistic`] if the values are so large that
    ///   the mean difference or the histogram domain overflows
    /// - [`SwayError::InvalidConfig`] for zero counts or a bad bandwidth
    /// - [`SwayError::Cancelled`] if the cancel token fires mid-run
    pub fn run(&self, sample_a: &[f64], sample_b: &[f64]) -> Result<PermutationReport> {
        let start = Instant::now();
        self.config.validate()?;

        let n = sample_a.len().min(sample_b.len());
        if n == 0 {
            return Err(SwayError::EmptySample {
                len_a: sample_a.len(),
                len_b: sample_b.len(),
            });
        }
        let a = &sample_a[..n];
        let b = &sample_b[..n];
        check_finite(a, 'A')?;
        check_finite(b, 'B')?;

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let parallel = self.config.parallel && cfg!(feature = "parallel");
        debug!(
            paired_len = n,
            permutations = self.config.permutations,
            seed,
            parallel,
            "running permutation test"
        );

        let observed_statistic = paired_mean_abs_difference(a, b);
        let plan = PermutationPlan {
            permutations: self.config.permutations,
            seed,
            parallel,
        };
        let stats = permutation_statistics(a, b, &plan, self.cancel.as_ref())?;

        let p = p_value(&stats, observed_statistic);
        let upper = domain_upper(&stats);
        if !observed_statistic.is_finite() || !upper.is_finite() {
            return Err(SwayError::NonFiniteStatistic);
        }
        let bins = histogram(&stats, self.config.bin_count, 0.0, upper);
        let points = linspace(0.0, upper, self.config.density_points);
        let density = kernel_density(&stats, &points, self.config.bandwidth);
        let critical = critical_value(&stats, CRITICAL_ALPHA).unwrap_or(f64::NAN);

        Ok(PermutationReport {
            result: PermutationResult {
                observed_statistic,
                permutation_statistics: stats,
                p_value: p,
            },
            histogram: bins,
            density,
            critical_value: critical,
            metadata: Metadata {
                len_a: sample_a.len(),
                len_b: sample_b.len(),
                paired_len: n,
                permutations: self.config.permutations,
                bin_count: self.config.bin_count,
                bandwidth: self.config.bandwidth,
                seed,
                parallel,
                runtime_secs: start.elapsed().as_secs_f64(),
            },
        })
    }
}

fn check_finite(values: &[f64], which: char) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(SwayError::NonFiniteSample { which, index }),
        None => Ok(()),
    }
}
