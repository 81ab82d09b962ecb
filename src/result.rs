//! Permutation test result types.

use serde::{Deserialize, Serialize};

use crate::statistics::{DensityPoint, HistogramBin};

/// Core outcome of a permutation test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermutationResult {
    /// `|mean(b[i] - a[i])|` over the paired prefix.
    pub observed_statistic: f64,

    /// Statistic recomputed after each shuffle, in iteration order.
    pub permutation_statistics: Vec<f64>,

    /// Fraction of permutation statistics `>=` the observed one.
    pub p_value: f64,
}

/// Everything the presentation layer needs for one test.
///
/// Histogram and density are both derived from
/// `result.permutation_statistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermutationReport {
    /// Observed statistic, null distribution and p-value.
    pub result: PermutationResult,

    /// Equal-width bins over `[0, max * 1.1]`.
    pub histogram: Vec<HistogramBin>,

    /// Kernel density evaluated across the histogram domain.
    pub density: Vec<DensityPoint>,

    /// 95th percentile of the permutation statistics.
    pub critical_value: f64,

    /// Run parameters for reproduction.
    pub metadata: Metadata,
}

impl PermutationReport {
    /// Whether the p-value is at or below `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.result.p_value <= alpha
    }

    /// Upper edge of the histogram domain.
    pub fn domain_upper(&self) -> f64 {
        self.histogram.last().map_or(0.0, |b| b.x1)
    }

    /// Bin holding the observed statistic, if it falls inside the domain.
    pub fn observed_bin(&self) -> Option<usize> {
        let observed = self.result.observed_statistic;
        let last = self.histogram.len().checked_sub(1)?;
        self.histogram.iter().enumerate().position(|(i, b)| {
            observed >= b.x0 && (observed < b.x1 || (i == last && observed <= b.x1))
        })
    }
}

/// Parameters a run actually used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Length of sample A as supplied.
    pub len_a: usize,
    /// Length of sample B as supplied.
    pub len_b: usize,
    /// Common length after truncation.
    pub paired_len: usize,
    /// Number of shuffles.
    pub permutations: usize,
    /// Histogram bin count.
    pub bin_count: usize,
    /// Kernel bandwidth.
    pub bandwidth: f64,
    /// Base seed, drawn at random when none was configured.
    pub seed: u64,
    /// Whether the loop ran on the thread pool.
    pub parallel: bool,
    /// Wall-clock duration in seconds.
    pub runtime_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(observed: f64) -> PermutationReport {
        PermutationReport {
            result: PermutationResult {
                observed_statistic: observed,
                permutation_statistics: vec![0.5, 1.5, 1.8],
                p_value: 0.04,
            },
            histogram: vec![
                HistogramBin { x0: 0.0, x1: 1.0, count: 1 },
                HistogramBin { x0: 1.0, x1: 2.0, count: 2 },
            ],
            density: Vec::new(),
            critical_value: 1.8,
            metadata: Metadata {
                len_a: 3,
                len_b: 4,
                paired_len: 3,
                permutations: 3,
                bin_count: 2,
                bandwidth: 7.0,
                seed: 1,
                parallel: false,
                runtime_secs: 0.0,
            },
        }
    }

    #[test]
    fn significance() {
        let r = report(1.0);
        assert!(r.is_significant(0.05));
        assert!(!r.is_significant(0.01));
    }

    #[test]
    fn observed_bin_lookup() {
        assert_eq!(report(0.2).observed_bin(), Some(0));
        assert_eq!(report(1.0).observed_bin(), Some(1));
        assert_eq!(report(2.0).observed_bin(), Some(1));
        assert_eq!(report(2.5).observed_bin(), None);
        assert_eq!(report(2.5).domain_upper(), 2.0);
    }
}
