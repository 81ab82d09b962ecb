//! Statistical building blocks for the permutation test.
//!
//! - Counter-seeded Fisher–Yates shuffling of the pooled samples
//! - The paired mean-difference statistic and its permutation distribution
//! - Histogram binning and Epanechnikov kernel density estimation
//! - Quantiles of the null distribution

mod density;
mod histogram;
mod permutation;
mod quantile;
mod resample;

pub use density::{epanechnikov, kernel_density, linspace, DensityPoint};
pub use histogram::{domain_upper, histogram, HistogramBin, DOMAIN_HEADROOM};
pub use permutation::{
    p_value, paired_mean_abs_difference, permutation_statistics, CancelToken, PermutationPlan,
};
pub use quantile::{compute_quantile, critical_value};
pub use resample::{counter_rng_seed, iteration_rng, shuffle_into};
