//! # sway-analysis
//!
//! Postural sway recordings under four experimental conditions, and a
//! permutation test for comparing them.
//!
//! The crate covers three jobs:
//! - Loading per-condition CSV files into per-participant time series,
//!   sorted by time and annotated with the mean centre of pressure
//! - Nearest-sample lookup for replaying a recording frame by frame
//! - A paired permutation test on the mean difference between two samples,
//!   with a histogram and kernel density of the null distribution
//!
//! ## Quick Start
//!
//! ```
//! use sway_analysis::{run_permutation_test, Config};
//!
//! let config = Config {
//!     permutations: 500,
//!     seed: Some(42),
//!     ..Config::default()
//! };
//! let report = run_permutation_test(&[1.0, 1.1, 0.9], &[1.6, 1.4, 1.5], &config).unwrap();
//!
//! println!("p = {:.3}", report.result.p_value);
//! ```
//!
//! ## Loading data
//!
//! ```no_run
//! use sway_analysis::{load_corpus, Condition, DataSources};
//!
//! let corpus = load_corpus(&DataSources::default().with_env());
//! if let Some(series) = corpus.get_series(Condition::VrMusic, 3) {
//!     println!("{} samples", series.len());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod nearest;
mod result;
mod tester;
mod types;

// Functional modules
pub mod output;
pub mod playback;
pub mod statistics;
pub mod store;
pub mod thread_pool;

// Re-exports for public API
pub use config::{Config, DataSources};
pub use error::{Result, SwayError};
pub use nearest::{find_nearest, find_nearest_index};
pub use result::{Metadata, PermutationReport, PermutationResult};
pub use statistics::{CancelToken, DensityPoint, HistogramBin};
pub use store::{
    load, load_corpus, load_source, ConditionDataset, Corpus, ParticipantSeries, Record, Sample,
};
pub use tester::PermutationTester;
pub use types::{Channel, Condition, Metric, ParticipantId, UnknownName};

/// Run a permutation test with the given configuration.
///
/// Shorthand for `PermutationTester::with_config(config.clone()).run(a, b)`.
///
/// # Errors
///
/// Fails when either sample is empty after truncation to a common length,
/// when a paired value is not finite, or when `config` is out of range.
pub fn run_permutation_test(
    sample_a: &[f64],
    sample_b: &[f64],
    config: &Config,
) -> Result<PermutationReport> {
    PermutationTester::with_config(config.clone()).run(sample_a, sample_b)
}
