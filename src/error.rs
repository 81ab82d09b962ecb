//! Error type shared by the loader and the permutation tester.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::Condition;

/// Errors surfaced to callers of the library.
///
/// Row-level parse failures never appear here: the loader drops those rows.
#[derive(Debug, Error)]
pub enum SwayError {
    /// One of the two samples is empty after length alignment.
    #[error("permutation test needs non-empty samples (got {len_a} and {len_b} values)")]
    EmptySample {
        /// Length of the first sample as supplied.
        len_a: usize,
        /// Length of the second sample as supplied.
        len_b: usize,
    },

    /// A sample contains NaN or an infinity.
    #[error("sample {which} contains a non-finite value at index {index}")]
    NonFiniteSample {
        /// `'A'` or `'B'`.
        which: char,
        /// Position of the offending value.
        index: usize,
    },

    /// A tester parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Finite inputs whose statistic is too large to represent.
    #[error("permutation statistic overflowed; sample values are too large for a finite mean")]
    NonFiniteStatistic,

    /// A participant series with no samples.
    #[error("a participant series needs at least one sample")]
    EmptySeries,

    /// The run was aborted through its cancel token.
    #[error("permutation run cancelled")]
    Cancelled,

    /// A condition's source file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    SourceUnavailable {
        /// Path we attempted to read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },

    /// The CSV header lacks a required column.
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    /// The requested condition is not present in the corpus.
    #[error("no data loaded for condition {0}")]
    MissingDataset(Condition),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SwayError>;
