//! The full set of loaded conditions.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::csv::CsvTable;
use super::loader::{load, ConditionDataset, REQUIRED_COLUMNS};
use super::series::ParticipantSeries;
use crate::config::DataSources;
use crate::error::{Result, SwayError};
use crate::result::PermutationReport;
use crate::tester::PermutationTester;
use crate::types::{Channel, Condition, ParticipantId};

/// Every condition that loaded, keyed by condition.
///
/// A condition whose source could not be read is absent rather than empty;
/// [`Corpus::missing`] lists those. The corpus is immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    datasets: BTreeMap<Condition, ConditionDataset>,
    missing: Vec<Condition>,
}

impl FromIterator<ConditionDataset> for Corpus {
    fn from_iter<I: IntoIterator<Item = ConditionDataset>>(iter: I) -> Self {
        Self {
            datasets: iter.into_iter().map(|d| (d.condition(), d)).collect(),
            missing: Vec::new(),
        }
    }
}

impl Corpus {
    /// Dataset for one condition, if it loaded.
    pub fn dataset(&self, condition: Condition) -> Option<&ConditionDataset> {
        self.datasets.get(&condition)
    }

    /// Series for one participant in one condition.
    ///
    /// `None` covers both an absent condition and an unknown participant.
    pub fn get_series(
        &self,
        condition: Condition,
        participant: ParticipantId,
    ) -> Option<&ParticipantSeries> {
        self.dataset(condition)?.get(participant)
    }

    /// Conditions that loaded, in narrative order.
    pub fn conditions(&self) -> impl Iterator<Item = Condition> + '_ {
        self.datasets.keys().copied()
    }

    /// Configured conditions whose source failed.
    pub fn missing(&self) -> &[Condition] {
        &self.missing
    }

    /// Loaded datasets in narrative order.
    pub fn datasets(&self) -> impl Iterator<Item = &ConditionDataset> {
        self.datasets.values()
    }

    /// One channel pooled over every participant of `condition`.
    pub fn pooled(&self, condition: Condition, channel: Channel) -> Option<Vec<f64>> {
        self.dataset(condition).map(|d| d.pooled(channel))
    }

    /// Permutation test on a channel pooled from two conditions.
    ///
    /// `first` plays the role of sample A and `second` of sample B, so the
    /// observed statistic is `|mean(second - first)|`.
    pub fn compare(
        &self,
        first: Condition,
        second: Condition,
        channel: Channel,
        tester: &PermutationTester,
    ) -> Result<PermutationReport> {
        let a = self.pooled(first, channel).ok_or(SwayError::MissingDataset(first))?;
        let b = self.pooled(second, channel).ok_or(SwayError::MissingDataset(second))?;
        tester.run(&a, &b)
    }
}

/// Read every configured source and assemble the corpus.
///
/// A source that cannot be read, or that lacks a required column, is logged
/// and left out; it never prevents the other conditions from loading.
pub fn load_corpus(sources: &DataSources) -> Corpus {
    let entries: Vec<(Condition, &Path)> = sources.iter().collect();

    #[cfg(feature = "parallel")]
    let outcomes: Vec<(Condition, Result<ConditionDataset>)> = crate::thread_pool::install(|| {
        entries
            .par_iter()
            .map(|&(condition, path)| (condition, load_source(condition, path)))
            .collect()
    });

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<(Condition, Result<ConditionDataset>)> = entries
        .iter()
        .map(|&(condition, path)| (condition, load_source(condition, path)))
        .collect();

    let mut corpus = Corpus::default();
    for (condition, outcome) in outcomes {
        match outcome {
            Ok(dataset) => {
                info!(
                    %condition,
                    participants = dataset.len(),
                    samples = dataset.sample_count(),
                    dropped = dataset.dropped_rows(),
                    "loaded condition"
                );
                corpus.datasets.insert(condition, dataset);
            }
            Err(err) => {
                warn!(%condition, error = %err, "skipping condition");
                corpus.missing.push(condition);
            }
        }
    }
    corpus
}

/// Read and parse one condition's file.
pub fn load_source(condition: Condition, path: &Path) -> Result<ConditionDataset> {
    let table = CsvTable::read(path)?;
    table.require_columns(&REQUIRED_COLUMNS)?;
    Ok(load(condition, table.rows()))
}
