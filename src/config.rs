//! Configuration for permutation runs and data sources.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwayError};
use crate::types::Condition;

/// Configuration options for `PermutationTester`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of shuffles (default: 1,000).
    pub permutations: usize,

    /// Equal-width histogram bins over `[0, max * 1.1]` (default: 30).
    pub bin_count: usize,

    /// Epanechnikov bandwidth, in units of the statistic (default: 7.0).
    pub bandwidth: f64,

    /// Points at which the density curve is evaluated (default: 100).
    pub density_points: usize,

    /// Optional deterministic seed for the shuffles.
    pub seed: Option<u64>,

    /// Spread iterations over the shared thread pool.
    ///
    /// Only effective with the `parallel` feature. Results are identical
    /// either way for a given seed.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            permutations: 1_000,
            bin_count: 30,
            bandwidth: 7.0,
            density_points: 100,
            seed: None,
            parallel: false,
        }
    }
}

impl Config {
    /// Overlay values from `SWAY_*` environment variables.
    ///
    /// Unset or unparseable variables leave the current value untouched.
    pub fn with_env(mut self) -> Self {
        if let Some(n) = parse_env("SWAY_PERMUTATIONS") {
            self.permutations = n;
        }
        if let Some(n) = parse_env("SWAY_BINS") {
            self.bin_count = n;
        }
        if let Some(k) = parse_env("SWAY_BANDWIDTH") {
            self.bandwidth = k;
        }
        if let Some(n) = parse_env("SWAY_DENSITY_POINTS") {
            self.density_points = n;
        }
        if let Some(seed) = parse_env("SWAY_SEED") {
            self.seed = Some(seed);
        }
        if let Some(flag) = parse_bool_env("SWAY_PARALLEL") {
            self.parallel = flag;
        }
        self
    }

    /// Reject parameter combinations that cannot produce a result.
    pub fn validate(&self) -> Result<()> {
        if self.permutations == 0 {
            return Err(SwayError::InvalidConfig("permutations must be at least 1".into()));
        }
        if self.bin_count == 0 {
            return Err(SwayError::InvalidConfig("bin_count must be at least 1".into()));
        }
        if self.density_points == 0 {
            return Err(SwayError::InvalidConfig("density_points must be at least 1".into()));
        }
        if !(self.bandwidth.is_finite() && self.bandwidth > 0.0) {
            return Err(SwayError::InvalidConfig(format!(
                "bandwidth must be positive and finite, got {}",
                self.bandwidth
            )));
        }
        Ok(())
    }
}

/// Where each condition's CSV lives.
///
/// Serializes as a JSON object keyed by condition code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSources {
    paths: BTreeMap<Condition, PathBuf>,
}

impl Default for DataSources {
    /// The four recordings under `data/`.
    fn default() -> Self {
        Self::under("data")
    }
}

impl DataSources {
    /// No sources configured.
    pub fn empty() -> Self {
        Self {
            paths: BTreeMap::new(),
        }
    }

    /// Default file names placed under `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let paths = Condition::ALL
            .into_iter()
            .map(|c| (c, root.join(default_file_name(c))))
            .collect();
        Self { paths }
    }

    /// Parse a JSON object such as `{"ECN": "a.csv", "VRM": "b.csv"}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Rebase on `SWAY_DATA_DIR` when it is set.
    pub fn with_env(self) -> Self {
        match env::var_os("SWAY_DATA_DIR") {
            Some(dir) => self.rebase(PathBuf::from(dir)),
            None => self,
        }
    }

    /// Keep file names but move them under `root`.
    pub fn rebase(self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let paths = self
            .paths
            .into_iter()
            .map(|(c, p)| {
                let name = p.file_name().map(PathBuf::from).unwrap_or(p);
                (c, root.join(name))
            })
            .collect();
        Self { paths }
    }

    /// Set or replace the path for one condition.
    pub fn with(mut self, condition: Condition, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(condition, path.into());
        self
    }

    /// Path configured for `condition`.
    pub fn get(&self, condition: Condition) -> Option<&Path> {
        self.paths.get(&condition).map(PathBuf::as_path)
    }

    /// Configured `(condition, path)` pairs in condition order.
    pub fn iter(&self) -> impl Iterator<Item = (Condition, &Path)> {
        self.paths.iter().map(|(c, p)| (*c, p.as_path()))
    }

    /// Number of configured conditions.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when nothing is configured.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn default_file_name(condition: Condition) -> &'static str {
    match condition {
        Condition::EyesClosedNormal => "ecn_aggregate.csv",
        Condition::EyesClosedReduced => "ECR_All.csv",
        Condition::VrNormal => "WON_All.csv",
        Condition::VrMusic => "WOR_All.csv",
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.trim().parse().ok()
}

fn parse_bool_env(key: &str) -> Option<bool> {
    match env::var(key).ok()?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
