//! Samples and per-participant time series.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwayError};
use crate::nearest::{find_nearest, find_nearest_index};
use crate::types::{Channel, Metric};

/// One force-plate measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the start of the recording.
    pub time: f64,
    /// Medio-lateral centre of pressure.
    pub cop_x: f64,
    /// Antero-posterior centre of pressure.
    pub cop_y: f64,
    /// Moment about x, when the source carries it.
    pub mx: Option<f64>,
    /// Moment about y, when the source carries it.
    pub my: Option<f64>,
}

impl Sample {
    /// Sample without moment data.
    pub fn new(time: f64, cop_x: f64, cop_y: f64) -> Self {
        Self {
            time,
            cop_x,
            cop_y,
            mx: None,
            my: None,
        }
    }

    /// Attach moment data.
    pub fn with_moments(mut self, mx: f64, my: f64) -> Self {
        self.mx = Some(mx);
        self.my = Some(my);
        self
    }

    /// Value of a single channel; moments may be missing.
    pub fn channel(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::CopX => Some(self.cop_x),
            Channel::CopY => Some(self.cop_y),
            Channel::Mx => self.mx,
            Channel::My => self.my,
        }
    }
}

/// Time-ordered samples for one participant in one condition.
///
/// Always holds at least one sample. The averages are fixed at construction
/// and describe exactly the samples held.
///
/// Deserialization goes through [`ParticipantSeries::from_samples`]: stored
/// averages are ignored and recomputed, and an empty series is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredSeries")]
pub struct ParticipantSeries {
    samples: Vec<Sample>,
    avg_cop_x: f64,
    avg_cop_y: f64,
}

#[derive(Deserialize)]
struct StoredSeries {
    samples: Vec<Sample>,
}

impl TryFrom<StoredSeries> for ParticipantSeries {
    type Error = SwayError;

    fn try_from(stored: StoredSeries) -> Result<Self> {
        Self::from_samples(stored.samples).ok_or(SwayError::EmptySeries)
    }
}

impl ParticipantSeries {
    /// Build a series, stably sorting by time.
    ///
    /// Returns `None` for an empty input: a participant without samples has
    /// no series at all.
    pub fn from_samples(mut samples: Vec<Sample>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        // `sort_by` is stable, so equal timestamps keep their input order.
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));

        let n = samples.len() as f64;
        let avg_cop_x = samples.iter().map(|s| s.cop_x).sum::<f64>() / n;
        let avg_cop_y = samples.iter().map(|s| s.cop_y).sum::<f64>() / n;

        Some(Self {
            samples,
            avg_cop_x,
            avg_cop_y,
        })
    }

    /// Samples in ascending time order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false` for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean CoPx over the series.
    pub fn avg_cop_x(&self) -> f64 {
        self.avg_cop_x
    }

    /// Mean CoPy over the series.
    pub fn avg_cop_y(&self) -> f64 {
        self.avg_cop_y
    }

    /// First and last timestamps.
    pub fn time_extent(&self) -> (f64, f64) {
        let first = self.samples.first().map_or(0.0, |s| s.time);
        let last = self.samples.last().map_or(0.0, |s| s.time);
        (first, last)
    }

    /// Smallest and largest value across both channels of `metric`.
    ///
    /// `None` when no sample carries the metric (moments absent).
    pub fn value_range(&self, metric: Metric) -> Option<(f64, f64)> {
        let [a, b] = metric.channels();
        self.samples
            .iter()
            .flat_map(|s| [s.channel(a), s.channel(b)])
            .flatten()
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }

    /// Samples with `start <= time <= end`.
    pub fn window(&self, start: f64, end: f64) -> &[Sample] {
        let lo = self.samples.partition_point(|s| s.time < start);
        let hi = self.samples.partition_point(|s| s.time <= end);
        if lo >= hi {
            return &[];
        }
        &self.samples[lo..hi]
    }

    /// Values of one channel in time order, skipping missing moments.
    pub fn channel_values(&self, channel: Channel) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().filter_map(move |s| s.channel(channel))
    }

    /// Sample closest in time to `t`.
    pub fn nearest(&self, t: f64) -> Option<Sample> {
        find_nearest(&self.samples, t)
    }

    /// Index of the sample closest in time to `t`.
    pub fn nearest_index(&self, t: f64) -> Option<usize> {
        find_nearest_index(&self.samples, t)
    }
}
