//! Equal-width histogram of permutation statistics.

use serde::{Deserialize, Serialize};

/// Headroom applied to the largest statistic when sizing the domain.
pub const DOMAIN_HEADROOM: f64 = 1.1;

/// One histogram bin covering `[x0, x1)`; the last bin is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Lower edge.
    pub x0: f64,
    /// Upper edge.
    pub x1: f64,
    /// Values falling in the bin.
    pub count: usize,
}

/// Upper edge of the histogram domain, `max(values) * 1.1`.
///
/// Values are absolute statistics, so the domain always starts at zero.
/// Returns 0.0 for an empty slice.
pub fn domain_upper(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max) * DOMAIN_HEADROOM
}

/// Count `values` into `bin_count` equal bins spanning `[lower, upper]`.
///
/// Bins are right-open except the last, which also takes values equal to
/// `upper`. Values outside the domain are not counted. When the domain has
/// zero width every in-domain value lands in the last (closed) bin.
pub fn histogram(values: &[f64], bin_count: usize, lower: f64, upper: f64) -> Vec<HistogramBin> {
    if bin_count == 0 {
        return Vec::new();
    }
    let width = (upper - lower) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            x0: lower + width * i as f64,
            x1: if i + 1 == bin_count {
                upper
            } else {
                lower + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    let last = bin_count - 1;
    for &v in values {
        if !(lower..=upper).contains(&v) {
            continue;
        }
        let idx = if width > 0.0 {
            bin_index(&bins, ((v - lower) / width) as usize, v)
        } else {
            last
        };
        bins[idx].count += 1;
    }
    bins
}

/// Correct a floor-based estimate against the stored edges.
fn bin_index(bins: &[HistogramBin], estimate: usize, v: f64) -> usize {
    let last = bins.len() - 1;
    let mut idx = estimate.min(last);
    while idx > 0 && v < bins[idx].x0 {
        idx -= 1;
    }
    while idx < last && v >= bins[idx].x1 {
        idx += 1;
    }
    idx
}
