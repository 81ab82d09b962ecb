//! Nearest-sample lookup by time.
//!
//! Used once per animation frame, so lookups are a single binary search over
//! the already-sorted series and never allocate.

use crate::store::Sample;

/// Index of the sample whose time is closest to `t`.
///
/// `samples` must be sorted ascending by time. Queries outside the recorded
/// range clamp to the first or last sample. Between two samples the closer
/// one wins and an exact tie goes to the earlier sample. Returns `None` for
/// an empty slice or a NaN query.
pub fn find_nearest_index(samples: &[Sample], t: f64) -> Option<usize> {
    let last = samples.len().checked_sub(1)?;
    if t.is_nan() {
        return None;
    }
    if t >= samples[last].time {
        return Some(last);
    }
    if t <= samples[0].time {
        return Some(0);
    }

    // First index with time >= t. The clamps above guarantee 0 < hi <= last.
    let hi = samples.partition_point(|s| s.time < t);
    if samples[hi].time == t {
        return Some(hi);
    }
    let lo = hi - 1;

    let before = t - samples[lo].time;
    let after = samples[hi].time - t;
    if before <= after {
        Some(lo)
    } else {
        Some(hi)
    }
}

/// Copy of the sample whose time is closest to `t`.
///
/// See [`find_nearest_index`] for the selection rules.
pub fn find_nearest(samples: &[Sample], t: f64) -> Option<Sample> {
    find_nearest_index(samples, t).map(|i| samples[i])
}
