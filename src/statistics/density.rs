//! Epanechnikov kernel density estimation.

use serde::{Deserialize, Serialize};

/// Density curve sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    /// Evaluation point.
    pub x: f64,
    /// Estimated density at `x`.
    pub density: f64,
}

/// Epanechnikov kernel with bandwidth `k`.
///
/// `0.75 * (1 - (u/k)^2) / k` inside `|u/k| <= 1`, zero outside.
#[inline]
pub fn epanechnikov(u: f64, k: f64) -> f64 {
    let z = u / k;
    if z.abs() <= 1.0 {
        0.75 * (1.0 - z * z) / k
    } else {
        0.0
    }
}

/// `count` evenly spaced points from `start` to `end`, both included.
///
/// A single point sits at `start`.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i + 1 == count { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Kernel density of `values` evaluated at each of `points`.
///
/// `density(x) = mean over v of epanechnikov(x - v, bandwidth)`. An empty
/// `values` slice gives zero density everywhere.
pub fn kernel_density(values: &[f64], points: &[f64], bandwidth: f64) -> Vec<DensityPoint> {
    let n = values.len();
    points
        .iter()
        .map(|&x| {
            let density = if n == 0 {
                0.0
            } else {
                values.iter().map(|&v| epanechnikov(x - v, bandwidth)).sum::<f64>() / n as f64
            };
            DensityPoint { x, density }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_shape() {
        assert!((epanechnikov(0.0, 7.0) - 0.75 / 7.0).abs() < 1e-15);
        assert_eq!(epanechnikov(7.0, 7.0), 0.0);
        assert_eq!(epanechnikov(-7.5, 7.0), 0.0);
        assert_eq!(epanechnikov(3.0, 7.0), epanechnikov(-3.0, 7.0));
    }

    #[test]
    fn kernel_integrates_to_one() {
        let k = 2.0;
        let xs = linspace(-k, k, 4001);
        let dx = xs[1] - xs[0];
        let area: f64 = xs.iter().map(|&x| epanechnikov(x, k) * dx).sum();
        assert!((area - 1.0).abs() < 1e-3, "area = {area}");
    }

    #[test]
    fn linspace_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 9.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.0, 0.0, 3), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn density_peaks_at_the_data() {
        let values = [1.0, 1.0, 1.0];
        let curve = kernel_density(&values, &linspace(0.0, 2.0, 21), 0.5);
        let peak = curve
            .iter()
            .max_by(|a, b| a.density.total_cmp(&b.density))
            .unwrap();
        assert!((peak.x - 1.0).abs() < 1e-12);
        assert!((peak.density - 0.75 / 0.5).abs() < 1e-12);
        assert_eq!(curve[0].density, 0.0);
    }

    #[test]
    fn empty_values_give_zero_density() {
        let curve = kernel_density(&[], &[0.0, 1.0], 1.0);
        assert!(curve.iter().all(|p| p.density == 0.0));
    }
}
