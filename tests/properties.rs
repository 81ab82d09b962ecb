//! Properties that must hold for any input, checked over seeded random data.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use sway_analysis::statistics::kernel_density;
use sway_analysis::{
    find_nearest, find_nearest_index, load, Condition, ParticipantSeries, PermutationTester,
    Sample, SwayError,
};

fn random_samples(rng: &mut StdRng, n: usize) -> Vec<Sample> {
    let cop = Normal::new(0.0, 0.01).unwrap();
    (0..n)
        .map(|i| Sample::new(i as f64 * 0.05, cop.sample(rng), cop.sample(rng)))
        .collect()
}

/// Sorting shuffled input gives ascending time, and sorting again changes nothing.
#[test]
fn series_sort_is_ordered_and_idempotent() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..20 {
        let mut samples = random_samples(&mut rng, 50);
        samples.shuffle(&mut rng);

        let series = ParticipantSeries::from_samples(samples).unwrap();
        assert!(series.samples().windows(2).all(|w| w[0].time <= w[1].time));

        let again = ParticipantSeries::from_samples(series.samples().to_vec()).unwrap();
        assert_eq!(again.samples(), series.samples());
    }
}

/// Averages equal the arithmetic mean of the participant's samples.
#[test]
fn averages_match_the_mean() {
    let mut rng = StdRng::seed_from_u64(2);
    let samples = random_samples(&mut rng, 200);
    let mean_x = samples.iter().map(|s| s.cop_x).sum::<f64>() / 200.0;
    let mean_y = samples.iter().map(|s| s.cop_y).sum::<f64>() / 200.0;

    let series = ParticipantSeries::from_samples(samples).unwrap();
    assert!((series.avg_cop_x() - mean_x).abs() < 1e-12);
    assert!((series.avg_cop_y() - mean_y).abs() < 1e-12);
}

/// Rows with an unparseable required field never reach a series.
#[test]
fn unparseable_rows_are_dropped() {
    let rows: Vec<HashMap<&str, &str>> = [
        ("1", "0.0", "0.1"),
        ("1", "nan?", "0.1"),
        ("1", "0.2", ""),
        ("", "0.3", "0.1"),
        ("1", "0.4", "0.2"),
    ]
    .into_iter()
    .map(|(id, t, x)| {
        [("subject_id", id), ("Second", t), ("CoPx", x), ("CoPy", "0")]
            .into_iter()
            .collect()
    })
    .collect();

    let dataset = load(Condition::EyesClosedReduced, rows);
    assert_eq!(dataset.dropped_rows(), 3);
    let series = dataset.get(1).unwrap();
    assert_eq!(series.len(), 2);
    assert!(series.samples().iter().all(|s| s.cop_x.is_finite()));
}

/// Boundary and tie-break behaviour of the nearest lookup.
#[test]
fn nearest_boundaries() {
    let samples = vec![
        Sample::new(0.0, 0.0, 0.0),
        Sample::new(10.0, 1.0, 0.0),
        Sample::new(20.0, 2.0, 0.0),
    ];
    assert_eq!(find_nearest_index(&samples, -5.0), Some(0));
    assert_eq!(find_nearest_index(&samples, 25.0), Some(2));
    assert_eq!(find_nearest_index(&samples, 10.0), Some(1));
    assert_eq!(find_nearest_index(&samples, 6.0), Some(1));
    assert_eq!(find_nearest_index(&samples, 5.0), Some(0));
    assert_eq!(find_nearest(&[], 1.0), None);
}

/// The lookup always returns a sample at minimal distance.
#[test]
fn nearest_is_never_beaten_by_another_sample() {
    let mut rng = StdRng::seed_from_u64(3);
    let series = ParticipantSeries::from_samples(random_samples(&mut rng, 100)).unwrap();
    for _ in 0..500 {
        let t: f64 = rng.random_range(-1.0..6.0);
        let found = find_nearest(series.samples(), t).unwrap();
        let best = series
            .samples()
            .iter()
            .map(|s| (s.time - t).abs())
            .fold(f64::INFINITY, f64::min);
        assert_eq!((found.time - t).abs(), best);
    }
}

/// A fixed seed reproduces the statistics exactly.
#[test]
fn seeded_runs_are_reproducible() {
    let tester = PermutationTester::new().permutations(10).seed(11);
    let first = tester.run(&[1.0, 1.0, 1.0], &[5.0, 5.0, 5.0]).unwrap();
    let second = tester.run(&[1.0, 1.0, 1.0], &[5.0, 5.0, 5.0]).unwrap();

    assert_eq!(first.result.observed_statistic, 4.0);
    assert_eq!(
        first.result.permutation_statistics,
        second.result.permutation_statistics
    );
    assert_eq!(first.result.p_value, second.result.p_value);
}

/// Every permutation statistic lands in exactly one histogram bin.
#[test]
fn histogram_counts_sum_to_permutations() {
    let mut rng = StdRng::seed_from_u64(4);
    let noise = Normal::new(0.0, 1.0).unwrap();
    for permutations in [1, 17, 250] {
        let a: Vec<f64> = (0..30).map(|_| noise.sample(&mut rng)).collect();
        let b: Vec<f64> = (0..25).map(|_| noise.sample(&mut rng) + 0.5).collect();
        let report = PermutationTester::new()
            .permutations(permutations)
            .bins(12)
            .seed(permutations as u64)
            .run(&a, &b)
            .unwrap();

        let total: usize = report.histogram.iter().map(|bin| bin.count).sum();
        assert_eq!(total, permutations);
        assert_eq!(report.metadata.paired_len, 25);
        assert_eq!(report.density.len(), 100);
    }
}

/// With a bandwidth of one bin width the density curve is a smoothed,
/// normalized histogram: it integrates to about one, and scaled by
/// `permutations * bin_width` it reaches the modal bin's count.
#[test]
fn density_tracks_the_histogram() {
    let mut rng = StdRng::seed_from_u64(6);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let a: Vec<f64> = (0..40).map(|_| noise.sample(&mut rng)).collect();
    let b: Vec<f64> = (0..40).map(|_| noise.sample(&mut rng)).collect();
    let permutations = 2_000;

    let tester = PermutationTester::new()
        .permutations(permutations)
        .bins(30)
        .density_points(400)
        .seed(21);
    let coarse = tester.clone().run(&a, &b).unwrap();
    let bin_width = coarse.domain_upper() / 30.0;

    // Same seed, so the same statistics; only the smoothing changes.
    let report = tester.bandwidth(bin_width).run(&a, &b).unwrap();
    assert_eq!(
        report.result.permutation_statistics,
        coarse.result.permutation_statistics
    );

    let integral: f64 = report
        .density
        .windows(2)
        .map(|w| 0.5 * (w[0].density + w[1].density) * (w[1].x - w[0].x))
        .sum();
    assert!((integral - 1.0).abs() < 0.06, "integral {integral}");

    let modal = report
        .histogram
        .iter()
        .max_by_key(|bin| bin.count)
        .unwrap();
    let centre = 0.5 * (modal.x0 + modal.x1);
    let at_centre = kernel_density(&report.result.permutation_statistics, &[centre], bin_width)[0];
    let expected = at_centre.density * permutations as f64 * bin_width;
    let ratio = expected / modal.count as f64;
    assert!((0.5..=1.5).contains(&ratio), "ratio {ratio}");
}

/// Empty samples are rejected rather than producing NaN statistics.
#[test]
fn empty_input_is_rejected() {
    let tester = PermutationTester::new().seed(0);
    assert!(matches!(
        tester.run(&[], &[1.0]),
        Err(SwayError::EmptySample { len_a: 0, len_b: 1 })
    ));
    assert!(matches!(
        tester.run(&[1.0, 2.0], &[]),
        Err(SwayError::EmptySample { .. })
    ));
}
