//! Streaming statistics against batch references on randomly gapped data.

use anen_stats::{MetricCalculator, sd_circular, sd_linear};
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn gapped_series(rng: &mut StdRng, n: usize, nan_prob: f64, scale: f64) -> Vec<f64> {
    (0..n)
        .map(|_| {
            if rng.random_bool(nan_prob) {
                f64::NAN
            } else {
                rng.random::<f64>() * scale
            }
        })
        .collect()
}

fn assert_same(a: f64, b: f64) {
    if a.is_nan() || b.is_nan() {
        assert!(a.is_nan() && b.is_nan(), "{a} vs {b}");
    } else {
        assert_relative_eq!(a, b, epsilon = 1e-9, max_relative = 1e-9);
    }
}

#[test]
fn linear_prefixes_match_batch() {
    for (seed, nan_prob) in [0.0, 0.3, 0.5, 0.7, 0.9, 1.0].into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let series = gapped_series(&mut rng, 200, nan_prob, 40.0);
        let mut calc = MetricCalculator::linear();
        for i in 0..series.len() {
            calc.push(series[i]);
            assert_same(calc.standard_deviation(), sd_linear(&series[..=i]));
        }
    }
}

#[test]
fn circular_prefixes_match_batch() {
    for (seed, nan_prob) in [0.0, 0.3, 0.5, 0.7, 0.9, 1.0].into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(100 + seed as u64);
        let series = gapped_series(&mut rng, 200, nan_prob, 360.0);
        let mut calc = MetricCalculator::circular();
        for i in 0..series.len() {
            calc.push(series[i]);
            assert_same(calc.standard_deviation(), sd_circular(&series[..=i]));
        }
    }
}

#[test]
fn uniform_directions_have_large_spread() {
    let mut rng = StdRng::seed_from_u64(7);
    let series = gapped_series(&mut rng, 5000, 0.0, 360.0);
    // Near-uniform angles push the Yamartino estimate towards its ceiling
    // of 90 * (1 + k).
    let sd = sd_circular(&series);
    assert!(sd > 90.0 && sd < 104.0, "sd = {sd}");
}
