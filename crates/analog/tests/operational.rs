//! Operational mode: accumulating SDs and test times joining the archive.

mod common;

use anen_analog::{AnalogConfig, AnalogInputs, OutputSelection, compute, standard_deviations};
use anen_data::DenseArray;
use approx::assert_relative_eq;
use common::random_dataset;

fn assert_close_or_nan(a: f64, b: f64) {
    if a.is_nan() || b.is_nan() {
        assert!(a.is_nan() && b.is_nan(), "{a} vs {b}");
    } else {
        assert_relative_eq!(a, b, max_relative = 1e-9, epsilon = 1e-9);
    }
}

/// Step `i` of the operational table equals a fixed table over the search
/// times plus the first `i` test times, at every NaN density.
#[test]
fn running_sd_matches_fixed_sd() {
    for (seed, nan_prob) in [0.0, 0.3, 0.5, 0.7, 0.9, 1.0].into_iter().enumerate() {
        let d = random_dataset(100 + seed as u64, 3, 30, 2, nan_prob);
        let weights = [1.0, 1.0];
        let circulars = d.forecasts.parameters().circulars();
        let fixed: Vec<usize> = (0..10).collect();
        let accumulation: Vec<usize> = (10..30).collect();

        let running =
            standard_deviations(&d.forecasts, &weights, &circulars, &fixed, Some(accumulation.as_slice())).unwrap();
        assert_eq!(running.shape(), [2, 3, 2, 20]);

        for step in 0..20 {
            let mut times = fixed.clone();
            times.extend_from_slice(&accumulation[..step]);
            let batch: DenseArray<4> =
                standard_deviations(&d.forecasts, &weights, &circulars, &times, None).unwrap();
            for p in 0..2 {
                for s in 0..3 {
                    for l in 0..2 {
                        assert_close_or_nan(running.get([p, s, l, step]), batch.get([p, s, l, 0]));
                    }
                }
            }
        }
    }
}

#[test]
fn first_test_time_matches_independent_search() {
    let d = random_dataset(7, 4, 20, 2, 0.1);
    let search: Vec<usize> = (0..14).collect();
    let test: Vec<usize> = (14..20).collect();
    let outputs = OutputSelection {
        analogs: true,
        similarity: true,
        similarity_time_index: true,
        ..OutputSelection::default()
    };
    let config = AnalogConfig::new(3)
        .with_num_similarity(6)
        .with_quick_selection(false)
        .with_outputs(outputs);

    let operational = AnalogInputs::new(&d.forecasts, &d.observations, &d.mapping, &test, &search);
    let op = compute(&operational, &config.clone().with_operational(true)).unwrap();

    let first = AnalogInputs::new(&d.forecasts, &d.observations, &d.mapping, &test[..1], &search);
    let is = compute(&first, &config).unwrap();

    let op_sims = op.similarity().unwrap();
    let is_sims = is.similarity().unwrap();
    for s in 0..4 {
        for l in 0..2 {
            for k in 0..6 {
                let a = op_sims.get([s, 0, l, k]);
                let b = is_sims.get([s, 0, l, k]);
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
    }
}

#[test]
fn later_test_times_search_earlier_ones() {
    let d = random_dataset(8, 3, 20, 1, 0.0);
    let search: Vec<usize> = (0..4).collect();
    let test: Vec<usize> = (4..20).collect();
    let config = AnalogConfig::new(2)
        .with_num_similarity(19)
        .with_lead_time_radius(0)
        .with_operational(true)
        .with_quick_selection(false)
        .with_outputs(OutputSelection {
            similarity_time_index: true,
            ..OutputSelection::default()
        });
    let inputs = AnalogInputs::new(&d.forecasts, &d.observations, &d.mapping, &test, &search);
    let result = compute(&inputs, &config).unwrap();
    let times = result.similarity_time_index().unwrap();

    for s in 0..3 {
        for (i, &current) in test.iter().enumerate() {
            let mut retained: Vec<usize> = (0..19)
                .map(|k| times.get([s, i, 0, k]))
                .filter(|v| !v.is_nan())
                .map(|v| v as usize)
                .collect();
            retained.sort_unstable();
            // No NaN data: every earlier time is admissible and retained.
            let expected: Vec<usize> = (0..current).collect();
            assert_eq!(retained, expected, "station {s}, test {current}");
        }
    }
}
