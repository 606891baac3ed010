//! Test forecasts that also sit in the search archive.

mod common;

use anen_analog::{AnalogConfig, AnalogInputs, OutputSelection, compute};
use common::random_dataset;

#[test]
fn test_time_never_selects_itself() {
    let d = random_dataset(21, 3, 12, 3, 0.0);
    let search: Vec<usize> = (0..12).collect();
    let test = vec![5, 11];
    let inputs = AnalogInputs::new(&d.forecasts, &d.observations, &d.mapping, &test, &search);
    let outputs = OutputSelection {
        similarity: true,
        similarity_time_index: true,
        ..OutputSelection::default()
    };
    // Every other search time fits in the similarity buffer.
    let config = AnalogConfig::new(3)
        .with_num_similarity(11)
        .with_prevent_search_future(false)
        .with_quick_selection(false)
        .with_outputs(outputs);
    let result = compute(&inputs, &config).unwrap();

    let times = result.similarity_time_index().unwrap();
    let metric = result.similarity().unwrap();
    assert_eq!(times.shape(), [3, 2, 3, 11]);
    for s in 0..3 {
        for (i, &t) in test.iter().enumerate() {
            for l in 0..3 {
                let mut seen: Vec<usize> = (0..11)
                    .map(|rank| {
                        assert!(!metric.get([s, i, l, rank]).is_nan());
                        times.get([s, i, l, rank]) as usize
                    })
                    .collect();
                seen.sort_unstable();
                let expected: Vec<usize> = search.iter().copied().filter(|&c| c != t).collect();
                assert_eq!(seen, expected, "station {s}, test time {t}, lead {l}");
            }
        }
    }
}

#[test]
fn oversized_lead_time_radius_covers_whole_axis() {
    let d = random_dataset(22, 2, 10, 3, 0.1);
    let search: Vec<usize> = (0..8).collect();
    let test = vec![8, 9];
    let inputs = AnalogInputs::new(&d.forecasts, &d.observations, &d.mapping, &test, &search);
    let config = AnalogConfig::new(2).with_num_similarity(4);

    let huge = compute(&inputs, &config.clone().with_lead_time_radius(usize::MAX)).unwrap();
    let full = compute(&inputs, &config.with_lead_time_radius(2)).unwrap();
    assert!(common::same(huge.analogs(), full.analogs()));
}
