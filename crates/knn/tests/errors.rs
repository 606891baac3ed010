//! Integration tests for KnnError variants.

use anen_knn::{KnnError, NeighborConfig, match_nearest, search_stations};

const COORDS: [(f64, f64); 3] = [(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)];
const TAGS: [u32; 3] = [0, 0, 0];

#[test]
fn error_missing_neighbour_criteria() {
    let result = search_stations(&COORDS, &TAGS, &COORDS, &TAGS, &NeighborConfig::new(0));
    assert_eq!(result, Err(KnnError::MissingNeighbourCriteria));
}

#[test]
fn error_invalid_threshold() {
    let config = NeighborConfig::new(2).with_distance_threshold(Some(-1.0));
    let result = search_stations(&COORDS, &TAGS, &COORDS, &TAGS, &config);
    assert!(matches!(
        result,
        Err(KnnError::InvalidThreshold { threshold }) if threshold == -1.0
    ));
}

#[test]
fn error_empty_candidates() {
    let result = search_stations(&COORDS, &TAGS, &[], &[], &NeighborConfig::new(1));
    assert_eq!(result, Err(KnnError::EmptyCandidates));
}

#[test]
fn error_tags_length_mismatch() {
    let result = search_stations(&COORDS, &[0, 0], &COORDS, &TAGS, &NeighborConfig::new(1));
    assert_eq!(
        result,
        Err(KnnError::TagsLengthMismatch {
            input: "targets",
            expected: 3,
            got: 2
        })
    );
}

#[test]
fn error_non_finite_coordinate() {
    let bad = [(0.0, f64::NAN)];
    let result = match_nearest(&bad, &COORDS);
    assert_eq!(
        result,
        Err(KnnError::NonFiniteCoordinate { input: "targets" })
    );
}

#[test]
fn empty_targets_give_empty_table() {
    let table = search_stations(&[], &[], &COORDS, &TAGS, &NeighborConfig::new(2)).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.max_neighbors(), 0);
}
