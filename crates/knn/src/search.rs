//! Neighbour tables and nearest-station matching.

use crate::config::NeighborConfig;
use crate::distance::distances;
use crate::error::KnnError;
use crate::select::select_k_nearest;

/// Per-station neighbour lists, each ordered by ascending distance.
///
/// Immutable once built; shared read-only by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStationTable {
    neighbors: Vec<Vec<usize>>,
}

impl SearchStationTable {
    /// Wraps precomputed neighbour lists (one per target station).
    pub fn from_lists(neighbors: Vec<Vec<usize>>) -> Self {
        Self { neighbors }
    }

    /// Table where every station's only neighbour is itself.
    pub fn identity(n_stations: usize) -> Self {
        Self {
            neighbors: (0..n_stations).map(|s| vec![s]).collect(),
        }
    }

    /// Neighbour indices of a target station, nearest first.
    pub fn neighbors(&self, station: usize) -> &[usize] {
        &self.neighbors[station]
    }

    /// Number of target stations.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns `true` if the table has no target stations.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Length of the longest neighbour list.
    pub fn max_neighbors(&self) -> usize {
        self.neighbors.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Lists in target-station order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.neighbors.iter().map(Vec::as_slice)
    }
}

/// Reusable buffers for repeated neighbour queries.
#[derive(Debug, Clone, Default)]
struct NeighborScratch {
    dists: Vec<f64>,
    pairs: Vec<(f64, usize)>,
    nn_indices: Vec<usize>,
}

impl NeighborScratch {
    fn new(n_candidates: usize) -> Self {
        Self {
            dists: Vec::with_capacity(n_candidates),
            pairs: Vec::with_capacity(n_candidates),
            nn_indices: Vec::with_capacity(n_candidates),
        }
    }
}

fn check_coordinates(input: &'static str, coordinates: &[(f64, f64)]) -> Result<(), KnnError> {
    if coordinates
        .iter()
        .any(|(x, y)| !x.is_finite() || !y.is_finite())
    {
        return Err(KnnError::NonFiniteCoordinate { input });
    }
    Ok(())
}

fn check_tags(input: &'static str, tags: &[u32], expected: usize) -> Result<(), KnnError> {
    if tags.len() != expected {
        return Err(KnnError::TagsLengthMismatch {
            input,
            expected,
            got: tags.len(),
        });
    }
    Ok(())
}

/// Neighbours of one target point among `candidates`, written to
/// `scratch.nn_indices`.
fn query(
    target: (f64, f64),
    target_tag: u32,
    own_index: Option<usize>,
    candidates: &[(f64, f64)],
    candidate_tags: &[u32],
    config: &NeighborConfig,
    scratch: &mut NeighborScratch,
) {
    scratch.dists.clear();
    scratch.dists.resize(candidates.len(), 0.0);
    distances(target, candidates, &mut scratch.dists);

    let threshold = config.distance_threshold();
    let match_tags = config.match_tags();
    let eligible = |i: usize, d: f64| {
        threshold.is_none_or(|t| d <= t) && (!match_tags || candidate_tags[i] == target_tag)
    };
    select_k_nearest(
        &scratch.dists,
        config.num_nearest(),
        own_index,
        eligible,
        &mut scratch.pairs,
        &mut scratch.nn_indices,
    );
}

/// Builds the neighbour table of every target station.
///
/// For target `i` the list holds at most `num_nearest` candidate indices
/// (all eligible candidates when `num_nearest == 0`) with distance within
/// the threshold and, if tag matching is on, the same tag. When targets and
/// candidates are the same set, a station is always its own first
/// neighbour, even when another station shares its coordinates.
///
/// # Errors
///
/// Returns [`KnnError`] if the config is invalid, candidates are empty,
/// tag slices have the wrong length, or a coordinate is non-finite.
///
/// # Example
///
/// ```
/// use anen_knn::{NeighborConfig, search_stations};
///
/// let coords = [(0.0, 0.0), (1.0, 0.0), (5.0, 5.0)];
/// let tags = [0, 0, 0];
/// let table = search_stations(&coords, &tags, &coords, &tags, &NeighborConfig::new(2)).unwrap();
/// assert_eq!(table.neighbors(0), &[0, 1]);
/// assert_eq!(table.neighbors(2), &[2, 1]);
/// ```
pub fn search_stations(
    targets: &[(f64, f64)],
    target_tags: &[u32],
    candidates: &[(f64, f64)],
    candidate_tags: &[u32],
    config: &NeighborConfig,
) -> Result<SearchStationTable, KnnError> {
    config.validate()?;
    if candidates.is_empty() {
        return Err(KnnError::EmptyCandidates);
    }
    check_coordinates("targets", targets)?;
    check_coordinates("candidates", candidates)?;
    check_tags("targets", target_tags, targets.len())?;
    check_tags("candidates", candidate_tags, candidates.len())?;

    let same_set = targets == candidates && target_tags == candidate_tags;
    let mut scratch = NeighborScratch::new(candidates.len());
    let neighbors = targets
        .iter()
        .zip(target_tags.iter())
        .enumerate()
        .map(|(i, (&target, &tag))| {
            let own_index = same_set.then_some(i);
            query(target, tag, own_index, candidates, candidate_tags, config, &mut scratch);
            scratch.nn_indices.clone()
        })
        .collect();
    Ok(SearchStationTable { neighbors })
}

/// Matches every `from` station to its single nearest `to` station.
///
/// Ties go to the lower `to` index.
///
/// # Errors
///
/// Returns [`KnnError::EmptyCandidates`] if `to` is empty, or
/// [`KnnError::NonFiniteCoordinate`] on a NaN or infinite coordinate.
pub fn match_nearest(from: &[(f64, f64)], to: &[(f64, f64)]) -> Result<Vec<usize>, KnnError> {
    if to.is_empty() {
        return Err(KnnError::EmptyCandidates);
    }
    check_coordinates("targets", from)?;
    check_coordinates("candidates", to)?;

    let config = NeighborConfig::new(1);
    let tags = vec![0; to.len()];
    let mut scratch = NeighborScratch::new(to.len());
    Ok(from
        .iter()
        .map(|&target| {
            query(target, 0, None, to, &tags, &config, &mut scratch);
            scratch.nn_indices[0]
        })
        .collect())
}
