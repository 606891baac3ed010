//! Error types for the anen-knn crate.

/// Error type for all fallible operations in the anen-knn crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KnnError {
    /// Returned when there are no candidate stations to search.
    #[error("no candidate stations provided")]
    EmptyCandidates,

    /// Returned when neither a neighbour count nor a distance threshold
    /// bounds the search.
    #[error("num_nearest is 0 and no distance threshold is set")]
    MissingNeighbourCriteria,

    /// Returned when the distance threshold is non-finite or non-positive.
    #[error("distance threshold must be finite and positive, got {threshold}")]
    InvalidThreshold {
        /// The invalid threshold.
        threshold: f64,
    },

    /// Returned when a tag slice does not have one entry per station.
    #[error("{input} has {got} tags for {expected} stations")]
    TagsLengthMismatch {
        /// Which station set the tags belong to.
        input: &'static str,
        /// Number of stations.
        expected: usize,
        /// Number of tags supplied.
        got: usize,
    },

    /// Returned when a station coordinate is NaN or infinite.
    #[error("non-finite coordinate in {input}")]
    NonFiniteCoordinate {
        /// Which station set contains the bad coordinate.
        input: &'static str,
    },
}
