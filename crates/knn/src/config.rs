//! Configuration for neighbour-station searches.

use crate::error::KnnError;

/// Criteria bounding the neighbour list of every station.
///
/// At least one of `num_nearest > 0` or a distance threshold must be set.
/// With `num_nearest == 0` every station within the threshold is kept.
///
/// # Example
///
/// ```
/// use anen_knn::NeighborConfig;
///
/// let config = NeighborConfig::new(4).with_distance_threshold(Some(2.5));
/// assert!(config.validate().is_ok());
///
/// let unbounded = NeighborConfig::new(0);
/// assert!(unbounded.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborConfig {
    /// Maximum number of neighbours, including the station itself.
    num_nearest: usize,
    /// Inclusive Euclidean distance cut-off.
    distance_threshold: Option<f64>,
    /// Only pair stations that share a tag.
    match_tags: bool,
}

impl NeighborConfig {
    /// Creates a configuration keeping at most `num_nearest` neighbours.
    ///
    /// Defaults: no distance threshold, tags ignored.
    pub fn new(num_nearest: usize) -> Self {
        Self {
            num_nearest,
            distance_threshold: None,
            match_tags: false,
        }
    }

    /// Sets the inclusive distance threshold.
    pub fn with_distance_threshold(mut self, threshold: Option<f64>) -> Self {
        self.distance_threshold = threshold;
        self
    }

    /// Restricts neighbours to stations with the same tag.
    pub fn with_match_tags(mut self, match_tags: bool) -> Self {
        self.match_tags = match_tags;
        self
    }

    /// Maximum neighbour count; 0 means unbounded within the threshold.
    pub fn num_nearest(&self) -> usize {
        self.num_nearest
    }

    /// Distance threshold, if any.
    pub fn distance_threshold(&self) -> Option<f64> {
        self.distance_threshold
    }

    /// Whether tag matching is on.
    pub fn match_tags(&self) -> bool {
        self.match_tags
    }

    /// Validates this configuration.
    ///
    /// Returns an error if the threshold is non-finite or non-positive, or
    /// if neither a count nor a threshold bounds the search.
    pub fn validate(&self) -> Result<(), KnnError> {
        if let Some(threshold) = self.distance_threshold {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(KnnError::InvalidThreshold { threshold });
            }
        } else if self.num_nearest == 0 {
            return Err(KnnError::MissingNeighbourCriteria);
        }
        Ok(())
    }
}

impl Default for NeighborConfig {
    fn default() -> Self {
        Self::new(1)
    }
}
