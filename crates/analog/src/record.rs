//! One scored candidate in a unit's buffer.

use std::cmp::Ordering;

use anen_knn::nan_last_cmp;

/// A candidate forecast scored against a test forecast.
///
/// Rejected candidates keep a slot in the buffer as [`SimilarityRecord::REJECTED`].
/// Equality treats two NaN metrics as equal.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRecord {
    /// Similarity metric; lower is more similar, NaN when undefined.
    pub metric: f64,
    /// Forecast time index of the candidate.
    pub search_time: Option<usize>,
    /// Observation time index verifying the candidate.
    pub observation_time: Option<usize>,
    /// Forecast station that supplied the candidate.
    pub station: Option<usize>,
}

impl SimilarityRecord {
    /// Placeholder for a candidate that failed admissibility.
    pub const REJECTED: Self = Self {
        metric: f64::NAN,
        search_time: None,
        observation_time: None,
        station: None,
    };

    /// Returns `true` for a candidate that failed admissibility.
    #[inline]
    pub fn is_rejected(&self) -> bool {
        self.search_time.is_none()
    }

    /// Orders by metric ascending with NaN last.
    #[inline]
    pub fn cmp_metric(&self, other: &Self) -> Ordering {
        nan_last_cmp(self.metric, other.metric)
    }
}

impl PartialEq for SimilarityRecord {
    fn eq(&self, other: &Self) -> bool {
        let both_nan = self.metric.is_nan() && other.metric.is_nan();
        (self.metric == other.metric || both_nan)
            && self.search_time == other.search_time
            && self.observation_time == other.observation_time
            && self.station == other.station
    }
}

impl Default for SimilarityRecord {
    fn default() -> Self {
        Self::REJECTED
    }
}

/// `Some(i)` as `i as f64`, `None` as NaN.
#[inline]
pub(crate) fn index_value(index: Option<usize>) -> f64 {
    index.map_or(f64::NAN, |i| i as f64)
}
