//! Error types for the anen-analog crate.

use anen_data::DataError;
use anen_knn::KnnError;
use anen_stats::StatsError;

/// Error type for all fallible operations in the anen-analog crate.
///
/// Every variant is raised before any parallel work starts; a failed call
/// never returns a partial result. Missing values inside the data are not
/// errors: they surface as NaN metrics or NaN ensemble members.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalogError {
    /// Returned when `num_analogs` is zero.
    #[error("num_analogs must be >= 1, got {num_analogs}")]
    InvalidMemberCount {
        /// The invalid member count.
        num_analogs: usize,
    },

    /// Returned when fewer similarity records than analogs are requested.
    #[error("num_similarity ({num_similarity}) must be >= num_analogs ({num_analogs})")]
    SimilarityBelowAnalogs {
        /// Requested similarity records per unit.
        num_similarity: usize,
        /// Requested analog members per unit.
        num_analogs: usize,
    },

    /// Returned when more similarity records are requested than there are
    /// candidates per unit.
    #[error("num_similarity ({num_similarity}) exceeds the {candidates} candidates per unit")]
    TooManyMembers {
        /// Requested similarity records per unit.
        num_similarity: usize,
        /// Largest candidate count of any unit.
        candidates: usize,
    },

    /// Returned when operational mode has no test times to accumulate.
    #[error("operational mode needs at least one test time")]
    EmptyAccumulation,

    /// Returned when the weight vector does not have one entry per parameter.
    #[error("{got} weights supplied for {expected} parameters")]
    WeightCountMismatch {
        /// Number of forecast parameters.
        expected: usize,
        /// Number of weights supplied.
        got: usize,
    },

    /// Returned when a weight is negative or non-finite.
    #[error("weight of parameter {parameter} must be finite and >= 0, got {weight}")]
    InvalidWeights {
        /// Parameter position.
        parameter: usize,
        /// The offending weight.
        weight: f64,
    },

    /// Returned when a test or search index is past the forecast time axis.
    #[error("{role} index {index} out of range for {n_times} forecast times")]
    TimeIndexOutOfRange {
        /// `"test"` or `"search"`.
        role: &'static str,
        /// The offending index.
        index: usize,
        /// Length of the forecast time axis.
        n_times: usize,
    },

    /// Returned when the observation parameter index is out of range.
    #[error("observation parameter {index} out of range for {n_parameters} parameters")]
    ParameterIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of observation parameters.
        n_parameters: usize,
    },

    /// Returned when forecasts and observations disagree on station count.
    #[error("forecasts have {forecast} stations but observations have {observation}")]
    StationCountMismatch {
        /// Forecast station count.
        forecast: usize,
        /// Observation station count.
        observation: usize,
    },

    /// Returned when the time mapping does not match the forecast axes.
    #[error(
        "time mapping is {got_times}x{got_lead_times}, expected {n_times}x{n_lead_times}"
    )]
    MappingShapeMismatch {
        /// Forecast time count.
        n_times: usize,
        /// Forecast lead-time count.
        n_lead_times: usize,
        /// Mapping time extent.
        got_times: usize,
        /// Mapping lead-time extent.
        got_lead_times: usize,
    },

    /// Returned when a station table or match refers to a station that does
    /// not exist, or covers the wrong number of stations.
    #[error("{what}: {detail}")]
    StationTableMismatch {
        /// Which table is inconsistent.
        what: &'static str,
        /// Description of the inconsistency.
        detail: String,
    },

    /// Returned when operational mode time ordering does not hold.
    #[error("operational ordering violated: {reason}")]
    OperationalOrdering {
        /// Which ordering rule failed.
        reason: &'static str,
    },

    /// Returned when zero shards are requested.
    #[error("n_shards must be >= 1, got {n_shards}")]
    InvalidShardCount {
        /// The invalid shard count.
        n_shards: usize,
    },

    /// Wraps an error from the statistics layer.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Wraps an error from the data layer.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Wraps an error from the neighbour search.
    #[error(transparent)]
    Knn(#[from] KnnError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_member_count() {
        let e = AnalogError::InvalidMemberCount { num_analogs: 0 };
        assert_eq!(e.to_string(), "num_analogs must be >= 1, got 0");
    }

    #[test]
    fn error_similarity_below_analogs() {
        let e = AnalogError::SimilarityBelowAnalogs {
            num_similarity: 3,
            num_analogs: 5,
        };
        assert_eq!(
            e.to_string(),
            "num_similarity (3) must be >= num_analogs (5)"
        );
    }

    #[test]
    fn error_too_many_members() {
        let e = AnalogError::TooManyMembers {
            num_similarity: 30,
            candidates: 12,
        };
        assert_eq!(
            e.to_string(),
            "num_similarity (30) exceeds the 12 candidates per unit"
        );
    }

    #[test]
    fn error_empty_accumulation() {
        let e = AnalogError::EmptyAccumulation;
        assert_eq!(e.to_string(), "operational mode needs at least one test time");
    }

    #[test]
    fn error_weight_count_mismatch() {
        let e = AnalogError::WeightCountMismatch {
            expected: 4,
            got: 2,
        };
        assert_eq!(e.to_string(), "2 weights supplied for 4 parameters");
    }

    #[test]
    fn error_invalid_weights() {
        let e = AnalogError::InvalidWeights {
            parameter: 1,
            weight: -0.5,
        };
        assert_eq!(
            e.to_string(),
            "weight of parameter 1 must be finite and >= 0, got -0.5"
        );
    }

    #[test]
    fn error_time_index_out_of_range() {
        let e = AnalogError::TimeIndexOutOfRange {
            role: "search",
            index: 12,
            n_times: 10,
        };
        assert_eq!(
            e.to_string(),
            "search index 12 out of range for 10 forecast times"
        );
    }

    #[test]
    fn error_parameter_index_out_of_range() {
        let e = AnalogError::ParameterIndexOutOfRange {
            index: 3,
            n_parameters: 2,
        };
        assert_eq!(
            e.to_string(),
            "observation parameter 3 out of range for 2 parameters"
        );
    }

    #[test]
    fn error_station_count_mismatch() {
        let e = AnalogError::StationCountMismatch {
            forecast: 5,
            observation: 4,
        };
        assert_eq!(
            e.to_string(),
            "forecasts have 5 stations but observations have 4"
        );
    }

    #[test]
    fn error_mapping_shape_mismatch() {
        let e = AnalogError::MappingShapeMismatch {
            n_times: 9,
            n_lead_times: 4,
            got_times: 9,
            got_lead_times: 3,
        };
        assert_eq!(e.to_string(), "time mapping is 9x3, expected 9x4");
    }

    #[test]
    fn error_station_table_mismatch() {
        let e = AnalogError::StationTableMismatch {
            what: "search stations",
            detail: "3 lists for 4 stations".to_string(),
        };
        assert_eq!(e.to_string(), "search stations: 3 lists for 4 stations");
    }

    #[test]
    fn error_operational_ordering() {
        let e = AnalogError::OperationalOrdering {
            reason: "test times must be strictly increasing",
        };
        assert_eq!(
            e.to_string(),
            "operational ordering violated: test times must be strictly increasing"
        );
    }

    #[test]
    fn error_invalid_shard_count() {
        let e = AnalogError::InvalidShardCount { n_shards: 0 };
        assert_eq!(e.to_string(), "n_shards must be >= 1, got 0");
    }

    #[test]
    fn error_wraps_lower_layers_transparently() {
        let e: AnalogError = StatsError::UnsupportedOperation {
            operation: "variance of a circular variable",
        }
        .into();
        assert_eq!(
            e.to_string(),
            "unsupported operation: variance of a circular variable"
        );

        let e: AnalogError = KnnError::MissingNeighbourCriteria.into();
        assert_eq!(
            e.to_string(),
            "num_nearest is 0 and no distance threshold is set"
        );

        let e: AnalogError = DataError::ShapeMismatch {
            expected: 4,
            got: 5,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "buffer length 5 does not match shape volume 4"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<AnalogError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<AnalogError>();
    }
}
