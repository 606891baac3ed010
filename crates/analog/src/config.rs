//! Configuration for analog ensemble generation.

use anen_knn::NeighborConfig;

use crate::error::AnalogError;

/// Which arrays a run keeps in its [`AnalogResult`](crate::AnalogResult).
///
/// Only the analog members are kept by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSelection {
    /// Analog member values `[station][test][lead][member]`.
    pub analogs: bool,
    /// Observation-time index of every member.
    pub analogs_time_index: bool,
    /// Similarity metric of the best `num_similarity` candidates.
    pub similarity: bool,
    /// Forecast time index of the best `num_similarity` candidates.
    pub similarity_time_index: bool,
    /// Forecast station index of the best `num_similarity` candidates.
    pub similarity_station_index: bool,
    /// Normalization table `[parameter][station][lead][step]`.
    pub standard_deviation: bool,
    /// Neighbour table used for search space extension.
    pub search_stations: bool,
}

impl Default for OutputSelection {
    fn default() -> Self {
        Self {
            analogs: true,
            analogs_time_index: false,
            similarity: false,
            similarity_time_index: false,
            similarity_station_index: false,
            standard_deviation: false,
            search_stations: false,
        }
    }
}

/// Configuration for one analog ensemble run.
///
/// # Example
///
/// ```
/// use anen_analog::AnalogConfig;
///
/// let config = AnalogConfig::new(11)
///     .with_num_similarity(20)
///     .with_lead_time_radius(1)
///     .with_search_extension(true)
///     .with_num_nearest(5)
///     .with_distance_threshold(Some(0.5));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AnalogConfig {
    /// Members per ensemble.
    num_analogs: usize,
    /// Similarity records kept per unit.
    num_similarity: usize,
    /// Observation parameter that supplies member values.
    observation_parameter: usize,
    /// Tolerated NaN parameter contributions per metric.
    max_parameter_nan: usize,
    /// Tolerated NaN cells per lead-time window.
    max_lead_time_nan: usize,
    /// Half-width of the lead-time window.
    lead_time_radius: usize,
    /// Neighbour criteria for search space extension.
    neighbors: NeighborConfig,
    /// Search neighbouring stations as well as the station itself.
    search_extension: bool,
    /// Take member values from the neighbour that supplied the candidate.
    extend_observations: bool,
    /// Accumulate normalization and candidates through the test times.
    operational: bool,
    /// Skip candidates whose valid time is not before the test time.
    prevent_search_future: bool,
    /// Partial selection instead of a full sort of the best records.
    quick_selection: bool,
    /// Per-parameter weights overriding the forecast parameters' own.
    weights: Option<Vec<f64>>,
    /// Arrays kept in the result.
    outputs: OutputSelection,
}

impl AnalogConfig {
    /// Creates a configuration with `num_analogs` members.
    ///
    /// `num_similarity` starts equal to `num_analogs`; every other field
    /// takes its [`Default`] value.
    pub fn new(num_analogs: usize) -> Self {
        Self {
            num_analogs,
            num_similarity: num_analogs,
            ..Self::default()
        }
    }

    /// Sets the number of similarity records kept per unit.
    pub fn with_num_similarity(mut self, num_similarity: usize) -> Self {
        self.num_similarity = num_similarity;
        self
    }

    /// Sets the observation parameter supplying member values.
    pub fn with_observation_parameter(mut self, index: usize) -> Self {
        self.observation_parameter = index;
        self
    }

    /// Sets the tolerated number of NaN parameter contributions.
    pub fn with_max_parameter_nan(mut self, n: usize) -> Self {
        self.max_parameter_nan = n;
        self
    }

    /// Sets the tolerated number of NaN cells per lead-time window.
    pub fn with_max_lead_time_nan(mut self, n: usize) -> Self {
        self.max_lead_time_nan = n;
        self
    }

    /// Sets the half-width of the lead-time window.
    pub fn with_lead_time_radius(mut self, radius: usize) -> Self {
        self.lead_time_radius = radius;
        self
    }

    /// Sets the maximum neighbour count (0 = all within the threshold).
    pub fn with_num_nearest(mut self, n: usize) -> Self {
        self.neighbors = NeighborConfig::new(n)
            .with_distance_threshold(self.neighbors.distance_threshold())
            .with_match_tags(self.neighbors.match_tags());
        self
    }

    /// Sets the inclusive neighbour distance threshold.
    pub fn with_distance_threshold(mut self, threshold: Option<f64>) -> Self {
        self.neighbors = self.neighbors.with_distance_threshold(threshold);
        self
    }

    /// Restricts neighbours to stations sharing a tag.
    pub fn with_match_tags(mut self, match_tags: bool) -> Self {
        self.neighbors = self.neighbors.with_match_tags(match_tags);
        self
    }

    /// Enables search space extension across neighbour stations.
    pub fn with_search_extension(mut self, enabled: bool) -> Self {
        self.search_extension = enabled;
        self
    }

    /// Takes member values from the neighbour that supplied the candidate.
    pub fn with_extend_observations(mut self, enabled: bool) -> Self {
        self.extend_observations = enabled;
        self
    }

    /// Enables operational mode.
    pub fn with_operational(mut self, enabled: bool) -> Self {
        self.operational = enabled;
        self
    }

    /// Skips candidates verifying at or after the test time.
    pub fn with_prevent_search_future(mut self, enabled: bool) -> Self {
        self.prevent_search_future = enabled;
        self
    }

    /// Chooses partial selection (`true`) or a full sort (`false`).
    pub fn with_quick_selection(mut self, enabled: bool) -> Self {
        self.quick_selection = enabled;
        self
    }

    /// Overrides the forecast parameters' weights.
    pub fn with_weights(mut self, weights: Option<Vec<f64>>) -> Self {
        self.weights = weights;
        self
    }

    /// Chooses the arrays kept in the result.
    pub fn with_outputs(mut self, outputs: OutputSelection) -> Self {
        self.outputs = outputs;
        self
    }

    /// Members per ensemble.
    pub fn num_analogs(&self) -> usize {
        self.num_analogs
    }

    /// Similarity records kept per unit.
    pub fn num_similarity(&self) -> usize {
        self.num_similarity
    }

    /// Observation parameter supplying member values.
    pub fn observation_parameter(&self) -> usize {
        self.observation_parameter
    }

    /// Tolerated NaN parameter contributions.
    pub fn max_parameter_nan(&self) -> usize {
        self.max_parameter_nan
    }

    /// Tolerated NaN cells per lead-time window.
    pub fn max_lead_time_nan(&self) -> usize {
        self.max_lead_time_nan
    }

    /// Half-width of the lead-time window.
    pub fn lead_time_radius(&self) -> usize {
        self.lead_time_radius
    }

    /// Neighbour criteria.
    pub fn neighbors(&self) -> &NeighborConfig {
        &self.neighbors
    }

    /// Whether search space extension is on.
    pub fn search_extension(&self) -> bool {
        self.search_extension
    }

    /// Whether member values come from the supplying neighbour.
    pub fn extend_observations(&self) -> bool {
        self.extend_observations
    }

    /// Whether operational mode is on.
    pub fn operational(&self) -> bool {
        self.operational
    }

    /// Whether future-verifying candidates are skipped.
    pub fn prevent_search_future(&self) -> bool {
        self.prevent_search_future
    }

    /// Whether partial selection is used.
    pub fn quick_selection(&self) -> bool {
        self.quick_selection
    }

    /// Weight override, if any.
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Arrays kept in the result.
    pub fn outputs(&self) -> OutputSelection {
        self.outputs
    }

    /// Validates this configuration.
    ///
    /// Data-dependent checks (index ranges, shapes, ordering) happen when a
    /// run starts.
    pub fn validate(&self) -> Result<(), AnalogError> {
        if self.num_analogs < 1 {
            return Err(AnalogError::InvalidMemberCount {
                num_analogs: self.num_analogs,
            });
        }
        if self.num_similarity < self.num_analogs {
            return Err(AnalogError::SimilarityBelowAnalogs {
                num_similarity: self.num_similarity,
                num_analogs: self.num_analogs,
            });
        }
        if let Some(weights) = &self.weights {
            for (parameter, &weight) in weights.iter().enumerate() {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(AnalogError::InvalidWeights { parameter, weight });
                }
            }
        }
        if self.search_extension {
            self.neighbors.validate()?;
        }
        Ok(())
    }
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            num_analogs: 1,
            num_similarity: 1,
            observation_parameter: 0,
            max_parameter_nan: 0,
            max_lead_time_nan: 0,
            lead_time_radius: 1,
            neighbors: NeighborConfig::new(1),
            search_extension: false,
            extend_observations: true,
            operational: false,
            prevent_search_future: true,
            quick_selection: true,
            weights: None,
            outputs: OutputSelection::default(),
        }
    }
}
