use serde::Deserialize;

/// Top-level run configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnenConfig {
    /// Global RNG seed for the synthetic dataset.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Synthetic dataset layout.
    #[serde(default)]
    pub dataset: DatasetToml,

    /// Analog search settings.
    #[serde(default)]
    pub analog: AnalogToml,

    /// Station sharding.
    #[serde(default)]
    pub run: RunToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetToml {
    #[serde(default = "default_n_stations")]
    pub n_stations: usize,
    /// Stations per grid row.
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
    #[serde(default = "default_n_times")]
    pub n_times: usize,
    /// Trailing forecast times used as test times.
    #[serde(default = "default_n_test")]
    pub n_test: usize,
    #[serde(default = "default_n_lead_times")]
    pub n_lead_times: usize,
    #[serde(default = "default_time_step")]
    pub time_step: i64,
    #[serde(default = "default_lead_step")]
    pub lead_step: i64,
    /// Fraction of values replaced by NaN.
    #[serde(default = "default_nan_fraction")]
    pub nan_fraction: f64,
    /// Forecast noise around the verifying observation.
    #[serde(default = "default_forecast_noise")]
    pub forecast_noise: f64,
    #[serde(default = "default_parameters")]
    pub parameters: Vec<ParameterToml>,
}

impl Default for DatasetToml {
    fn default() -> Self {
        Self {
            n_stations: default_n_stations(),
            grid_columns: default_grid_columns(),
            n_times: default_n_times(),
            n_test: default_n_test(),
            n_lead_times: default_n_lead_times(),
            time_step: default_time_step(),
            lead_step: default_lead_step(),
            nan_fraction: default_nan_fraction(),
            forecast_noise: default_forecast_noise(),
            parameters: default_parameters(),
        }
    }
}

fn default_n_stations() -> usize {
    16
}
fn default_grid_columns() -> usize {
    4
}
fn default_n_times() -> usize {
    120
}
fn default_n_test() -> usize {
    10
}
fn default_n_lead_times() -> usize {
    4
}
fn default_time_step() -> i64 {
    86_400
}
fn default_lead_step() -> i64 {
    21_600
}
fn default_nan_fraction() -> f64 {
    0.02
}
fn default_forecast_noise() -> f64 {
    1.5
}
fn default_parameters() -> Vec<ParameterToml> {
    vec![
        ParameterToml {
            name: "temperature".to_string(),
            circular: false,
            weight: 1.0,
        },
        ParameterToml {
            name: "wind_direction".to_string(),
            circular: true,
            weight: 0.5,
        },
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterToml {
    pub name: String,
    #[serde(default)]
    pub circular: bool,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalogToml {
    #[serde(default = "default_num_analogs")]
    pub num_analogs: usize,
    /// Defaults to `num_analogs`.
    #[serde(default)]
    pub num_similarity: Option<usize>,
    #[serde(default)]
    pub observation_parameter: usize,
    #[serde(default)]
    pub max_parameter_nan: usize,
    #[serde(default)]
    pub max_lead_time_nan: usize,
    #[serde(default = "default_lead_time_radius")]
    pub lead_time_radius: usize,
    #[serde(default)]
    pub search_extension: bool,
    #[serde(default = "default_num_nearest")]
    pub num_nearest: usize,
    #[serde(default)]
    pub distance_threshold: Option<f64>,
    #[serde(default)]
    pub match_tags: bool,
    #[serde(default = "default_true")]
    pub extend_observations: bool,
    #[serde(default)]
    pub operational: bool,
    #[serde(default = "default_true")]
    pub prevent_search_future: bool,
    #[serde(default = "default_true")]
    pub quick_selection: bool,
    /// Overrides the per-parameter weights of `[dataset]`.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub save: SaveToml,
}

impl Default for AnalogToml {
    fn default() -> Self {
        Self {
            num_analogs: default_num_analogs(),
            num_similarity: None,
            observation_parameter: 0,
            max_parameter_nan: 0,
            max_lead_time_nan: 0,
            lead_time_radius: default_lead_time_radius(),
            search_extension: false,
            num_nearest: default_num_nearest(),
            distance_threshold: None,
            match_tags: false,
            extend_observations: true,
            operational: false,
            prevent_search_future: true,
            quick_selection: true,
            weights: None,
            save: SaveToml::default(),
        }
    }
}

fn default_num_analogs() -> usize {
    11
}
fn default_lead_time_radius() -> usize {
    1
}
fn default_num_nearest() -> usize {
    1
}
fn default_true() -> bool {
    true
}

/// Output switches.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveToml {
    #[serde(default = "default_true")]
    pub analogs: bool,
    #[serde(default)]
    pub analogs_time_index: bool,
    #[serde(default)]
    pub similarity: bool,
    #[serde(default)]
    pub similarity_time_index: bool,
    #[serde(default)]
    pub similarity_station_index: bool,
    #[serde(default)]
    pub standard_deviation: bool,
    #[serde(default)]
    pub search_stations: bool,
}

impl Default for SaveToml {
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

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunToml {
    #[serde(default = "default_n_shards")]
    pub n_shards: usize,
}

impl Default for RunToml {
    fn default() -> Self {
        Self {
            n_shards: default_n_shards(),
        }
    }
}

fn default_n_shards() -> usize {
    1
}
