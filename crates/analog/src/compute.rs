//! Entry points for independent search, search space extension, and
//! mismatched station sets.

use std::ops::Range;

use anen_data::{DenseArray, ForecastField, ObservationField, TimeMapping};
use anen_knn::{SearchStationTable, match_nearest, search_stations};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::AnalogConfig;
use crate::error::AnalogError;
use crate::record::SimilarityRecord;
use crate::result::AnalogResult;
use crate::sd::{check_indices, standard_deviations};
use crate::selection::{RowLayout, Slot, rank};
use crate::similarity::{MetricScratch, Scorer, TestPoint, lead_time_windows};

/// Borrowed inputs of a run.
///
/// `test_indices` and `search_indices` are positions on the forecast time
/// axis. `mapping` resolves forecast time and lead time to the verifying
/// observation time.
#[derive(Debug, Clone, Copy)]
pub struct AnalogInputs<'a> {
    /// Forecasts `[parameter][station][time][lead_time]`.
    pub forecasts: &'a ForecastField,
    /// Observations `[parameter][station][time]`.
    pub observations: &'a ObservationField,
    /// Forecast-to-observation time lookup.
    pub mapping: &'a TimeMapping,
    /// Forecast times to build ensembles for.
    pub test_indices: &'a [usize],
    /// Forecast times forming the historical archive.
    pub search_indices: &'a [usize],
}

impl<'a> AnalogInputs<'a> {
    /// Bundles the inputs of a run.
    pub fn new(
        forecasts: &'a ForecastField,
        observations: &'a ObservationField,
        mapping: &'a TimeMapping,
        test_indices: &'a [usize],
        search_indices: &'a [usize],
    ) -> Self {
        Self {
            forecasts,
            observations,
            mapping,
            test_indices,
            search_indices,
        }
    }
}

/// How candidate stations are chosen, as requested by the caller.
#[derive(Debug, Clone, Copy)]
pub(crate) enum StationSource<'b> {
    /// Each station searches only its own history.
    Independent,
    /// Neighbour table, built from the config when `None`.
    Extended(Option<&'b SearchStationTable>),
    /// Observation stations matched to forecast stations, by distance when
    /// `None`.
    Mismatched(Option<&'b [usize]>),
}

impl StationSource<'_> {
    pub(crate) fn from_config(config: &AnalogConfig) -> Self {
        if config.search_extension() {
            StationSource::Extended(None)
        } else {
            StationSource::Independent
        }
    }
}

/// Resolved station plan of a run.
#[derive(Debug)]
enum StationPlan {
    Independent,
    Extended {
        table: SearchStationTable,
        extend_observations: bool,
    },
    Mismatched {
        table: SearchStationTable,
        matched: Vec<usize>,
    },
}

impl StationPlan {
    fn forecast_station(&self, out_station: usize) -> usize {
        match self {
            StationPlan::Mismatched { matched, .. } => matched[out_station],
            _ => out_station,
        }
    }

    fn neighbors(&self, forecast_station: usize) -> Option<&[usize]> {
        match self {
            StationPlan::Independent => None,
            StationPlan::Extended { table, .. } | StationPlan::Mismatched { table, .. } => {
                Some(table.neighbors(forecast_station))
            }
        }
    }

    /// Observation station whose series verifies a candidate from
    /// `neighbor` for the unit at `out_station`.
    fn observation_station(&self, out_station: usize, neighbor: usize) -> usize {
        match self {
            StationPlan::Extended {
                extend_observations: true,
                ..
            } => neighbor,
            _ => out_station,
        }
    }

    fn max_neighbors(&self) -> usize {
        match self {
            StationPlan::Independent => 1,
            StationPlan::Extended { table, .. } | StationPlan::Mismatched { table, .. } => {
                table.max_neighbors()
            }
        }
    }
}

fn check_table(table: &SearchStationTable, n_stations: usize) -> Result<(), AnalogError> {
    if table.len() != n_stations {
        return Err(AnalogError::StationTableMismatch {
            what: "search stations",
            detail: format!("{} lists for {n_stations} stations", table.len()),
        });
    }
    if let Some(&bad) = table.iter().flatten().find(|&&s| s >= n_stations) {
        return Err(AnalogError::StationTableMismatch {
            what: "search stations",
            detail: format!("neighbour {bad} out of range for {n_stations} stations"),
        });
    }
    Ok(())
}

fn check_match(matched: &[usize], n_obs: usize, n_fcst: usize) -> Result<(), AnalogError> {
    if matched.len() != n_obs {
        return Err(AnalogError::StationTableMismatch {
            what: "station match",
            detail: format!("{} entries for {n_obs} observation stations", matched.len()),
        });
    }
    if let Some(&bad) = matched.iter().find(|&&s| s >= n_fcst) {
        return Err(AnalogError::StationTableMismatch {
            what: "station match",
            detail: format!("forecast station {bad} out of range for {n_fcst} stations"),
        });
    }
    Ok(())
}

fn check_operational_order(inputs: &AnalogInputs<'_>) -> Result<(), AnalogError> {
    let times = inputs.forecasts.times().values();
    let Some(&first) = inputs.test_indices.first() else {
        return Err(AnalogError::EmptyAccumulation);
    };
    if inputs
        .test_indices
        .windows(2)
        .any(|w| times[w[0]] >= times[w[1]])
    {
        return Err(AnalogError::OperationalOrdering {
            reason: "test times must be strictly increasing",
        });
    }
    if inputs
        .search_indices
        .iter()
        .any(|&s| times[s] >= times[first])
    {
        return Err(AnalogError::OperationalOrdering {
            reason: "search times must precede the first test time",
        });
    }
    Ok(())
}

/// Everything validated and precomputed once per run, shared read-only by
/// every unit and shard.
pub(crate) struct Prepared<'a> {
    inputs: AnalogInputs<'a>,
    config: &'a AnalogConfig,
    weights: Vec<f64>,
    circulars: Vec<bool>,
    sds: DenseArray<4>,
    plan: StationPlan,
    windows: Vec<(usize, usize)>,
    layout: RowLayout,
    max_candidates: usize,
}

impl<'a> Prepared<'a> {
    /// Validates inputs and config, resolves the station plan, and builds
    /// the SD table.
    pub(crate) fn new(
        inputs: AnalogInputs<'a>,
        config: &'a AnalogConfig,
        source: StationSource<'_>,
    ) -> Result<Self, AnalogError> {
        config.validate()?;

        let forecasts = inputs.forecasts;
        let observations = inputs.observations;
        let [n_par, n_fcst, n_times, n_lead] = forecasts.data().shape();
        let n_obs = observations.stations().len();

        let weights = match config.weights() {
            Some(w) => w.to_vec(),
            None => forecasts.parameters().weights(),
        };
        if weights.len() != n_par {
            return Err(AnalogError::WeightCountMismatch {
                expected: n_par,
                got: weights.len(),
            });
        }
        if let Some((parameter, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(AnalogError::InvalidWeights { parameter, weight });
        }
        let circulars = forecasts.parameters().circulars();

        let n_obs_par = observations.parameters().len();
        if config.observation_parameter() >= n_obs_par {
            return Err(AnalogError::ParameterIndexOutOfRange {
                index: config.observation_parameter(),
                n_parameters: n_obs_par,
            });
        }

        let (got_times, got_lead_times) = inputs.mapping.shape();
        if (got_times, got_lead_times) != (n_times, n_lead) {
            return Err(AnalogError::MappingShapeMismatch {
                n_times,
                n_lead_times: n_lead,
                got_times,
                got_lead_times,
            });
        }

        check_indices("test", inputs.test_indices, n_times)?;
        check_indices("search", inputs.search_indices, n_times)?;
        if config.operational() {
            check_operational_order(&inputs)?;
        }

        let plan = match source {
            StationSource::Independent | StationSource::Extended(_) if n_fcst != n_obs => {
                return Err(AnalogError::StationCountMismatch {
                    forecast: n_fcst,
                    observation: n_obs,
                });
            }
            StationSource::Independent => StationPlan::Independent,
            StationSource::Extended(table) => {
                let table = match table {
                    Some(t) => {
                        check_table(t, n_fcst)?;
                        t.clone()
                    }
                    None => {
                        let coords = forecasts.stations().coordinates();
                        let tags = forecasts.stations().tags();
                        search_stations(&coords, &tags, &coords, &tags, config.neighbors())?
                    }
                };
                StationPlan::Extended {
                    table,
                    extend_observations: config.extend_observations(),
                }
            }
            StationSource::Mismatched(matched) => {
                let matched = match matched {
                    Some(m) => {
                        check_match(m, n_obs, n_fcst)?;
                        m.to_vec()
                    }
                    None => match_nearest(
                        &observations.stations().coordinates(),
                        &forecasts.stations().coordinates(),
                    )?,
                };
                let table = if config.search_extension() {
                    let coords = forecasts.stations().coordinates();
                    let tags = forecasts.stations().tags();
                    search_stations(&coords, &tags, &coords, &tags, config.neighbors())?
                } else {
                    SearchStationTable::identity(n_fcst)
                };
                if config.extend_observations() {
                    debug!("neighbours are forecast stations; members come from the observation station itself");
                }
                StationPlan::Mismatched { table, matched }
            }
        };

        let history = if config.operational() {
            inputs.test_indices.len().saturating_sub(1)
        } else {
            0
        };
        let max_candidates = (inputs.search_indices.len() + history) * plan.max_neighbors();
        if !inputs.test_indices.is_empty() && config.num_similarity() > max_candidates {
            return Err(AnalogError::TooManyMembers {
                num_similarity: config.num_similarity(),
                candidates: max_candidates,
            });
        }

        let accumulation = config.operational().then_some(inputs.test_indices);
        let sds = standard_deviations(
            forecasts,
            &weights,
            &circulars,
            inputs.search_indices,
            accumulation,
        )?;

        let layout = RowLayout::new(
            &config.outputs(),
            config.num_analogs(),
            config.num_similarity(),
        );

        Ok(Self {
            inputs,
            config,
            weights,
            circulars,
            sds,
            plan,
            windows: lead_time_windows(n_lead, config.lead_time_radius()),
            layout,
            max_candidates,
        })
    }

    /// Number of stations on the output axis.
    pub(crate) fn n_output_stations(&self) -> usize {
        match self.plan {
            StationPlan::Mismatched { .. } => self.inputs.observations.stations().len(),
            _ => self.inputs.forecasts.stations().len(),
        }
    }

    fn scorer(&self) -> Scorer<'_> {
        Scorer {
            forecasts: self.inputs.forecasts,
            observations: self.inputs.observations,
            mapping: self.inputs.mapping,
            sds: &self.sds,
            weights: &self.weights,
            circulars: &self.circulars,
            windows: &self.windows,
            observation_parameter: self.config.observation_parameter(),
            max_parameter_nan: self.config.max_parameter_nan(),
            max_lead_time_nan: self.config.max_lead_time_nan(),
            prevent_search_future: self.config.prevent_search_future(),
        }
    }

    /// Scores every candidate of one unit into `records`.
    fn fill_unit(
        &self,
        scorer: &Scorer<'_>,
        out_station: usize,
        test_pos: usize,
        lead_time: usize,
        records: &mut Vec<SimilarityRecord>,
        scratch: &mut MetricScratch,
    ) {
        records.clear();
        let operational = self.config.operational();
        let forecast_station = self.plan.forecast_station(out_station);
        let own = [forecast_station];
        let neighbors = self.plan.neighbors(forecast_station).unwrap_or(&own[..]);
        let test = TestPoint {
            station: forecast_station,
            time: self.inputs.test_indices[test_pos],
            lead_time,
            sd_step: if operational { test_pos } else { 0 },
        };
        let history = if operational {
            &self.inputs.test_indices[..test_pos]
        } else {
            &[]
        };
        for &time in self.inputs.search_indices.iter().chain(history) {
            for &station in neighbors {
                let obs_station = self.plan.observation_station(out_station, station);
                records.push(scorer.evaluate(&test, time, station, obs_station, scratch));
            }
        }
    }

    /// Computes every unit of the stations in `stations` and returns their
    /// per-unit arrays, with the station axis starting at `stations.start`.
    pub(crate) fn run(&self, stations: Range<usize>) -> AnalogResult {
        let n_sta = stations.len();
        let n_test = self.inputs.test_indices.len();
        let n_lead = self.windows.len();
        let n_units = n_sta * n_test * n_lead;
        let width = self.layout.width();

        let mut result = AnalogResult::default();
        if width == 0 {
            warn!("no per-unit outputs requested; skipping similarity search");
            return result;
        }

        let scorer = self.scorer();
        let num_analogs = self.config.num_analogs();
        let num_similarity = self.config.num_similarity();
        let quick = self.config.quick_selection();
        let n_par = self.weights.len();
        let window_len = self
            .windows
            .iter()
            .map(|&(lo, hi)| hi - lo + 1)
            .max()
            .unwrap_or(0);
        let observation_parameter = self.config.observation_parameter();

        // Unit-major rows: unit u owns rows[u * width..(u + 1) * width].
        let mut rows = vec![f64::NAN; n_units * width];
        rows.par_chunks_mut(width).enumerate().for_each_init(
            || {
                (
                    Vec::with_capacity(self.max_candidates),
                    MetricScratch::new(n_par, window_len),
                )
            },
            |(records, scratch), (u, row)| {
                let local = u % n_sta;
                let test_pos = (u / n_sta) % n_test;
                let lead_time = u / (n_sta * n_test);
                let out_station = stations.start + local;

                self.fill_unit(&scorer, out_station, test_pos, lead_time, records, scratch);
                rank(records, num_analogs, num_similarity, quick);
                self.layout.write_row(row, records, |record, obs_time| {
                    let station = record
                        .station
                        .map_or(out_station, |s| self.plan.observation_station(out_station, s));
                    self.inputs
                        .observations
                        .value(observation_parameter, station, obs_time)
                });
            },
        );

        for slot in Slot::ALL {
            let Some(section) = self.layout.section(slot) else {
                continue;
            };
            let mut array = DenseArray::new([n_sta, n_test, n_lead, section.len()]);
            let out = array.as_mut_slice();
            for (u, row) in rows.chunks_exact(width).enumerate() {
                for (j, &v) in row[section.clone()].iter().enumerate() {
                    out[u + n_units * j] = v;
                }
            }
            *result.slot_mut(slot) = Some(array);
        }
        result
    }

    /// Attaches the run-level tables requested by the config.
    pub(crate) fn finish(self, mut result: AnalogResult) -> AnalogResult {
        let outputs = self.config.outputs();
        if outputs.standard_deviation {
            result.set_standard_deviation(self.sds);
        }
        if outputs.search_stations {
            match self.plan {
                StationPlan::Independent => {}
                StationPlan::Extended { table, .. } => result.set_search_stations(table),
                StationPlan::Mismatched { table, matched } => {
                    result.set_search_stations(table);
                    result.set_station_match(matched);
                }
            }
        }
        result
    }

    /// Empty full-size arrays for every enabled per-unit output.
    pub(crate) fn empty_result(&self) -> AnalogResult {
        let mut result = AnalogResult::default();
        let shape = [
            self.n_output_stations(),
            self.inputs.test_indices.len(),
            self.windows.len(),
        ];
        for slot in Slot::ALL {
            if let Some(section) = self.layout.section(slot) {
                *result.slot_mut(slot) =
                    Some(DenseArray::new([shape[0], shape[1], shape[2], section.len()]));
            }
        }
        result
    }
}

fn run_all(prepared: Prepared<'_>) -> AnalogResult {
    let n = prepared.n_output_stations();
    let result = prepared.run(0..n);
    let result = prepared.finish(result);
    info!(
        missing_members = ?result.missing_member_fraction(),
        "analog ensembles computed"
    );
    result
}

/// Generates analog ensembles for every (station, test time, lead time).
///
/// Candidates come from the station's own forecast history, or from its
/// neighbours when search space extension is enabled in `config`.
///
/// # Errors
///
/// Returns [`AnalogError`] for an invalid config, out-of-range indices,
/// inconsistent shapes or station counts, or broken operational ordering.
/// No partial result is produced.
///
/// # Example
///
/// ```
/// use anen_analog::{AnalogConfig, AnalogInputs, compute};
/// use anen_data::{DenseArray, ForecastField, ObservationField, Parameter, Parameters,
///     Station, Stations, TimeMapping, Times};
///
/// let params = Parameters::from_items([Parameter::new("t2m")]).unwrap();
/// let stations = Stations::from_items([Station::new("s", 0.0, 0.0)]).unwrap();
/// let times = Times::from_items([0, 10, 20, 30]).unwrap();
/// let leads = Times::from_items([0]).unwrap();
/// let fcst = DenseArray::from_vec([1, 1, 4, 1], vec![1.0, 5.0, 2.0, 1.2]).unwrap();
/// let forecasts = ForecastField::from_array(params.clone(), stations.clone(), times.clone(), leads.clone(), fcst).unwrap();
/// let obs = DenseArray::from_vec([1, 1, 4], vec![10.0, 50.0, 20.0, 12.0]).unwrap();
/// let observations = ObservationField::from_array(params, stations, times.clone(), obs).unwrap();
/// let mapping = TimeMapping::build(&times, &leads, &times);
///
/// let inputs = AnalogInputs::new(&forecasts, &observations, &mapping, &[3], &[0, 1, 2]);
/// let result = compute(&inputs, &AnalogConfig::new(1).with_lead_time_radius(0)).unwrap();
/// // 1.2 is closest to 1.0, so the member is the observation at time 0.
/// assert_eq!(result.analogs().unwrap().get([0, 0, 0, 0]), 10.0);
/// ```
#[tracing::instrument(skip_all, fields(
    n_stations = inputs.forecasts.stations().len(),
    n_test = inputs.test_indices.len(),
    n_search = inputs.search_indices.len(),
))]
pub fn compute(inputs: &AnalogInputs<'_>, config: &AnalogConfig) -> Result<AnalogResult, AnalogError> {
    let prepared = Prepared::new(*inputs, config, StationSource::from_config(config))?;
    Ok(run_all(prepared))
}

/// Generates analog ensembles searching the neighbours listed in `table`.
///
/// `table` must have one list per forecast station. The config's own
/// neighbour criteria are ignored.
///
/// # Errors
///
/// As [`compute`], plus [`AnalogError::StationTableMismatch`] for a table
/// of the wrong size or with out-of-range station indices.
#[tracing::instrument(skip_all, fields(
    n_stations = inputs.forecasts.stations().len(),
    max_neighbors = table.max_neighbors(),
))]
pub fn compute_with_stations(
    inputs: &AnalogInputs<'_>,
    config: &AnalogConfig,
    table: &SearchStationTable,
) -> Result<AnalogResult, AnalogError> {
    let prepared = Prepared::new(*inputs, config, StationSource::Extended(Some(table)))?;
    Ok(run_all(prepared))
}

/// Generates analog ensembles when observation and forecast stations differ.
///
/// Every observation station is paired with a forecast station: by
/// `station_match[obs_station]` when given, otherwise with the nearest one.
/// The output station axis is the observation station axis; members always
/// come from the observation station's own series.
///
/// # Errors
///
/// As [`compute`], plus [`AnalogError::StationTableMismatch`] for a bad
/// `station_match`.
#[tracing::instrument(skip_all, fields(
    n_forecast_stations = inputs.forecasts.stations().len(),
    n_observation_stations = inputs.observations.stations().len(),
))]
pub fn compute_mismatched(
    inputs: &AnalogInputs<'_>,
    config: &AnalogConfig,
    station_match: Option<&[usize]>,
) -> Result<AnalogResult, AnalogError> {
    let prepared = Prepared::new(*inputs, config, StationSource::Mismatched(station_match))?;
    Ok(run_all(prepared))
}
