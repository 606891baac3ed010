//! Candidate admissibility and the weighted similarity metric.

use anen_data::{DenseArray, ForecastField, ObservationField, TimeMapping};
use anen_stats::{circular_diff, nan_mean, nan_sum};

use crate::record::SimilarityRecord;

/// The test forecast a unit compares candidates against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TestPoint {
    /// Forecast station of the test forecast.
    pub station: usize,
    /// Forecast time index of the test forecast.
    pub time: usize,
    /// Lead-time index of the unit.
    pub lead_time: usize,
    /// Column of the SD table to normalize with.
    pub sd_step: usize,
}

/// Per-worker buffers for metric evaluation.
#[derive(Debug, Default)]
pub(crate) struct MetricScratch {
    window: Vec<f64>,
    contributions: Vec<f64>,
}

impl MetricScratch {
    pub(crate) fn new(n_parameters: usize, window_len: usize) -> Self {
        Self {
            window: Vec::with_capacity(window_len),
            contributions: Vec::with_capacity(n_parameters),
        }
    }
}

/// Read-only view of everything needed to score candidates.
pub(crate) struct Scorer<'a> {
    pub forecasts: &'a ForecastField,
    pub observations: &'a ObservationField,
    pub mapping: &'a TimeMapping,
    pub sds: &'a DenseArray<4>,
    pub weights: &'a [f64],
    pub circulars: &'a [bool],
    /// Inclusive lead-time window per lead-time index.
    pub windows: &'a [(usize, usize)],
    pub observation_parameter: usize,
    pub max_parameter_nan: usize,
    pub max_lead_time_nan: usize,
    pub prevent_search_future: bool,
}

impl Scorer<'_> {
    /// Scores the candidate issued at `time` at forecast station `station`,
    /// verified by observations at `obs_station`.
    ///
    /// Rejections, in order: the test forecast itself, a candidate verifying
    /// at or after the test time (when future search is prevented), no
    /// verifying observation time, a NaN verifying observation.
    pub(crate) fn evaluate(
        &self,
        test: &TestPoint,
        time: usize,
        station: usize,
        obs_station: usize,
        scratch: &mut MetricScratch,
    ) -> SimilarityRecord {
        if time == test.time {
            return SimilarityRecord::REJECTED;
        }
        if self.prevent_search_future {
            let times = self.forecasts.times().values();
            let lead = self.forecasts.lead_times().values()[test.lead_time];
            if times[time] + lead >= times[test.time] {
                return SimilarityRecord::REJECTED;
            }
        }
        let Some(obs_time) = self.mapping.get(time, test.lead_time) else {
            return SimilarityRecord::REJECTED;
        };
        if self
            .observations
            .value(self.observation_parameter, obs_station, obs_time)
            .is_nan()
        {
            return SimilarityRecord::REJECTED;
        }
        SimilarityRecord {
            metric: self.metric(test, time, station, scratch),
            search_time: Some(time),
            observation_time: Some(obs_time),
            station: Some(station),
        }
    }

    /// `Σ w_p · sqrt(mean over the lead window of Δ²) / sd_p` over the
    /// parameters with positive weight. The SD is the candidate station's.
    pub(crate) fn metric(
        &self,
        test: &TestPoint,
        time: usize,
        station: usize,
        scratch: &mut MetricScratch,
    ) -> f64 {
        let (lo, hi) = self.windows[test.lead_time];
        scratch.contributions.clear();
        for (p, (&weight, &circular)) in self.weights.iter().zip(self.circulars).enumerate() {
            if weight <= 0.0 {
                continue;
            }
            scratch.window.clear();
            for l in lo..=hi {
                let a = self.forecasts.value(p, test.station, test.time, l);
                let b = self.forecasts.value(p, station, time, l);
                let diff = if circular { circular_diff(a, b) } else { a - b };
                scratch.window.push(diff * diff);
            }
            let mean_sq = nan_mean(&scratch.window, self.max_lead_time_nan);
            let sd = self.sds.get([p, station, test.lead_time, test.sd_step]);
            let contribution = if mean_sq.is_nan() || sd.is_nan() {
                f64::NAN
            } else if sd == 0.0 {
                0.0
            } else {
                weight * mean_sq.sqrt() / sd
            };
            scratch.contributions.push(contribution);
        }
        nan_sum(&scratch.contributions, self.max_parameter_nan)
    }
}

/// Inclusive `[flt - radius, flt + radius]` window per lead time, clamped
/// to the lead-time axis.
pub(crate) fn lead_time_windows(n_lead_times: usize, radius: usize) -> Vec<(usize, usize)> {
    (0..n_lead_times)
        .map(|l| (l.saturating_sub(radius), l.saturating_add(radius).min(n_lead_times - 1)))
        .collect()
}
