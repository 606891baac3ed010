//! Shared synthetic datasets for the integration tests.

#![allow(dead_code)]

use anen_data::{
    DenseArray, ForecastField, ObservationField, Parameter, Parameters, Station, Stations,
    TimeMapping, Times,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct Dataset {
    pub forecasts: ForecastField,
    pub observations: ObservationField,
    pub mapping: TimeMapping,
}

/// Forecasts every 24 h with 6-hourly lead times, observations every 6 h.
///
/// Stations sit on a unit grid, `columns` wide. Parameter 0 is linear,
/// parameter 1 (if present) circular in degrees. A fraction `nan_prob` of
/// forecast and observation values is NaN.
pub fn random_dataset(
    seed: u64,
    n_stations: usize,
    n_times: usize,
    n_lead: usize,
    nan_prob: f64,
) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let parameters =
        Parameters::from_items([Parameter::new("temp"), Parameter::new("wdir").with_circular(true)])
            .unwrap();
    let stations = grid_stations(n_stations, 4);
    let times = Times::from_items((0..n_times as i64).map(|t| t * 24)).unwrap();
    let leads = Times::from_items((0..n_lead as i64).map(|l| l * 6)).unwrap();
    let n_obs_times = n_times * 4 + n_lead;
    let obs_times = Times::from_items((0..n_obs_times as i64).map(|i| i * 6)).unwrap();

    let mut fcst = DenseArray::new([2, n_stations, n_times, n_lead]);
    // Parameter is the fastest axis, so each pair is (temp, wdir).
    for v in fcst.as_mut_slice().chunks_exact_mut(2) {
        v[0] = if rng.random_bool(nan_prob) { f64::NAN } else { rng.random_range(-10.0..30.0) };
        v[1] = if rng.random_bool(nan_prob) { f64::NAN } else { rng.random_range(0.0..360.0) };
    }
    let mut obs = DenseArray::new([2, n_stations, n_obs_times]);
    for v in obs.as_mut_slice() {
        *v = if rng.random_bool(nan_prob) { f64::NAN } else { rng.random_range(-10.0..30.0) };
    }

    let forecasts =
        ForecastField::from_array(parameters.clone(), stations.clone(), times.clone(), leads.clone(), fcst)
            .unwrap();
    let observations = ObservationField::from_array(parameters, stations, obs_times.clone(), obs).unwrap();
    let mapping = TimeMapping::build(&times, &leads, &obs_times);
    Dataset {
        forecasts,
        observations,
        mapping,
    }
}

/// `n` stations on a unit grid, `columns` per row.
pub fn grid_stations(n: usize, columns: usize) -> Stations {
    Stations::from_items((0..n).map(|i| {
        Station::new(format!("s{i}"), (i % columns) as f64, (i / columns) as f64)
    }))
    .unwrap()
}

/// NaN-aware equality of two optional arrays.
pub fn same(a: Option<&DenseArray<4>>, b: Option<&DenseArray<4>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.shape() == b.shape()
                && a
                    .as_slice()
                    .iter()
                    .zip(b.as_slice())
                    .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
        }
        _ => false,
    }
}
