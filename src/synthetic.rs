//! Deterministic synthetic forecast/observation archive.
//!
//! Observations follow a seasonal plus diurnal cycle per station with
//! uniform noise; forecasts are the verifying observation plus noise that
//! grows with lead time. Circular parameters wrap to `[0, 360)`.

use std::collections::BTreeSet;
use std::f64::consts::TAU;

use anyhow::{Context, Result, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use anen_data::{
    DenseArray, ForecastField, ObservationField, Parameters, Station, Stations, TimeMapping, Times,
};

use crate::config::DatasetToml;

const YEAR: f64 = 365.0 * 86_400.0;
const DAY: f64 = 86_400.0;

/// In-memory archive plus the test/search split.
pub struct SyntheticDataset {
    pub forecasts: ForecastField,
    pub observations: ObservationField,
    pub mapping: TimeMapping,
    pub test_indices: Vec<usize>,
    pub search_indices: Vec<usize>,
}

fn check(cfg: &DatasetToml) -> Result<()> {
    if cfg.n_stations == 0 || cfg.grid_columns == 0 {
        bail!("n_stations and grid_columns must be >= 1");
    }
    if cfg.n_lead_times == 0 {
        bail!("n_lead_times must be >= 1");
    }
    if cfg.n_test == 0 || cfg.n_test >= cfg.n_times {
        bail!(
            "n_test must be in 1..n_times, got {} for {} times",
            cfg.n_test,
            cfg.n_times
        );
    }
    if cfg.time_step <= 0 || cfg.lead_step <= 0 {
        bail!("time_step and lead_step must be positive");
    }
    if !(0.0..=1.0).contains(&cfg.nan_fraction) {
        bail!("nan_fraction must be in [0, 1], got {}", cfg.nan_fraction);
    }
    if !cfg.forecast_noise.is_finite() || cfg.forecast_noise < 0.0 {
        bail!("forecast_noise must be finite and >= 0");
    }
    Ok(())
}

/// Stations on a unit grid; the western and eastern halves carry tags 0 and 1.
fn grid(n: usize, columns: usize) -> Result<Stations> {
    Stations::from_items((0..n).map(|i| {
        let col = i % columns;
        Station::new(format!("st{i:03}"), col as f64, (i / columns) as f64)
            .with_tag(u32::from(2 * col >= columns))
    }))
    .context("failed to build station grid")
}

fn climatology(circular: bool, parameter: usize, x: f64, y: f64, time: f64) -> f64 {
    let phase = parameter as f64 * 0.7;
    if circular {
        180.0 + 120.0 * (TAU * time / (5.0 * DAY) + phase + 0.3 * x).sin() + 15.0 * y
    } else {
        10.0 + 8.0 * (TAU * time / YEAR + phase).sin()
            + 4.0 * (TAU * time / DAY + 0.2 * x).sin()
            + 0.5 * x
            - 0.3 * y
    }
}

fn finish(value: f64, circular: bool) -> f64 {
    if circular { value.rem_euclid(360.0) } else { value }
}

/// Builds the synthetic archive described by `cfg`.
///
/// The last `n_test` forecast times are test times, the rest form the
/// search archive. Without a seed the data differ on every call.
pub fn synthesize(cfg: &DatasetToml, parameters: Parameters, seed: Option<u64>) -> Result<SyntheticDataset> {
    check(cfg)?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let stations = grid(cfg.n_stations, cfg.grid_columns)?;
    let times = Times::from_items((0..cfg.n_times as i64).map(|t| t * cfg.time_step))
        .context("failed to build forecast times")?;
    let leads = Times::from_items((0..cfg.n_lead_times as i64).map(|l| l * cfg.lead_step))
        .context("failed to build lead times")?;
    let valid: BTreeSet<i64> = times
        .values()
        .iter()
        .flat_map(|&t| leads.values().iter().map(move |&l| t + l))
        .collect();
    let obs_times = Times::from_items(valid).context("failed to build observation times")?;

    let n_par = parameters.len();
    let n_sta = stations.len();
    let n_obs = obs_times.len();
    let circulars = parameters.circulars();

    let mut truth = DenseArray::new([n_par, n_sta, n_obs]);
    for (o, &time) in obs_times.values().iter().enumerate() {
        for (s, station) in stations.iter().enumerate() {
            for (p, &circular) in circulars.iter().enumerate() {
                let base = climatology(circular, p, station.x(), station.y(), time as f64);
                let spread = if circular { 10.0 } else { 1.0 };
                truth.set([p, s, o], base + spread * rng.random_range(-1.0..1.0));
            }
        }
    }

    let mapping = TimeMapping::build(&times, &leads, &obs_times);
    let mut fcst = DenseArray::new([n_par, n_sta, cfg.n_times, cfg.n_lead_times]);
    for t in 0..cfg.n_times {
        for l in 0..cfg.n_lead_times {
            let Some(o) = mapping.get(t, l) else {
                continue;
            };
            let noise = cfg.forecast_noise * (1.0 + 0.25 * l as f64);
            for s in 0..n_sta {
                for (p, &circular) in circulars.iter().enumerate() {
                    let scale = if circular { 10.0 * noise } else { noise };
                    let value = truth.get([p, s, o]) + scale * rng.random_range(-1.0..1.0);
                    let value = if rng.random_bool(cfg.nan_fraction) { f64::NAN } else { value };
                    fcst.set([p, s, t, l], finish(value, circular));
                }
            }
        }
    }

    let mut obs = truth;
    for s in 0..n_sta {
        for o in 0..n_obs {
            for (p, &circular) in circulars.iter().enumerate() {
                let value = if rng.random_bool(cfg.nan_fraction) {
                    f64::NAN
                } else {
                    finish(obs.get([p, s, o]), circular)
                };
                obs.set([p, s, o], value);
            }
        }
    }

    let forecasts = ForecastField::from_array(parameters.clone(), stations.clone(), times, leads, fcst)
        .context("failed to assemble forecasts")?;
    let observations = ObservationField::from_array(parameters, stations, obs_times, obs)
        .context("failed to assemble observations")?;
    let split = cfg.n_times - cfg.n_test;
    debug!(
        n_stations = n_sta,
        n_parameters = n_par,
        n_observation_times = n_obs,
        unmapped = mapping.count_unmapped(),
        "synthetic archive built"
    );

    Ok(SyntheticDataset {
        forecasts,
        observations,
        mapping,
        test_indices: (split..cfg.n_times).collect(),
        search_indices: (0..split).collect(),
    })
}
