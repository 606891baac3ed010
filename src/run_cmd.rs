//! Run command: synthetic archive in, analog ensembles out, summary logged.

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use anen_analog::{AnalogInputs, AnalogResult, compute, compute_sharded};

use crate::cli::RunArgs;
use crate::config::AnenConfig;
use crate::convert;
use crate::synthetic::{SyntheticDataset, synthesize};

/// Verification of the ensemble mean against the observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// (station, test time, lead time) units in the result.
    pub units: usize,
    /// Units with a verifying observation and at least one member.
    pub verified: usize,
    /// Mean absolute error of the ensemble mean over verified units.
    pub mean_abs_error: f64,
}

/// Scores the ensemble mean of every unit against its verifying observation.
///
/// Returns `None` when the result holds no members.
pub fn summarize(data: &SyntheticDataset, result: &AnalogResult, parameter: usize) -> Option<Summary> {
    let analogs = result.analogs()?;
    let [n_sta, n_test, n_lead, n_members] = analogs.shape();
    let mut verified = 0;
    let mut total = 0.0;
    for s in 0..n_sta {
        for (i, &time) in data.test_indices.iter().enumerate() {
            for l in 0..n_lead {
                let Some(o) = data.mapping.get(time, l) else {
                    continue;
                };
                let truth = data.observations.value(parameter, s, o);
                let members: Vec<f64> = (0..n_members)
                    .map(|k| analogs.get([s, i, l, k]))
                    .filter(|v| !v.is_nan())
                    .collect();
                if truth.is_nan() || members.is_empty() {
                    continue;
                }
                let mean = members.iter().sum::<f64>() / members.len() as f64;
                total += (mean - truth).abs();
                verified += 1;
            }
        }
    }
    Some(Summary {
        units: n_sta * n_test * n_lead,
        verified,
        mean_abs_error: if verified == 0 { f64::NAN } else { total / verified as f64 },
    })
}

/// Run the analog generation pipeline on the configured synthetic archive.
pub fn run(args: RunArgs) -> Result<()> {
    let _cmd = info_span!("run", config = %args.config.display()).entered();
    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let mut config: AnenConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    let n_shards = args.shards.unwrap_or(config.run.n_shards);

    // 2. Build configs from TOML
    let parameters = convert::build_parameters(&config.dataset.parameters)?;
    let analog_cfg = convert::build_analog_config(&config.analog)?;

    // 3. Build the archive
    let data = synthesize(&config.dataset, parameters, config.seed)
        .context("failed to build synthetic archive")?;
    info!(
        n_stations = data.forecasts.stations().len(),
        n_test = data.test_indices.len(),
        n_search = data.search_indices.len(),
        "synthetic archive ready"
    );

    // 4. Generate analogs
    let inputs = AnalogInputs::new(
        &data.forecasts,
        &data.observations,
        &data.mapping,
        &data.test_indices,
        &data.search_indices,
    );
    let result = if n_shards > 1 {
        compute_sharded(&inputs, &analog_cfg, n_shards)
    } else {
        compute(&inputs, &analog_cfg)
    }
    .context("analog generation failed")?;

    // 5. Report
    match summarize(&data, &result, analog_cfg.observation_parameter()) {
        Some(summary) => info!(
            units = summary.units,
            verified = summary.verified,
            mean_abs_error = summary.mean_abs_error,
            missing_members = ?result.missing_member_fraction(),
            "ensemble mean verification"
        ),
        None => warn!("analogs were not saved; nothing to verify"),
    }
    if let Some(table) = result.search_stations() {
        info!(max_neighbors = table.max_neighbors(), "search stations used");
    }
    Ok(())
}
