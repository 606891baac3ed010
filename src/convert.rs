//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use anen_analog::{AnalogConfig, OutputSelection};
use anen_data::{Parameter, Parameters};

use crate::config::{AnalogToml, ParameterToml, SaveToml};

/// Builds the parameter registry from the `[dataset]` parameter list.
pub fn build_parameters(params: &[ParameterToml]) -> Result<Parameters> {
    if params.is_empty() {
        bail!("at least one parameter must be configured");
    }
    Parameters::from_items(params.iter().map(|p| {
        Parameter::new(p.name.as_str())
            .with_circular(p.circular)
            .with_weight(p.weight)
    }))
    .context("invalid parameter list")
}

/// Builds an [`OutputSelection`] from the `[analog.save]` switches.
pub fn build_outputs(save: &SaveToml) -> OutputSelection {
    OutputSelection {
        analogs: save.analogs,
        analogs_time_index: save.analogs_time_index,
        similarity: save.similarity,
        similarity_time_index: save.similarity_time_index,
        similarity_station_index: save.similarity_station_index,
        standard_deviation: save.standard_deviation,
        search_stations: save.search_stations,
    }
}

/// Builds a validated [`AnalogConfig`] from the `[analog]` section.
pub fn build_analog_config(analog: &AnalogToml) -> Result<AnalogConfig> {
    let cfg = AnalogConfig::new(analog.num_analogs)
        .with_num_similarity(analog.num_similarity.unwrap_or(analog.num_analogs))
        .with_observation_parameter(analog.observation_parameter)
        .with_max_parameter_nan(analog.max_parameter_nan)
        .with_max_lead_time_nan(analog.max_lead_time_nan)
        .with_lead_time_radius(analog.lead_time_radius)
        .with_search_extension(analog.search_extension)
        .with_num_nearest(analog.num_nearest)
        .with_distance_threshold(analog.distance_threshold)
        .with_match_tags(analog.match_tags)
        .with_extend_observations(analog.extend_observations)
        .with_operational(analog.operational)
        .with_prevent_search_future(analog.prevent_search_future)
        .with_quick_selection(analog.quick_selection)
        .with_weights(analog.weights.clone())
        .with_outputs(build_outputs(&analog.save));
    cfg.validate().context("invalid [analog] configuration")?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_count_defaults_to_members() {
        let cfg = build_analog_config(&AnalogToml::default()).unwrap();
        assert_eq!(cfg.num_analogs(), 11);
        assert_eq!(cfg.num_similarity(), 11);
        assert!(cfg.quick_selection());
        assert!(cfg.outputs().analogs);
    }

    #[test]
    fn neighbour_settings_are_forwarded() {
        let analog = AnalogToml {
            search_extension: true,
            num_nearest: 4,
            distance_threshold: Some(3.0),
            match_tags: true,
            ..AnalogToml::default()
        };
        let cfg = build_analog_config(&analog).unwrap();
        assert!(cfg.search_extension());
        assert_eq!(cfg.neighbors().num_nearest(), 4);
        assert_eq!(cfg.neighbors().distance_threshold(), Some(3.0));
        assert!(cfg.neighbors().match_tags());
    }

    #[test]
    fn invalid_analog_section_is_reported() {
        let analog = AnalogToml {
            num_analogs: 5,
            num_similarity: Some(2),
            ..AnalogToml::default()
        };
        let err = build_analog_config(&analog).unwrap_err();
        assert!(format!("{err:#}").contains("num_similarity (2)"));
    }

    #[test]
    fn duplicate_parameter_names_fail() {
        let p = ParameterToml {
            name: "t2m".to_string(),
            circular: false,
            weight: 1.0,
        };
        assert!(build_parameters(&[p.clone(), p]).is_err());
        assert!(build_parameters(&[]).is_err());
    }
}
