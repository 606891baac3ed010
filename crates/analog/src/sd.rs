//! Normalization standard deviations, fixed and operational.

use anen_data::{DenseArray, ForecastField};
use anen_stats::MetricCalculator;
use rayon::prelude::*;
use tracing::debug;

use crate::error::AnalogError;

pub(crate) fn check_indices(role: &'static str, indices: &[usize], n_times: usize) -> Result<(), AnalogError> {
    if let Some(&index) = indices.iter().find(|&&i| i >= n_times) {
        return Err(AnalogError::TimeIndexOutOfRange {
            role,
            index,
            n_times,
        });
    }
    Ok(())
}

/// Computes the SD table `[parameter][station][lead_time][step]`.
///
/// Step 0 is the SD of the forecasts at the `fixed` time indices. With
/// `accumulation = Some(times)` there is one step per accumulation time:
/// step `i` adds the first `i` accumulation samples to the fixed ones. A
/// NaN sample carries the previous step's SD forward. Parameters with zero
/// weight are left NaN.
///
/// # Errors
///
/// Returns [`AnalogError::EmptyAccumulation`] for `Some(&[])`,
/// [`AnalogError::WeightCountMismatch`] if `weights` or `circulars` do not
/// have one entry per parameter, and [`AnalogError::TimeIndexOutOfRange`]
/// for an index past the forecast time axis.
#[tracing::instrument(skip_all, fields(n_fixed = fixed.len(), operational = accumulation.is_some()))]
pub fn standard_deviations(
    forecasts: &ForecastField,
    weights: &[f64],
    circulars: &[bool],
    fixed: &[usize],
    accumulation: Option<&[usize]>,
) -> Result<DenseArray<4>, AnalogError> {
    let [n_par, n_sta, n_times, n_lead] = forecasts.data().shape();
    for got in [weights.len(), circulars.len()] {
        if got != n_par {
            return Err(AnalogError::WeightCountMismatch {
                expected: n_par,
                got,
            });
        }
    }
    check_indices("search", fixed, n_times)?;
    let accumulation = match accumulation {
        Some([]) => return Err(AnalogError::EmptyAccumulation),
        Some(times) => {
            check_indices("test", times, n_times)?;
            times
        }
        None => &[][..],
    };
    let steps = accumulation.len().max(1);
    let n_triples = n_par * n_sta * n_lead;

    // Triple-major rows so every (parameter, station, lead) owns a slice.
    let mut rows = vec![f64::NAN; n_triples * steps];
    rows.par_chunks_mut(steps)
        .enumerate()
        .for_each(|(triple, row)| {
            let p = triple % n_par;
            let s = (triple / n_par) % n_sta;
            let l = triple / (n_par * n_sta);
            if weights[p] == 0.0 {
                return;
            }
            let mut calc = MetricCalculator::new(circulars[p]);
            for &t in fixed {
                calc.push(forecasts.value(p, s, t, l));
            }
            row[0] = calc.standard_deviation();
            for i in 1..steps {
                let sample = forecasts.value(p, s, accumulation[i - 1], l);
                if sample.is_nan() {
                    row[i] = row[i - 1];
                } else {
                    calc.push(sample);
                    row[i] = calc.standard_deviation();
                }
            }
        });

    let mut table = DenseArray::new([n_par, n_sta, n_lead, steps]);
    let out = table.as_mut_slice();
    for (triple, row) in rows.chunks_exact(steps).enumerate() {
        for (step, &sd) in row.iter().enumerate() {
            out[triple + n_triples * step] = sd;
        }
    }
    debug!(n_triples, steps, "standard deviations computed");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anen_data::{Field, Parameter, Parameters, Station, Stations, Times};
    use approx::assert_relative_eq;

    fn field(values: &[[f64; 2]]) -> ForecastField {
        let n_times = values.len();
        let mut f = ForecastField::new(
            Parameters::from_items([
                Parameter::new("lin"),
                Parameter::new("dir").with_circular(true),
            ])
            .unwrap(),
            Stations::from_items([Station::new("a", 0.0, 0.0)]).unwrap(),
            Times::from_items((0..n_times as i64).map(|t| t * 10)).unwrap(),
            Times::from_items([0]).unwrap(),
        );
        for (t, v) in values.iter().enumerate() {
            f.set_value([0, 0, t, 0], v[0]);
            f.set_value([1, 0, t, 0], v[1]);
        }
        f
    }

    #[test]
    fn fixed_mode_single_step() {
        let f = field(&[[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [9.0, 40.0]]);
        let sd = standard_deviations(&f, &[1.0, 1.0], &[false, true], &[0, 1, 2], None).unwrap();
        assert_eq!(sd.shape(), [2, 1, 1, 1]);
        assert_relative_eq!(sd.get([0, 0, 0, 0]), 1.0, epsilon = 1e-12);
        assert!(sd.get([1, 0, 0, 0]) > 0.0);
    }

    #[test]
    fn zero_weight_is_left_nan() {
        let f = field(&[[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]);
        let sd = standard_deviations(&f, &[0.0, 1.0], &[false, true], &[0, 1, 2], Some(&[2][..])).unwrap();
        assert!(sd.get([0, 0, 0, 0]).is_nan());
        assert!(!sd.get([1, 0, 0, 0]).is_nan());
    }

    #[test]
    fn operational_steps_accumulate() {
        let f = field(&[[1.0, 0.0], [3.0, 0.0], [5.0, 0.0], [7.0, 0.0], [100.0, 0.0]]);
        let sd = standard_deviations(&f, &[1.0, 0.0], &[false, false], &[0, 1], Some(&[2, 3, 4][..])).unwrap();
        assert_eq!(sd.shape(), [2, 1, 1, 3]);
        assert_relative_eq!(sd.get([0, 0, 0, 0]), 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(sd.get([0, 0, 0, 1]), 2.0, epsilon = 1e-12);
        // Last accumulation time never enters: step 2 covers times 0..=3.
        assert_relative_eq!(sd.get([0, 0, 0, 2]), (20.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn nan_sample_carries_forward() {
        let f = field(&[[1.0, 0.0], [3.0, 0.0], [f64::NAN, 0.0], [7.0, 0.0]]);
        let sd = standard_deviations(&f, &[1.0, 0.0], &[false, false], &[0, 1], Some(&[2, 3][..])).unwrap();
        assert_eq!(sd.get([0, 0, 0, 1]), sd.get([0, 0, 0, 0]));
    }

    #[test]
    fn empty_accumulation_is_rejected() {
        let f = field(&[[1.0, 0.0], [2.0, 0.0]]);
        let err = standard_deviations(&f, &[1.0, 1.0], &[false, true], &[0, 1], Some(&[][..])).unwrap_err();
        assert!(matches!(err, AnalogError::EmptyAccumulation));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let f = field(&[[1.0, 0.0], [2.0, 0.0]]);
        let err = standard_deviations(&f, &[1.0, 1.0], &[false, true], &[0, 2], None).unwrap_err();
        assert!(matches!(
            err,
            AnalogError::TimeIndexOutOfRange {
                role: "search",
                index: 2,
                n_times: 2
            }
        ));
    }
}
