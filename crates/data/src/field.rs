//! Forecast and observation fields: dense arrays bundled with their axes.

use crate::array::{DenseArray, Field};
use crate::error::DataError;
use crate::parameter::Parameters;
use crate::registry::Times;
use crate::station::Stations;

fn check_axis(axis: &'static str, expected: usize, got: usize) -> Result<(), DataError> {
    if expected != got {
        return Err(DataError::AxisMismatch {
            axis,
            expected,
            got,
        });
    }
    Ok(())
}

/// Gridded forecasts indexed `[parameter][station][time][lead_time]`.
#[derive(Debug, Clone)]
pub struct ForecastField {
    parameters: Parameters,
    stations: Stations,
    times: Times,
    lead_times: Times,
    data: DenseArray<4>,
}

impl ForecastField {
    /// Creates a NaN-filled forecast field sized by its axis collections.
    pub fn new(parameters: Parameters, stations: Stations, times: Times, lead_times: Times) -> Self {
        let data = DenseArray::new([
            parameters.len(),
            stations.len(),
            times.len(),
            lead_times.len(),
        ]);
        Self {
            parameters,
            stations,
            times,
            lead_times,
            data,
        }
    }

    /// Wraps an existing array.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::AxisMismatch`] if any array extent differs from
    /// the length of its axis collection.
    pub fn from_array(
        parameters: Parameters,
        stations: Stations,
        times: Times,
        lead_times: Times,
        data: DenseArray<4>,
    ) -> Result<Self, DataError> {
        let [np, ns, nt, nl] = data.shape();
        check_axis("parameters", parameters.len(), np)?;
        check_axis("stations", stations.len(), ns)?;
        check_axis("times", times.len(), nt)?;
        check_axis("lead_times", lead_times.len(), nl)?;
        Ok(Self {
            parameters,
            stations,
            times,
            lead_times,
            data,
        })
    }

    /// Forecast value. NaN when missing.
    #[inline]
    pub fn value(&self, parameter: usize, station: usize, time: usize, lead_time: usize) -> f64 {
        self.data.get([parameter, station, time, lead_time])
    }

    /// Parameter axis.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Station axis.
    pub fn stations(&self) -> &Stations {
        &self.stations
    }

    /// Initialization-time axis.
    pub fn times(&self) -> &Times {
        &self.times
    }

    /// Lead-time axis.
    pub fn lead_times(&self) -> &Times {
        &self.lead_times
    }

    /// Underlying array.
    pub fn data(&self) -> &DenseArray<4> {
        &self.data
    }
}

impl Field<4> for ForecastField {
    fn shape(&self) -> [usize; 4] {
        self.data.shape()
    }

    fn value(&self, index: [usize; 4]) -> f64 {
        self.data.get(index)
    }

    fn set_value(&mut self, index: [usize; 4], value: f64) {
        self.data.set(index, value);
    }

    fn count_missing(&self) -> usize {
        self.data.count_missing()
    }
}

/// Observations indexed `[parameter][station][time]`.
#[derive(Debug, Clone)]
pub struct ObservationField {
    parameters: Parameters,
    stations: Stations,
    times: Times,
    data: DenseArray<3>,
}

impl ObservationField {
    /// Creates a NaN-filled observation field sized by its axis collections.
    pub fn new(parameters: Parameters, stations: Stations, times: Times) -> Self {
        let data = DenseArray::new([parameters.len(), stations.len(), times.len()]);
        Self {
            parameters,
            stations,
            times,
            data,
        }
    }

    /// Wraps an existing array.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::AxisMismatch`] if any array extent differs from
    /// the length of its axis collection.
    pub fn from_array(
        parameters: Parameters,
        stations: Stations,
        times: Times,
        data: DenseArray<3>,
    ) -> Result<Self, DataError> {
        let [np, ns, nt] = data.shape();
        check_axis("parameters", parameters.len(), np)?;
        check_axis("stations", stations.len(), ns)?;
        check_axis("times", times.len(), nt)?;
        Ok(Self {
            parameters,
            stations,
            times,
            data,
        })
    }

    /// Observed value. NaN when missing.
    #[inline]
    pub fn value(&self, parameter: usize, station: usize, time: usize) -> f64 {
        self.data.get([parameter, station, time])
    }

    /// Parameter axis.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Station axis.
    pub fn stations(&self) -> &Stations {
        &self.stations
    }

    /// Observation-time axis.
    pub fn times(&self) -> &Times {
        &self.times
    }

    /// Underlying array.
    pub fn data(&self) -> &DenseArray<3> {
        &self.data
    }
}

impl Field<3> for ObservationField {
    fn shape(&self) -> [usize; 3] {
        self.data.shape()
    }

    fn value(&self, index: [usize; 3]) -> f64 {
        self.data.get(index)
    }

    fn set_value(&mut self, index: [usize; 3], value: f64) {
        self.data.set(index, value);
    }

    fn count_missing(&self) -> usize {
        self.data.count_missing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameter;
    use crate::station::Station;

    fn axes() -> (Parameters, Stations, Times, Times) {
        (
            Parameters::from_items([Parameter::new("a"), Parameter::new("b")]).unwrap(),
            Stations::from_items([Station::new("s", 0.0, 0.0)]).unwrap(),
            Times::from_items([0, 10, 20]).unwrap(),
            Times::from_items([0, 1]).unwrap(),
        )
    }

    #[test]
    fn forecast_new_is_sized_by_axes() {
        let (p, s, t, l) = axes();
        let f = ForecastField::new(p, s, t, l);
        assert_eq!(Field::shape(&f), [2, 1, 3, 2]);
        assert_eq!(f.count_missing(), 12);
    }

    #[test]
    fn forecast_set_and_read() {
        let (p, s, t, l) = axes();
        let mut f = ForecastField::new(p, s, t, l);
        f.set_value([1, 0, 2, 1], 4.0);
        assert_eq!(f.value(1, 0, 2, 1), 4.0);
        assert_eq!(f.count_missing(), 11);
    }

    #[test]
    fn forecast_from_array_checks_axes() {
        let (p, s, t, l) = axes();
        let err = ForecastField::from_array(p, s, t, l, DenseArray::new([2, 1, 3, 3])).unwrap_err();
        assert_eq!(
            err,
            DataError::AxisMismatch {
                axis: "lead_times",
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn observation_from_array_checks_axes() {
        let (p, s, t, _) = axes();
        let err = ObservationField::from_array(p, s, t, DenseArray::new([2, 2, 3])).unwrap_err();
        assert_eq!(err.to_string(), "axis 'stations' has extent 2, expected 1");
    }

    #[test]
    fn observation_set_and_read() {
        let (p, s, t, _) = axes();
        let mut o = ObservationField::new(p, s, t);
        o.set_value([0, 0, 1], -1.5);
        assert_eq!(o.value(0, 0, 1), -1.5);
        assert!(o.value(1, 0, 1).is_nan());
    }
}
