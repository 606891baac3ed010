//! Lookup from (forecast time, lead time) to the verifying observation time.

use crate::error::DataError;
use crate::registry::Times;

/// Table `[forecast_time][lead_time] -> Option<observation_time_index>`.
///
/// A forecast issued at `t` with lead time `l` verifies at `t + l`; the
/// entry holds the position of that timestamp in the observation times, or
/// `None` when no observation exists for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMapping {
    n_times: usize,
    n_lead_times: usize,
    table: Vec<Option<usize>>,
}

impl TimeMapping {
    /// Builds the mapping by looking up every `time + lead_time` in
    /// `observation_times`.
    pub fn build(forecast_times: &Times, lead_times: &Times, observation_times: &Times) -> Self {
        let n_times = forecast_times.len();
        let n_lead_times = lead_times.len();
        let mut table = Vec::with_capacity(n_times * n_lead_times);
        for &lead in lead_times {
            for &time in forecast_times {
                table.push(observation_times.position(&(time + lead)));
            }
        }
        Self {
            n_times,
            n_lead_times,
            table,
        }
    }

    /// Wraps a precomputed table stored lead-time major
    /// (`table[lead * n_times + time]`).
    ///
    /// # Errors
    ///
    /// Returns [`DataError::ShapeMismatch`] if the table length is not
    /// `n_times * n_lead_times`.
    pub fn from_table(
        n_times: usize,
        n_lead_times: usize,
        table: Vec<Option<usize>>,
    ) -> Result<Self, DataError> {
        if table.len() != n_times * n_lead_times {
            return Err(DataError::ShapeMismatch {
                expected: n_times * n_lead_times,
                got: table.len(),
            });
        }
        Ok(Self {
            n_times,
            n_lead_times,
            table,
        })
    }

    /// Observation-time index for a forecast time and lead time.
    #[inline]
    pub fn get(&self, time: usize, lead_time: usize) -> Option<usize> {
        debug_assert!(time < self.n_times && lead_time < self.n_lead_times);
        self.table[lead_time * self.n_times + time]
    }

    /// `(n_times, n_lead_times)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_times, self.n_lead_times)
    }

    /// Number of entries without an observation.
    pub fn count_unmapped(&self) -> usize {
        self.table.iter().filter(|e| e.is_none()).count()
    }
}
