//! Output of an analog ensemble run.

use anen_data::{DataError, DenseArray, Field};
use anen_knn::SearchStationTable;

use crate::selection::Slot;

/// Arrays produced by one run; only the requested ones are present.
///
/// Per-unit arrays are indexed `[station][test_time][lead_time][rank]`,
/// where the station axis is the observation station axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalogResult {
    analogs: Option<DenseArray<4>>,
    analogs_time_index: Option<DenseArray<4>>,
    similarity: Option<DenseArray<4>>,
    similarity_time_index: Option<DenseArray<4>>,
    similarity_station_index: Option<DenseArray<4>>,
    standard_deviation: Option<DenseArray<4>>,
    search_stations: Option<SearchStationTable>,
    station_match: Option<Vec<usize>>,
}

impl AnalogResult {
    /// Analog member values; NaN where fewer members were available.
    pub fn analogs(&self) -> Option<&DenseArray<4>> {
        self.analogs.as_ref()
    }

    /// Observation-time index of every member.
    pub fn analogs_time_index(&self) -> Option<&DenseArray<4>> {
        self.analogs_time_index.as_ref()
    }

    /// Metrics of the best `num_similarity` candidates.
    pub fn similarity(&self) -> Option<&DenseArray<4>> {
        self.similarity.as_ref()
    }

    /// Forecast time index of the best `num_similarity` candidates.
    pub fn similarity_time_index(&self) -> Option<&DenseArray<4>> {
        self.similarity_time_index.as_ref()
    }

    /// Forecast station index of the best `num_similarity` candidates.
    pub fn similarity_station_index(&self) -> Option<&DenseArray<4>> {
        self.similarity_station_index.as_ref()
    }

    /// Normalization table `[parameter][station][lead_time][step]`.
    pub fn standard_deviation(&self) -> Option<&DenseArray<4>> {
        self.standard_deviation.as_ref()
    }

    /// Neighbour table used for search space extension.
    pub fn search_stations(&self) -> Option<&SearchStationTable> {
        self.search_stations.as_ref()
    }

    /// Forecast station matched to every observation station.
    pub fn station_match(&self) -> Option<&[usize]> {
        self.station_match.as_deref()
    }

    /// Fraction of member slots left NaN, or `None` without members.
    pub fn missing_member_fraction(&self) -> Option<f64> {
        let analogs = self.analogs.as_ref()?;
        if analogs.is_empty() {
            return Some(0.0);
        }
        Some(analogs.count_missing() as f64 / analogs.len() as f64)
    }

    pub(crate) fn slot(&self, slot: Slot) -> Option<&DenseArray<4>> {
        match slot {
            Slot::Analogs => self.analogs.as_ref(),
            Slot::AnalogsTimeIndex => self.analogs_time_index.as_ref(),
            Slot::Similarity => self.similarity.as_ref(),
            Slot::SimilarityTimeIndex => self.similarity_time_index.as_ref(),
            Slot::SimilarityStationIndex => self.similarity_station_index.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut Option<DenseArray<4>> {
        match slot {
            Slot::Analogs => &mut self.analogs,
            Slot::AnalogsTimeIndex => &mut self.analogs_time_index,
            Slot::Similarity => &mut self.similarity,
            Slot::SimilarityTimeIndex => &mut self.similarity_time_index,
            Slot::SimilarityStationIndex => &mut self.similarity_station_index,
        }
    }

    pub(crate) fn set_standard_deviation(&mut self, table: DenseArray<4>) {
        self.standard_deviation = Some(table);
    }

    pub(crate) fn set_search_stations(&mut self, table: SearchStationTable) {
        self.search_stations = Some(table);
    }

    pub(crate) fn set_station_match(&mut self, matched: Vec<usize>) {
        self.station_match = Some(matched);
    }

    /// Copies every per-unit array of `block` into this result, starting at
    /// station `start`.
    pub(crate) fn merge_block(&mut self, start: usize, block: &AnalogResult) -> Result<(), DataError> {
        for slot in Slot::ALL {
            if let (Some(full), Some(part)) = (self.slot_mut(slot).as_mut(), block.slot(slot)) {
                full.copy_leading_block(start, part)?;
            }
        }
        Ok(())
    }
}
