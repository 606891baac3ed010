//! Ranking of a unit's candidate buffer and extraction of its outputs.

use std::ops::Range;

use anen_knn::partial_select_by;

use crate::config::OutputSelection;
use crate::record::{SimilarityRecord, index_value};

/// Moves the best `num_similarity` records to the front, and the best
/// `num_analogs` to the front of those.
///
/// Quick mode only partitions, so order inside each group is unspecified.
/// Otherwise the first `num_similarity` records are sorted ascending. NaN
/// metrics rank last in both modes.
pub(crate) fn rank(
    records: &mut [SimilarityRecord],
    num_analogs: usize,
    num_similarity: usize,
    quick: bool,
) {
    let m = num_similarity.min(records.len());
    let k = num_analogs.min(m);
    partial_select_by(records, m, SimilarityRecord::cmp_metric);
    if quick {
        partial_select_by(&mut records[..m], k, SimilarityRecord::cmp_metric);
    } else {
        records[..m].sort_by(SimilarityRecord::cmp_metric);
    }
}

/// Per-unit output arrays, in row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Analogs,
    AnalogsTimeIndex,
    Similarity,
    SimilarityTimeIndex,
    SimilarityStationIndex,
}

impl Slot {
    pub(crate) const ALL: [Slot; 5] = [
        Slot::Analogs,
        Slot::AnalogsTimeIndex,
        Slot::Similarity,
        Slot::SimilarityTimeIndex,
        Slot::SimilarityStationIndex,
    ];

    fn enabled(self, outputs: &OutputSelection) -> bool {
        match self {
            Slot::Analogs => outputs.analogs,
            Slot::AnalogsTimeIndex => outputs.analogs_time_index,
            Slot::Similarity => outputs.similarity,
            Slot::SimilarityTimeIndex => outputs.similarity_time_index,
            Slot::SimilarityStationIndex => outputs.similarity_station_index,
        }
    }
}

/// Where each enabled output lives inside one unit's row of scratch
/// output.
#[derive(Debug, Clone)]
pub(crate) struct RowLayout {
    num_analogs: usize,
    num_similarity: usize,
    offsets: [Option<usize>; 5],
    width: usize,
}

impl RowLayout {
    pub(crate) fn new(outputs: &OutputSelection, num_analogs: usize, num_similarity: usize) -> Self {
        let mut offsets = [None; 5];
        let mut width = 0;
        for (i, slot) in Slot::ALL.into_iter().enumerate() {
            if slot.enabled(outputs) {
                offsets[i] = Some(width);
                width += match slot {
                    Slot::Analogs | Slot::AnalogsTimeIndex => num_analogs,
                    _ => num_similarity,
                };
            }
        }
        Self {
            num_analogs,
            num_similarity,
            offsets,
            width,
        }
    }

    /// Total row width; zero when no per-unit output is requested.
    pub(crate) fn width(&self) -> usize {
        self.width
    }

    /// Column range of a slot within the row, if enabled.
    pub(crate) fn section(&self, slot: Slot) -> Option<Range<usize>> {
        let i = Slot::ALL.iter().position(|&s| s == slot)?;
        let start = self.offsets[i]?;
        let len = match slot {
            Slot::Analogs | Slot::AnalogsTimeIndex => self.num_analogs,
            _ => self.num_similarity,
        };
        Some(start..start + len)
    }

    /// Writes a ranked buffer into `row`, which must be NaN-filled.
    ///
    /// Members are the observations behind the first `num_analogs` records;
    /// a record without an observation time leaves its member NaN.
    /// `member_value` maps a record and its observation time to the value.
    pub(crate) fn write_row(
        &self,
        row: &mut [f64],
        records: &[SimilarityRecord],
        member_value: impl Fn(&SimilarityRecord, usize) -> f64,
    ) {
        let analogs = self.section(Slot::Analogs);
        let analogs_time = self.section(Slot::AnalogsTimeIndex);
        for (rank, record) in records.iter().take(self.num_analogs).enumerate() {
            let Some(obs_time) = record.observation_time else {
                continue;
            };
            if let Some(r) = &analogs {
                row[r.start + rank] = member_value(record, obs_time);
            }
            if let Some(r) = &analogs_time {
                row[r.start + rank] = obs_time as f64;
            }
        }

        let similarity = self.section(Slot::Similarity);
        let time_index = self.section(Slot::SimilarityTimeIndex);
        let station_index = self.section(Slot::SimilarityStationIndex);
        for (rank, record) in records.iter().take(self.num_similarity).enumerate() {
            if let Some(r) = &similarity {
                row[r.start + rank] = record.metric;
            }
            if let Some(r) = &time_index {
                row[r.start + rank] = index_value(record.search_time);
            }
            if let Some(r) = &station_index {
                row[r.start + rank] = index_value(record.station);
            }
        }
    }
}
