//! Station-sharded runs.
//!
//! The station axis is split into contiguous ranges, each computed as an
//! independent task. Every task sends its block back over a channel and the
//! coordinator copies it into the full result. Validation and the SD table
//! are computed once and shared by every shard.

use std::ops::Range;
use std::sync::mpsc;

use tracing::{debug, info};

use crate::compute::{AnalogInputs, Prepared, StationSource};
use crate::config::AnalogConfig;
use crate::error::AnalogError;
use crate::result::AnalogResult;

/// Splits `0..n` into at most `n_shards` contiguous, near-equal ranges.
pub(crate) fn station_ranges(n: usize, n_shards: usize) -> Vec<Range<usize>> {
    let n_shards = n_shards.clamp(1, n.max(1));
    let base = n / n_shards;
    let extra = n % n_shards;
    let mut start = 0;
    (0..n_shards)
        .map(|i| {
            let len = base + usize::from(i < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .filter(|r| !r.is_empty())
        .collect()
}

/// Same as [`compute`](crate::compute()), with the station axis split into `n_shards`
/// tasks.
///
/// The result is identical to the unsharded run for any shard count.
///
/// # Errors
///
/// Returns [`AnalogError::InvalidShardCount`] for zero shards, otherwise
/// the errors of [`compute`](crate::compute()).
#[tracing::instrument(skip_all, fields(n_shards = n_shards))]
pub fn compute_sharded(
    inputs: &AnalogInputs<'_>,
    config: &AnalogConfig,
    n_shards: usize,
) -> Result<AnalogResult, AnalogError> {
    if n_shards == 0 {
        return Err(AnalogError::InvalidShardCount { n_shards });
    }
    let prepared = Prepared::new(*inputs, config, StationSource::from_config(config))?;
    let ranges = station_ranges(prepared.n_output_stations(), n_shards);
    debug!(shards = ranges.len(), "dispatching station shards");

    let (tx, rx) = mpsc::channel();
    rayon::scope(|scope| {
        for range in &ranges {
            let tx = tx.clone();
            let prepared = &prepared;
            let range = range.clone();
            scope.spawn(move |_| {
                let start = range.start;
                let block = prepared.run(range);
                // The receiver outlives the scope.
                let _ = tx.send((start, block));
            });
        }
    });
    drop(tx);

    let mut result = prepared.empty_result();
    for (start, block) in rx {
        result.merge_block(start, &block)?;
    }
    let result = prepared.finish(result);
    info!(
        missing_members = ?result.missing_member_fraction(),
        "sharded analog ensembles computed"
    );
    Ok(result)
}
