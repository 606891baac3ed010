//! Analog ensemble generation.
//!
//! For every (station, test time, lead time) the crate scores each
//! historical forecast against the test forecast, keeps the most similar
//! ones, and returns the observations that verified them as ensemble
//! members.
//!
//! # Modes
//!
//! | Entry point | Candidates | Output stations |
//! |-------------|------------|-----------------|
//! | [`compute`] | own history, or neighbours with `search_extension` | forecast stations |
//! | [`compute_with_stations`] | caller-supplied neighbour table | forecast stations |
//! | [`compute_mismatched`] | matched forecast station and its neighbours | observation stations |
//! | [`compute_sharded`] | as [`compute`], split by station | forecast stations |
//!
//! With `operational` set, every test time also searches the test times
//! before it, and the normalization SD is recomputed as they accumulate.
//!
//! # Architecture
//!
//! ```text
//! compute*()
//!   └─ Prepared::new()              (compute.rs)
//!        ├─ validate config, indices, shapes, ordering
//!        ├─ station plan            (anen_knn)
//!        └─ standard_deviations()   (sd.rs)
//!   └─ Prepared::run()              rayon, one row per unit
//!        ├─ Scorer::evaluate()      (similarity.rs)
//!        ├─ rank()                  (selection.rs)
//!        └─ RowLayout::write_row()
//! compute_sharded()                 (shard.rs)
//!   └─ rayon::scope, one task per station range, merged over a channel
//! ```

pub mod compute;
pub mod config;
pub mod error;
pub mod record;
pub mod result;
pub mod sd;
pub mod shard;

pub(crate) mod selection;
pub(crate) mod similarity;

pub use compute::{AnalogInputs, compute, compute_mismatched, compute_with_stations};
pub use config::{AnalogConfig, OutputSelection};
pub use error::AnalogError;
pub use record::SimilarityRecord;
pub use result::AnalogResult;
pub use sd::standard_deviations;
pub use shard::compute_sharded;
