//! Nearest-neighbour station search for search space extension.
//!
//! Stations are points in the plane. For every target station the crate
//! builds a list of nearby candidate stations bounded by:
//!
//! | Criterion | Setting | Effect |
//! |-----------|---------|--------|
//! | Count | `num_nearest` | keep at most this many, nearest first |
//! | Distance | `distance_threshold` | keep only `distance <= threshold` |
//! | Tag | `match_tags` | never pair stations with different tags |
//!
//! `num_nearest == 0` keeps every station within the threshold.
//!
//! # Quick start
//!
//! ```
//! use anen_knn::{NeighborConfig, search_stations};
//!
//! let coords = [(0.0, 0.0), (0.5, 0.0), (3.0, 0.0)];
//! let tags = [0, 0, 0];
//! let config = NeighborConfig::new(0).with_distance_threshold(Some(1.0));
//! let table = search_stations(&coords, &tags, &coords, &tags, &config).unwrap();
//! assert_eq!(table.neighbors(0), &[0, 1]);
//! assert_eq!(table.neighbors(2), &[2]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! search_stations()
//!   ├─ validate config, coordinates, tags
//!   └─ per target:
//!        ├─ distances()          (distance.rs)
//!        └─ select_k_nearest()   (select.rs)
//!             └─ partial_select_by()
//! match_nearest()                 one nearest candidate per target
//! ```
//!
//! [`partial_select_by`] and [`nan_last_cmp`] are public so the analog
//! selection can rank similarity records with the same primitive.

pub mod config;
pub mod error;
pub mod search;
pub mod select;

pub(crate) mod distance;

pub use config::NeighborConfig;
pub use error::KnnError;
pub use search::{SearchStationTable, match_nearest, search_stations};
pub use select::{nan_last_cmp, partial_select_by};
