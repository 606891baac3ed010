//! Data model for analog ensemble generation.
//!
//! | Type | Shape / role |
//! |------|--------------|
//! | [`DenseArray`] | rank-`N` column-major `f64` array, NaN = missing |
//! | [`ForecastField`] | `[parameter][station][time][lead_time]` |
//! | [`ObservationField`] | `[parameter][station][time]` |
//! | [`TimeMapping`] | `[time][lead_time] -> observation time` |
//! | [`Parameters`], [`Stations`], [`Times`] | ordered, key-unique axes |
//!
//! All inputs are built once and then borrowed immutably by the analog
//! search.

pub mod array;
pub mod error;
pub mod field;
pub mod mapping;
pub mod parameter;
pub mod registry;
pub mod station;

pub use array::{DenseArray, Field};
pub use error::DataError;
pub use field::{ForecastField, ObservationField};
pub use mapping::TimeMapping;
pub use parameter::{Parameter, Parameters};
pub use registry::{Keyed, Registry, Times};
pub use station::{Station, Stations};
