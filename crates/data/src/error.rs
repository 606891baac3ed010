//! Error types for the anen-data crate.

/// Error type for all fallible operations in the anen-data crate.
///
/// Covers duplicate or unknown keys in the index collections and shape
/// disagreements between flat buffers, arrays and their axis collections.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    /// Returned when a key is inserted twice into an index collection.
    #[error("duplicate key '{key}' in {collection}")]
    DuplicateKey {
        /// Name of the collection that rejected the key.
        collection: &'static str,
        /// Display form of the repeated key.
        key: String,
    },

    /// Returned when a key is looked up but was never registered.
    #[error("unknown key '{key}' in {collection}")]
    UnknownKey {
        /// Name of the collection that was searched.
        collection: &'static str,
        /// Display form of the missing key.
        key: String,
    },

    /// Returned when a flat buffer does not match the product of a shape.
    #[error("buffer length {got} does not match shape volume {expected}")]
    ShapeMismatch {
        /// Product of the requested shape.
        expected: usize,
        /// Length of the supplied buffer.
        got: usize,
    },

    /// Returned when an array axis disagrees with its axis collection.
    #[error("axis '{axis}' has extent {got}, expected {expected}")]
    AxisMismatch {
        /// Name of the offending axis.
        axis: &'static str,
        /// Length of the axis collection.
        expected: usize,
        /// Extent of the array along that axis.
        got: usize,
    },
}
