//! Error types for the anen-stats crate.

/// Error type for all fallible operations in the anen-stats crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Returned when a statistic is requested that the accumulator kind
    /// cannot provide (e.g. variance of a circular variable).
    #[error("unsupported operation: {operation}")]
    UnsupportedOperation {
        /// Description of the rejected request.
        operation: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_unsupported_operation() {
        let e = StatsError::UnsupportedOperation {
            operation: "variance of a circular variable",
        };
        assert_eq!(
            e.to_string(),
            "unsupported operation: variance of a circular variable"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<StatsError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<StatsError>();
    }
}
