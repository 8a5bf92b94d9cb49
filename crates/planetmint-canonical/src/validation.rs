use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A string value does not have the required shape.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// A numeric value does not fit the permitted range.
    #[error("{field} ({value}) is out of bounds")]
    OutOfBounds {
        /// Field name that is out of bounds.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// Decoded bytes have the wrong length for their algorithm.
    #[error("{field} must be {expected} bytes, got {actual}")]
    WrongLength {
        /// Field name being decoded.
        field: &'static str,
        /// Length required by the algorithm.
        expected: usize,
        /// Length actually decoded.
        actual: usize,
    },
}
