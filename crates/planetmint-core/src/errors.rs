use thiserror::Error;

/// Errors surfaced by building, signing and verifying transactions.
///
/// Every variant means "no transaction was produced"; nothing is retried.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Operation tag is not `CREATE` or `TRANSFER`.
    #[error("invalid operation {0:?}: accepted values are CREATE and TRANSFER")]
    InvalidOperation(String),
    /// Output amount is not a non-negative integer string.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[source] planetmint_canonical::ValidationError),
    /// Public or private key bytes are malformed.
    #[error("malformed key: {0}")]
    KeyFormat(String),
    /// The signature algorithm failed or a signature has the wrong shape.
    #[error("signing failed: {0}")]
    Signing(String),
    /// A value reached the canonical encoder that cannot be encoded.
    #[error("encoding failed: {0}")]
    Encoding(#[from] planetmint_canonical::CanonicalizationError),
    /// An input's back-reference does not fit the operation.
    #[error("input {index}: {reason}")]
    InputReference {
        /// Position of the offending input.
        index: usize,
        /// What is wrong with its `fulfills`.
        reason: String,
    },
    /// A field failed primitive validation.
    #[error("validation failed: {0}")]
    Validation(#[from] planetmint_canonical::ValidationError),
}
