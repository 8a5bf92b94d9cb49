//! Canonical data model primitives for Planetmint transactions.
//!
//! Every byte that is hashed or signed by a transaction passes through this
//! crate: the deterministic JSON encoding, the SHA3-256/SHA-256 digests, the
//! identifier newtypes and the string-encoded amount type.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// Digest primitives (SHA3-256 for transactions, SHA-256 for conditions).
pub mod digest;
/// Serializer probe that rejects floating-point data before encoding.
pub mod float_guard;
/// Identifier newtypes carried by transactions.
pub mod identifiers;
/// String-encoded amounts.
pub mod quantities;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, Canonicalizer};
pub use digest::{base64url_decode, base64url_encode, Digest, DigestAlg};
pub use float_guard::reject_floats;
pub use identifiers::{Base58Key, TransactionId};
pub use quantities::Amount;
pub use validation::ValidationError;
