//! Transaction building, signing and verification for Planetmint.
//!
//! This crate provides:
//! - Ed25519-SHA-256 conditions and fulfillments
//! - A fluent builder for CREATE and TRANSFER transactions
//! - Per-input signing through the [`TransactionSigner`] capability
//! - Offline verification of signed transactions
//!
//! Core invariants:
//! - A transaction id is `sha3_256(canonical_bytes(tx with id = null))`
//! - Every input signs the same base payload, captured before any fulfillment
//!   is written
//! - A [`SignedTransaction`] cannot be mutated, so its id stays valid
//!
#![deny(missing_docs)]

/// Builder, build options and the unsigned typestate.
pub mod builder;
/// Ed25519-SHA-256 conditions.
pub mod condition;
/// Error types for core operations.
pub mod errors;
/// Ed25519-SHA-256 fulfillments.
pub mod fulfillment;
/// Key material and the signing capability.
pub mod keys;
/// Per-input signing and the signed typestate.
pub mod signing;
/// Transaction data model.
pub mod transaction;
/// Verification logic and verdict types.
pub mod verification;

pub use builder::{
    check_back_references, BuildOptions, TransactionBuilder, UnsignedTransaction, DEFAULT_VERSION,
};
pub use condition::{condition_uri, Condition, ConditionDetails};
pub use errors::CoreError;
pub use fulfillment::Ed25519Fulfillment;
pub use keys::{Keypair, PublicKey, TransactionSigner};
pub use signing::{signing_message, SignedTransaction, Signer};
pub use transaction::{Asset, Fulfills, Input, MetaData, Operation, Output, Transaction};
pub use verification::{VerificationReport, VerificationVerdict, Verifier, Violation};

pub use planetmint_canonical::{Amount, Base58Key, Canonicalizer, TransactionId};
