//! Per-input signing and identification.
//!
//! Every input signs the same base payload: the canonical transaction with
//! `id` and all fulfillments null, captured once before any fulfillment is
//! written. An input that spends a prior output appends the output's
//! transaction id and decimal index to that base. The signed message is the
//! SHA3-256 digest of the result.
//!
//! Once all inputs carry a fulfillment, the id is SHA3-256 over the canonical
//! transaction with fulfillments present and `id` null.

use planetmint_canonical::{Canonicalizer, Digest, TransactionId};
use serde::Serialize;
use serde_json::Value;

use crate::builder::UnsignedTransaction;
use crate::errors::CoreError;
use crate::fulfillment::Ed25519Fulfillment;
use crate::keys::TransactionSigner;
use crate::transaction::{Fulfills, Transaction};

/// Digest an input signs: `sha3_256(base || transaction_id || output_index)`.
pub fn signing_message(base: &[u8], fulfills: Option<&Fulfills>) -> Digest {
    match fulfills {
        Some(fulfills) => {
            let index = fulfills.output_index.to_string();
            Digest::sha3_256_parts(&[
                base,
                fulfills.transaction_id.as_str().as_bytes(),
                index.as_bytes(),
            ])
        }
        None => Digest::sha3_256(base),
    }
}

/// Drives signing of unsigned transactions.
#[derive(Debug, Clone, Default)]
pub struct Signer {
    canonicalizer: Canonicalizer,
}

impl Signer {
    /// Creates a signer that encodes with `canonicalizer`.
    pub fn new(canonicalizer: Canonicalizer) -> Self {
        Self { canonicalizer }
    }

    /// Signs every input in order, then assigns the id.
    ///
    /// The signer's key must be one of each input's `owners_before`. Any
    /// failure aborts the whole operation; the partially signed value is
    /// dropped, never returned.
    pub fn sign<A, M, S>(
        &self,
        unsigned: UnsignedTransaction<A, M>,
        signer: &S,
    ) -> Result<SignedTransaction<A, M>, CoreError>
    where
        A: Serialize,
        M: Serialize,
        S: TransactionSigner + ?Sized,
    {
        let mut transaction = unsigned.into_transaction();
        let base = transaction.signing_base(&self.canonicalizer)?;
        let public_key = signer.public_key();
        let owner = public_key.to_base58();

        for (index, input) in transaction.inputs.iter_mut().enumerate() {
            if !input.owners_before.contains(&owner) {
                return Err(CoreError::Signing(format!(
                    "input {index}: signing key {owner} is not among owners_before"
                )));
            }
            let message = signing_message(&base, input.fulfills.as_ref());
            let signature = signer.sign(message.as_bytes())?;
            input.fulfillment = Some(Ed25519Fulfillment::new(public_key, signature).to_uri());
            tracing::debug!(
                index,
                spends = input.fulfills.is_some(),
                "input signed"
            );
        }

        let id = transaction.compute_id(&self.canonicalizer)?;
        transaction.id = Some(id.clone());
        let wire = self.canonicalizer.canonicalize(&transaction.to_json()?)?;

        tracing::debug!(%id, operation = %transaction.operation, "transaction identified");

        Ok(SignedTransaction {
            transaction,
            id,
            wire,
        })
    }
}

/// A fully signed, identified transaction.
///
/// There is no mutable access to the inner value, so the id cannot be
/// invalidated after the fact.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction<A = Value, M = Value> {
    transaction: Transaction<A, M>,
    id: TransactionId,
    wire: Vec<u8>,
}

impl<A, M> SignedTransaction<A, M> {
    /// Content-derived id, used for lookups.
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    /// Read access to the signed transaction.
    pub fn transaction(&self) -> &Transaction<A, M> {
        &self.transaction
    }

    /// Canonical bytes of the signed transaction, the transport payload.
    pub fn to_wire(&self) -> &[u8] {
        &self.wire
    }
}

impl<A: Clone, M: Clone> SignedTransaction<A, M> {
    /// The same skeleton with fulfillments and id cleared, ready to re-sign.
    pub fn to_unsigned(&self) -> UnsignedTransaction<A, M> {
        UnsignedTransaction::from_transaction(self.transaction.clone())
    }
}

impl<A: Serialize, M: Serialize> SignedTransaction<A, M> {
    /// JSON value of the signed transaction.
    pub fn to_json(&self) -> Result<Value, CoreError> {
        self.transaction.to_json()
    }
}
