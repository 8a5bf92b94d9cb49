//! Offline verification of signed transactions.
//!
//! The verifier re-derives everything a ledger node would: the id, each
//! output's condition URI, and each input's signature over the recomputed
//! pre-image. Findings are collected into a report rather than stopping at
//! the first one; only un-encodable data is an error.

use planetmint_canonical::{Base58Key, Canonicalizer};
use serde::{Deserialize, Serialize};

use crate::builder::check_back_references;
use crate::condition::{condition_uri, ED25519_SHA256_TYPE};
use crate::errors::CoreError;
use crate::fulfillment::Ed25519Fulfillment;
use crate::keys::PublicKey;
use crate::signing::signing_message;
use crate::transaction::{Asset, Operation, Output, Transaction};

/// Overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationVerdict {
    /// Every check passed.
    Ok,
    /// At least one violation was found.
    Invalid,
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Where the problem is, e.g. `inputs[1]` or `id`.
    pub location: String,
    /// What is wrong.
    pub reason: String,
}

/// Result of verifying one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Overall verdict.
    pub verdict: VerificationVerdict,
    /// Every failed check, in the order found.
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    fn from_violations(violations: Vec<Violation>) -> Self {
        let verdict = if violations.is_empty() {
            VerificationVerdict::Ok
        } else {
            VerificationVerdict::Invalid
        };
        Self {
            verdict,
            violations,
        }
    }

    /// True when the verdict is [`VerificationVerdict::Ok`].
    pub fn is_ok(&self) -> bool {
        self.verdict == VerificationVerdict::Ok
    }
}

/// Verifier for signed transactions.
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    canonicalizer: Canonicalizer,
}

impl Verifier {
    /// Creates a verifier that encodes with `canonicalizer`.
    pub fn new(canonicalizer: Canonicalizer) -> Self {
        Self { canonicalizer }
    }

    /// Verifies id, outputs, back-references and every input signature.
    pub fn verify<A: Serialize, M: Serialize>(
        &self,
        tx: &Transaction<A, M>,
    ) -> Result<VerificationReport, CoreError> {
        let mut violations = Vec::new();

        match &tx.id {
            None => violations.push(violation("id", "transaction is not identified")),
            Some(claimed) => {
                let computed = tx.compute_id(&self.canonicalizer)?;
                if &computed != claimed {
                    violations.push(violation(
                        "id",
                        format!("claimed {claimed}, computed {computed}"),
                    ));
                }
            }
        }

        if tx.operation == Operation::Create
            && tx
                .assets
                .iter()
                .any(|asset| matches!(asset, Asset::Reference { .. }))
        {
            violations.push(violation(
                "assets",
                "CREATE must carry asset data, not a reference",
            ));
        }

        for (index, output) in tx.outputs.iter().enumerate() {
            check_output(&format!("outputs[{index}]"), output, &mut violations);
        }

        if let Err(CoreError::InputReference { index, reason }) =
            check_back_references(tx.operation, &tx.inputs)
        {
            violations.push(violation(format!("inputs[{index}]"), reason));
        }

        let base = tx.signing_base(&self.canonicalizer)?;
        for (index, input) in tx.inputs.iter().enumerate() {
            let location = format!("inputs[{index}]");
            let Some(encoded) = &input.fulfillment else {
                violations.push(violation(location, "fulfillment missing"));
                continue;
            };
            let fulfillment = match Ed25519Fulfillment::from_uri(encoded) {
                Ok(fulfillment) => fulfillment,
                Err(e) => {
                    violations.push(violation(location, e.to_string()));
                    continue;
                }
            };
            let signer = fulfillment.public_key().to_base58();
            if !input.owners_before.contains(&signer) {
                violations.push(violation(
                    &location,
                    format!("fulfillment key {signer} is not among owners_before"),
                ));
            }
            let message = signing_message(&base, input.fulfills.as_ref());
            if !fulfillment.validate(message.as_bytes()) {
                violations.push(violation(&location, "signature does not verify"));
            }
        }

        Ok(VerificationReport::from_violations(violations))
    }

    /// Verifies `tx` and that input `input_index` satisfies `spent_output`.
    pub fn verify_spend<A: Serialize, M: Serialize>(
        &self,
        tx: &Transaction<A, M>,
        input_index: usize,
        spent_output: &Output,
    ) -> Result<VerificationReport, CoreError> {
        let mut violations = self.verify(tx)?.violations;
        let location = format!("inputs[{input_index}]");

        match tx.inputs.get(input_index) {
            None => violations.push(violation(location, "no such input")),
            Some(input) => {
                if input.owners_before != spent_output.public_keys {
                    violations.push(violation(
                        &location,
                        "owners_before differ from the spent output's public_keys",
                    ));
                }
                let derived = input
                    .fulfillment
                    .as_deref()
                    .and_then(|encoded| Ed25519Fulfillment::from_uri(encoded).ok())
                    .map(|fulfillment| fulfillment.condition_uri());
                if derived.as_deref() != Some(spent_output.condition.uri.as_str()) {
                    violations.push(violation(
                        &location,
                        "fulfillment does not satisfy the spent output's condition",
                    ));
                }
            }
        }

        Ok(VerificationReport::from_violations(violations))
    }
}

fn check_output(location: &str, output: &Output, violations: &mut Vec<Violation>) {
    if let Err(e) = output.amount.validate() {
        violations.push(violation(location, e.to_string()));
    }
    let details = &output.condition.details;
    if details.kind != ED25519_SHA256_TYPE {
        violations.push(violation(
            location,
            format!("unsupported condition type {:?}", details.kind),
        ));
    }
    if output.public_keys != [details.public_key.clone()] {
        violations.push(violation(
            location,
            "public_keys must hold exactly the condition's key",
        ));
    }
    match public_key_of(&details.public_key) {
        Ok(key) if condition_uri(&key) == output.condition.uri => {}
        Ok(_) => violations.push(violation(location, "condition uri does not match its key")),
        Err(e) => violations.push(violation(location, e.to_string())),
    }
}

fn public_key_of(key: &Base58Key) -> Result<PublicKey, CoreError> {
    PublicKey::from_base58(key)
}

fn violation(location: impl Into<String>, reason: impl Into<String>) -> Violation {
    Violation {
        location: location.into(),
        reason: reason.into(),
    }
}
