use std::fmt;
use std::str::FromStr;

use planetmint_canonical::{
    reject_floats, Amount, Base58Key, CanonicalizationError, Canonicalizer, Digest, TransactionId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::condition::Condition;
use crate::errors::CoreError;

/// Transaction operation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Originates a new asset.
    Create,
    /// Moves ownership of existing outputs.
    Transfer,
}

impl Operation {
    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Transfer => "TRANSFER",
        }
    }
}

impl FromStr for Operation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(Operation::Create),
            "TRANSFER" => Ok(Operation::Transfer),
            other => Err(CoreError::InvalidOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset entry: caller data for CREATE, or the id of the asset a TRANSFER moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asset<A> {
    /// Inline asset body.
    Data {
        /// Caller-supplied body.
        data: A,
    },
    /// Reference to the CREATE transaction that minted the asset.
    Reference {
        /// Id of that transaction.
        id: TransactionId,
    },
}

/// Opaque caller metadata. Serialized as the bare value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaData<M> {
    /// Caller-supplied value.
    pub value: M,
}

/// Pointer from an input to the output it spends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fulfills {
    /// Transaction holding the spent output.
    pub transaction_id: TransactionId,
    /// Position of the spent output in that transaction.
    pub output_index: u32,
}

impl Fulfills {
    /// Points at output `output_index` of `transaction_id`.
    pub fn new(transaction_id: TransactionId, output_index: u32) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }
}

/// A spendable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Amount in the smallest unit, as a decimal string.
    pub amount: Amount,
    /// Spend condition.
    pub condition: Condition,
    /// Owners; a single key for the outputs this crate builds.
    pub public_keys: Vec<Base58Key>,
}

/// An input; `fulfillment` and `fulfills` always serialize, as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Base64url fulfillment, written by the signer.
    pub fulfillment: Option<String>,
    /// Spent output; absent for a CREATE input.
    pub fulfills: Option<Fulfills>,
    /// Keys that owned the spent output.
    pub owners_before: Vec<Base58Key>,
}

/// A ledger transaction.
///
/// `id` and `metadata` always serialize (as `null` when absent). Array order
/// in `assets`, `outputs` and `inputs` is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction<A = Value, M = Value> {
    /// SHA3-256 content hash; present only once signed.
    pub id: Option<TransactionId>,
    /// Operation tag.
    pub operation: Operation,
    /// Transaction model version.
    pub version: String,
    /// Assets carried by the transaction.
    pub assets: Vec<Asset<A>>,
    /// Outputs, by position.
    pub outputs: Vec<Output>,
    /// Inputs, in signing order.
    pub inputs: Vec<Input>,
    /// Optional caller metadata.
    pub metadata: Option<MetaData<M>>,
}

impl<A: Serialize, M: Serialize> Transaction<A, M> {
    /// JSON value of the transaction; floats anywhere are an error.
    pub fn to_json(&self) -> Result<Value, CoreError> {
        reject_floats(self)?;
        serde_json::to_value(self)
            .map_err(|e| CoreError::Encoding(CanonicalizationError::Serialization(e.to_string())))
    }

    /// Canonical bytes with `id` null and every fulfillment null: the base
    /// payload every input signs.
    pub fn signing_base(&self, canonicalizer: &Canonicalizer) -> Result<Vec<u8>, CoreError> {
        self.hash_form(canonicalizer, true)
    }

    /// Canonical bytes with `id` null, fulfillments kept: the id pre-image.
    pub fn id_payload(&self, canonicalizer: &Canonicalizer) -> Result<Vec<u8>, CoreError> {
        self.hash_form(canonicalizer, false)
    }

    /// Recomputes the content-derived id.
    pub fn compute_id(&self, canonicalizer: &Canonicalizer) -> Result<TransactionId, CoreError> {
        let payload = self.id_payload(canonicalizer)?;
        Ok(TransactionId::from_digest(&Digest::sha3_256(&payload)))
    }

    fn hash_form(
        &self,
        canonicalizer: &Canonicalizer,
        strip_fulfillments: bool,
    ) -> Result<Vec<u8>, CoreError> {
        let mut value = self.to_json()?;

        // The id never hashes itself
        if let Value::Object(map) = &mut value {
            map.insert("id".to_string(), Value::Null);
            if strip_fulfillments {
                if let Some(Value::Array(inputs)) = map.get_mut("inputs") {
                    for input in inputs.iter_mut() {
                        if let Value::Object(input) = input {
                            input.insert("fulfillment".to_string(), Value::Null);
                        }
                    }
                }
            }
        }

        Ok(canonicalizer.canonicalize(&value)?)
    }
}
