//! Ed25519-SHA-256 crypto-conditions.
//!
//! A condition is the public half of a spend rule. Its URI commits to the
//! public key through a SHA-256 fingerprint, so a verifier can re-derive the
//! URI from any fulfillment that embeds the same key.

use planetmint_canonical::{base64url_encode, Base58Key, Digest};
use serde::{Deserialize, Serialize};

use crate::keys::{PublicKey, PUBLIC_KEY_LENGTH};

/// Type name of the only condition this crate builds.
pub const ED25519_SHA256_TYPE: &str = "ed25519-sha-256";

/// Registered crypto-condition type id for Ed25519-SHA-256.
pub const ED25519_SHA256_TYPE_ID: u8 = 4;

/// Fixed cost of an Ed25519-SHA-256 condition.
pub const ED25519_SHA256_COST: u64 = 131_072;

/// `details` member of an output condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDetails {
    /// Condition type name, always `ed25519-sha-256` here.
    #[serde(rename = "type")]
    pub kind: String,
    /// Base58 public key the condition commits to.
    pub public_key: Base58Key,
}

/// Spend condition attached to an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Structured description of the condition.
    pub details: ConditionDetails,
    /// `ni:` URI fingerprint derived from the details.
    pub uri: String,
}

impl Condition {
    /// Builds the single-signature Ed25519 condition for `public_key`.
    pub fn ed25519(public_key: &PublicKey) -> Self {
        Self {
            details: ConditionDetails {
                kind: ED25519_SHA256_TYPE.to_string(),
                public_key: public_key.to_base58(),
            },
            uri: condition_uri(public_key),
        }
    }
}

/// DER fingerprint contents: `SEQUENCE { [0] IMPLICIT OCTET STRING pubkey }`.
pub(crate) fn fingerprint_contents(public_key: &[u8; PUBLIC_KEY_LENGTH]) -> [u8; 36] {
    let mut der = [0u8; 36];
    der[..4].copy_from_slice(&[0x30, 0x22, 0x80, PUBLIC_KEY_LENGTH as u8]);
    der[4..].copy_from_slice(public_key);
    der
}

/// SHA-256 fingerprint of the key, as committed to by the condition URI.
pub fn fingerprint(public_key: &PublicKey) -> Digest {
    Digest::sha256(&fingerprint_contents(&public_key.to_bytes()))
}

/// `ni:///sha-256;<fingerprint>?fpt=ed25519-sha-256&cost=131072`
pub fn condition_uri(public_key: &PublicKey) -> String {
    format!(
        "ni:///sha-256;{}?fpt={}&cost={}",
        base64url_encode(fingerprint(public_key).as_bytes()),
        ED25519_SHA256_TYPE,
        ED25519_SHA256_COST
    )
}
