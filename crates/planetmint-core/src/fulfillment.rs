//! Ed25519-SHA-256 fulfillments.
//!
//! Binary layout (DER, 102 bytes):
//!
//! ```text
//! A4 64                 [4] constructed, length 100
//!    80 20 <pubkey>     [0] public key, 32 bytes
//!    81 40 <signature>  [1] signature, 64 bytes
//! ```
//!
//! The textual form stored in `input.fulfillment` is URL-safe base64 with
//! no padding.

use planetmint_canonical::{base64url_decode, base64url_encode};

use crate::condition::{condition_uri, ED25519_SHA256_TYPE_ID};
use crate::errors::CoreError;
use crate::keys::{PublicKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

const CONSTRUCTED_CONTEXT_TAG: u8 = 0xA0;
const PUBLIC_KEY_TAG: u8 = 0x80;
const SIGNATURE_TAG: u8 = 0x81;
const BODY_LENGTH: usize = 2 + PUBLIC_KEY_LENGTH + 2 + SIGNATURE_LENGTH;

/// Encoded fulfillment length in bytes.
pub const FULFILLMENT_LENGTH: usize = 2 + BODY_LENGTH;

/// A public key plus the signature that satisfies its condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Fulfillment {
    public_key: PublicKey,
    signature: [u8; SIGNATURE_LENGTH],
}

impl Ed25519Fulfillment {
    /// Pairs a public key with a signature.
    pub fn new(public_key: PublicKey, signature: [u8; SIGNATURE_LENGTH]) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    /// Builds from raw slices, checking both lengths.
    pub fn from_parts(public_key: &[u8], signature: &[u8]) -> Result<Self, CoreError> {
        let public_key = PublicKey::from_bytes(public_key)?;
        let signature: [u8; SIGNATURE_LENGTH] = signature.try_into().map_err(|_| {
            CoreError::Signing(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LENGTH,
                signature.len()
            ))
        })?;
        Ok(Self::new(public_key, signature))
    }

    /// Embedded public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Embedded signature.
    pub fn signature(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.signature
    }

    /// DER encoding.
    pub fn encode(&self) -> [u8; FULFILLMENT_LENGTH] {
        let mut out = [0u8; FULFILLMENT_LENGTH];
        out[0] = CONSTRUCTED_CONTEXT_TAG | ED25519_SHA256_TYPE_ID;
        out[1] = BODY_LENGTH as u8;
        out[2] = PUBLIC_KEY_TAG;
        out[3] = PUBLIC_KEY_LENGTH as u8;
        out[4..4 + PUBLIC_KEY_LENGTH].copy_from_slice(&self.public_key.to_bytes());
        let sig_at = 4 + PUBLIC_KEY_LENGTH;
        out[sig_at] = SIGNATURE_TAG;
        out[sig_at + 1] = SIGNATURE_LENGTH as u8;
        out[sig_at + 2..].copy_from_slice(&self.signature);
        out
    }

    /// Textual form written into `input.fulfillment`.
    pub fn to_uri(&self) -> String {
        base64url_encode(&self.encode())
    }

    /// Parses the DER encoding. Anything but the exact layout is rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let malformed = |what: &str| CoreError::Signing(format!("malformed fulfillment: {what}"));

        if bytes.len() != FULFILLMENT_LENGTH {
            return Err(malformed("unexpected length"));
        }
        if bytes[0] != CONSTRUCTED_CONTEXT_TAG | ED25519_SHA256_TYPE_ID
            || usize::from(bytes[1]) != BODY_LENGTH
        {
            return Err(malformed("not an ed25519-sha-256 fulfillment"));
        }
        if bytes[2] != PUBLIC_KEY_TAG {
            return Err(malformed("missing public key"));
        }
        if usize::from(bytes[3]) != PUBLIC_KEY_LENGTH {
            return Err(CoreError::KeyFormat(format!(
                "public key must be {} bytes, got {}",
                PUBLIC_KEY_LENGTH, bytes[3]
            )));
        }
        let sig_at = 4 + PUBLIC_KEY_LENGTH;
        if bytes[sig_at] != SIGNATURE_TAG || usize::from(bytes[sig_at + 1]) != SIGNATURE_LENGTH {
            return Err(malformed("missing signature"));
        }
        Self::from_parts(&bytes[4..sig_at], &bytes[sig_at + 2..])
    }

    /// Parses the textual form found in `input.fulfillment`.
    pub fn from_uri(uri: &str) -> Result<Self, CoreError> {
        let bytes = base64url_decode(uri).map_err(|e| CoreError::Signing(e.to_string()))?;
        Self::decode(&bytes)
    }

    /// URI of the condition this fulfillment satisfies.
    pub fn condition_uri(&self) -> String {
        condition_uri(&self.public_key)
    }

    /// Checks the signature over `message` with the embedded key.
    pub fn validate(&self, message: &[u8]) -> bool {
        self.public_key.verify(message, &self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::keys::{Keypair, TransactionSigner};

    #[test]
    fn encoding_has_fixed_layout() {
        let keypair = Keypair::generate();
        let signature = keypair.sign(b"message").unwrap();
        let encoded = Ed25519Fulfillment::new(keypair.public_key(), signature).encode();
        assert_eq!(encoded.len(), 102);
        assert_eq!(&encoded[..4], &[0xA4, 0x64, 0x80, 0x20]);
        assert_eq!(&encoded[36..38], &[0x81, 0x40]);
        assert_eq!(&encoded[38..], &signature);
    }

    #[test]
    fn uri_parses_back_and_matches_condition() {
        let keypair = Keypair::generate();
        let signature = keypair.sign(b"message").unwrap();
        let fulfillment = Ed25519Fulfillment::new(keypair.public_key(), signature);
        let uri = fulfillment.to_uri();
        assert_eq!(uri.len(), 136);
        assert!(!uri.contains('='));

        let parsed = Ed25519Fulfillment::from_uri(&uri).unwrap();
        assert_eq!(parsed, fulfillment);
        assert!(parsed.validate(b"message"));
        assert_eq!(
            parsed.condition_uri(),
            Condition::ed25519(&keypair.public_key()).uri
        );
    }

    #[test]
    fn wrong_signature_length_fails() {
        let keypair = Keypair::generate();
        let err =
            Ed25519Fulfillment::from_parts(&keypair.public_key().to_bytes(), &[0u8; 63]).unwrap_err();
        assert!(matches!(err, CoreError::Signing(_)));
        let err = Ed25519Fulfillment::from_parts(&[0u8; 31], &[0u8; 64]).unwrap_err();
        assert!(matches!(err, CoreError::KeyFormat(_)));
    }

    #[test]
    fn truncated_or_retagged_bytes_are_rejected() {
        let keypair = Keypair::generate();
        let signature = keypair.sign(b"m").unwrap();
        let mut bytes = Ed25519Fulfillment::new(keypair.public_key(), signature)
            .encode()
            .to_vec();
        assert!(Ed25519Fulfillment::decode(&bytes[..101]).is_err());
        bytes[0] = 0xA0;
        assert!(Ed25519Fulfillment::decode(&bytes).is_err());
    }
}
