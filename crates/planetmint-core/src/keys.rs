//! Ed25519 key capability used by the signer.
//!
//! The signer never touches key material directly; it goes through
//! [`TransactionSigner`], so a hardware or remote signer can stand in for
//! [`Keypair`]. Key bytes are never logged.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use planetmint_canonical::Base58Key;
use rand::rngs::OsRng;

use crate::errors::CoreError;

/// Raw Ed25519 public-key length.
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// Raw Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parses 32 raw bytes; fails if the length is wrong or the bytes are
    /// not a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let raw: &[u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            CoreError::KeyFormat(format!(
                "public key must be {} bytes, got {}",
                PUBLIC_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        VerifyingKey::from_bytes(raw)
            .map(Self)
            .map_err(|_| CoreError::KeyFormat("public key is not a valid Ed25519 point".into()))
    }

    /// Parses the base58 form carried in transactions.
    pub fn from_base58(key: &Base58Key) -> Result<Self, CoreError> {
        let raw = key
            .decode()
            .map_err(|e| CoreError::KeyFormat(e.to_string()))?;
        Self::from_bytes(&raw)
    }

    /// Raw key bytes.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Base58 form used in `public_keys`, `owners_before` and condition details.
    pub fn to_base58(&self) -> Base58Key {
        Base58Key::encode(&self.0.to_bytes())
    }

    /// Checks an Ed25519 signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8; SIGNATURE_LENGTH]) -> bool {
        self.0
            .verify(message, &Signature::from_bytes(signature))
            .is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_base58().as_str()).finish()
    }
}

/// Signing capability handed to the signer.
///
/// Implementations must be safe to share: the signer only reads key
/// material, so one signer can serve many transactions on parallel tasks.
pub trait TransactionSigner: Send + Sync {
    /// Public half of the acting key.
    fn public_key(&self) -> PublicKey;

    /// Signs `message` (the 32-byte pre-image digest).
    fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], CoreError>;
}

/// An in-memory Ed25519 key pair.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generates a fresh key pair from the OS random number generator.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Builds a key pair from a 32-byte seed (the RFC 8032 private key).
    pub fn from_seed(seed: &[u8]) -> Result<Self, CoreError> {
        let seed: &[u8; 32] = seed.try_into().map_err(|_| {
            CoreError::KeyFormat(format!("private key seed must be 32 bytes, got {}", seed.len()))
        })?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(seed),
        })
    }

    /// The 32-byte seed. Handle with care.
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl TransactionSigner for Keypair {
    fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key())
    }

    fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], CoreError> {
        self.signing_key
            .try_sign(message)
            .map(|signature| signature.to_bytes())
            .map_err(|e| CoreError::Signing(e.to_string()))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
