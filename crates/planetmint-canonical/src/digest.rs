use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::{Digest as _, Sha3_256};

use crate::validation::ValidationError;

/// Digest algorithms used by the transaction format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlg {
    /// SHA3-256: transaction identifiers and signing messages.
    #[serde(rename = "sha3-256")]
    Sha3_256,
    /// SHA-256: crypto-condition fingerprints.
    #[serde(rename = "sha-256")]
    Sha256,
}

/// A 32-byte digest tagged with the algorithm that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest {
    alg: DigestAlg,
    bytes: [u8; 32],
}

impl Digest {
    /// SHA3-256 over `data`.
    pub fn sha3_256(data: &[u8]) -> Self {
        Self::sha3_256_parts(&[data])
    }

    /// SHA3-256 over the concatenation of `parts`, without copying them.
    pub fn sha3_256_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha3_256::new();
        for part in parts {
            hasher.update(part);
        }
        Self {
            alg: DigestAlg::Sha3_256,
            bytes: hasher.finalize().into(),
        }
    }

    /// SHA-256 over `data`.
    pub fn sha256(data: &[u8]) -> Self {
        Self {
            alg: DigestAlg::Sha256,
            bytes: Sha256::digest(data).into(),
        }
    }

    /// Algorithm that produced this digest.
    pub fn alg(&self) -> DigestAlg {
        self.alg
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

/// URL-safe base64 without padding.
pub fn base64url_encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes URL-safe base64; trailing `=` padding is tolerated.
pub fn base64url_decode(value: &str) -> Result<Vec<u8>, ValidationError> {
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|_| ValidationError::PatternMismatch {
            field: "base64url",
            value: value.to_string(),
        })
}
