use crate::digest::Digest;
use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Borrows the encoded form.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    TransactionId,
    "Content-derived transaction identifier: lowercase hex SHA3-256 (64 chars).",
    r"^[0-9a-f]{64}$"
);
newtype!(
    Base58Key,
    "Ed25519 public key in the Bitcoin base58 alphabet.",
    r"^[1-9A-HJ-NP-Za-km-z]{32,44}$"
);

impl TransactionId {
    /// Wraps a SHA3-256 digest.
    pub fn from_digest(digest: &Digest) -> Self {
        Self(digest.to_hex())
    }
}

impl Base58Key {
    /// Encodes 32 raw public-key bytes.
    pub fn encode(bytes: &[u8; 32]) -> Self {
        Self(bs58::encode(bytes).into_string())
    }

    /// Decodes back to the 32 raw public-key bytes.
    pub fn decode(&self) -> Result<[u8; 32], ValidationError> {
        let bytes = bs58::decode(&self.0)
            .into_vec()
            .map_err(|_| ValidationError::PatternMismatch {
                field: "Base58Key",
                value: self.0.clone(),
            })?;
        let actual = bytes.len();
        bytes
            .try_into()
            .map_err(|_| ValidationError::WrongLength {
                field: "public_key",
                expected: 32,
                actual,
            })
    }
}
