//! Private key input.

use planetmint_core::{CoreError, Keypair};

/// DER prefix of an Ed25519 PKCS#8 private key; the 32-byte seed follows.
const PKCS8_ED25519_PREFIX: &str = "302e020100300506032b657004220420";

/// Parses a 64-hex-char seed or the 96-hex-char PKCS#8 DER form.
pub fn parse_private_key(input: &str) -> Result<Keypair, CoreError> {
    let input = input.trim().to_ascii_lowercase();
    let seed_hex = match input.len() {
        64 => input.as_str(),
        96 => input.strip_prefix(PKCS8_ED25519_PREFIX).ok_or_else(|| {
            CoreError::KeyFormat("PKCS#8 key is not an Ed25519 private key".into())
        })?,
        n => {
            return Err(CoreError::KeyFormat(format!(
                "private key must be 64 or 96 hex chars, got {n}"
            )))
        }
    };
    let seed = hex::decode(seed_hex)
        .map_err(|e| CoreError::KeyFormat(format!("private key is not hex: {e}")))?;
    Keypair::from_seed(&seed)
}
