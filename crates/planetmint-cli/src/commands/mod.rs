//! Subcommand implementations and the argument parsing they share.

pub mod canonicalize;
pub mod create;
pub mod keygen;
pub mod transfer;
pub mod verify;

use std::io::{self, Read};

use clap::Args;
use planetmint_core::{BuildOptions, Fulfills, PublicKey, TransactionId, DEFAULT_VERSION};
use planetmint_canonical::Base58Key;
use serde_json::Value;

/// Options shared by `create` and `transfer`.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Transaction model version
    #[arg(long, env = "PLANETMINT_TX_VERSION", default_value = DEFAULT_VERSION)]
    pub tx_version: String,
    /// Skip back-reference checks on inputs (the result is unchecked)
    #[arg(long)]
    pub unchecked: bool,
    /// Print canonical wire bytes instead of pretty JSON
    #[arg(long)]
    pub wire: bool,
}

impl BuildArgs {
    pub fn options(&self) -> BuildOptions {
        BuildOptions {
            version: self.tx_version.clone(),
            enforce_back_references: !self.unchecked,
        }
    }
}

/// Malformed command-line values.
#[derive(thiserror::Error, Debug)]
pub enum ArgError {
    #[error("invalid JSON for {what}: {reason}")]
    Json { what: &'static str, reason: String },
    #[error("invalid output {0:?}: expected AMOUNT:BASE58_PUBLIC_KEY")]
    Output(String),
    #[error("invalid input {0:?}: expected TXID:INDEX")]
    Input(String),
}

pub fn parse_json(what: &'static str, raw: &str) -> Result<Value, ArgError> {
    serde_json::from_str(raw).map_err(|e| ArgError::Json {
        what,
        reason: e.to_string(),
    })
}

/// `AMOUNT:BASE58_PUBLIC_KEY`. The amount itself is checked when the
/// transaction is built.
pub fn parse_output(raw: &str) -> Result<(String, PublicKey), Box<dyn std::error::Error>> {
    let (amount, key) = raw
        .split_once(':')
        .ok_or_else(|| ArgError::Output(raw.to_string()))?;
    let key = Base58Key::parse(key).map_err(|_| ArgError::Output(raw.to_string()))?;
    Ok((amount.to_string(), PublicKey::from_base58(&key)?))
}

/// `TXID:INDEX`.
pub fn parse_input(raw: &str) -> Result<Fulfills, ArgError> {
    let invalid = || ArgError::Input(raw.to_string());
    let (txid, index) = raw.split_once(':').ok_or_else(invalid)?;
    let txid = TransactionId::parse(txid).map_err(|_| invalid())?;
    let index: u32 = index.parse().map_err(|_| invalid())?;
    Ok(Fulfills::new(txid, index))
}

/// Reads a file, or stdin when no path is given.
pub fn read_input(input: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    match input {
        Some(path) => Ok(std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
