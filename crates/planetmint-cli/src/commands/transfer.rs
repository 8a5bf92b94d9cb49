//! Transfer command implementation.

use planetmint_core::{TransactionBuilder, TransactionId};
use serde_json::Value;

use super::{parse_input, parse_json, parse_output, BuildArgs};
use crate::keys::parse_private_key;
use crate::output::print_signed;

pub fn run(
    key: String,
    asset_id: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    metadata: Option<String>,
    build: BuildArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let keypair = parse_private_key(&key)?;
    let asset_id =
        TransactionId::parse(asset_id).map_err(|e| format!("Invalid asset id: {}", e))?;

    let mut builder = TransactionBuilder::<Value, Value>::with_options(build.options())
        .operation("TRANSFER")
        .add_asset_reference(asset_id);
    for raw in &inputs {
        builder = builder.spend(parse_input(raw)?);
    }
    for raw in &outputs {
        let (amount, owner) = parse_output(raw)?;
        builder = builder.add_output(amount, &[owner]);
    }
    if let Some(metadata) = metadata {
        builder = builder.add_metadata(parse_json("metadata", &metadata)?);
    }

    let signed = builder.build_and_sign(&keypair)?;
    tracing::info!(id = %signed.id(), inputs = inputs.len(), "TRANSFER signed");
    print_signed(&signed, build.wire)
}
