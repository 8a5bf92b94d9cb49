//! Create command implementation.

use planetmint_core::{TransactionBuilder, TransactionSigner};
use serde_json::Value;

use super::{parse_json, parse_output, BuildArgs};
use crate::keys::parse_private_key;
use crate::output::print_signed;

pub fn run(
    key: String,
    asset: String,
    metadata: Option<String>,
    outputs: Vec<String>,
    build: BuildArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let keypair = parse_private_key(&key)?;

    let mut builder = TransactionBuilder::<Value, Value>::with_options(build.options())
        .operation("CREATE")
        .add_asset(parse_json("asset", &asset)?);
    if let Some(metadata) = metadata {
        builder = builder.add_metadata(parse_json("metadata", &metadata)?);
    }
    for raw in &outputs {
        let (amount, owner) = parse_output(raw)?;
        builder = builder.add_output(amount, &[owner]);
    }

    let signed = builder.build_and_sign(&keypair)?;
    tracing::info!(id = %signed.id(), owner = %keypair.public_key().to_base58(), "CREATE signed");
    print_signed(&signed, build.wire)
}
