//! Keygen command implementation.

use planetmint_core::{Keypair, TransactionSigner};
use serde_json::json;

pub fn run(json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let keypair = Keypair::generate();
    let private_key = hex::encode(keypair.seed());
    let public_key = keypair.public_key().to_base58();

    if json_output {
        let value = json!({
            "private_key": private_key,
            "public_key": public_key.as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("private_key {}", private_key);
        println!("public_key  {}", public_key);
    }
    Ok(())
}
