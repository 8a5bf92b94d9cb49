//! Verify command implementation.

use planetmint_core::{Transaction, VerificationVerdict, Verifier};
use serde_json::json;

use super::read_input;
use crate::output::format_report;

pub fn run(
    input: Option<String>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_input(input)?;
    let transaction: Transaction =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid transaction JSON: {}", e))?;

    let report = Verifier::default().verify(&transaction)?;
    let id = transaction
        .id
        .as_ref()
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|| "?".to_string());

    if json_output {
        let value = json!({
            "id": id,
            "verdict": format!("{:?}", report.verdict),
            "violations": report.violations,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", format_report(&id, &report));
    }

    if report.verdict != VerificationVerdict::Ok {
        tracing::warn!(%id, violations = report.violations.len(), "transaction failed verification");
        if strict {
            std::process::exit(1);
        }
    }

    Ok(())
}
