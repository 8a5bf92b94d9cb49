//! Output formatting utilities.

use planetmint_core::{SignedTransaction, VerificationReport};
use serde_json::Value;

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Prints a signed transaction as canonical wire bytes or pretty JSON.
pub fn print_signed(
    signed: &SignedTransaction,
    wire: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if wire {
        println!("{}", String::from_utf8_lossy(signed.to_wire()));
    } else {
        println!("{}", format_json(&signed.to_json()?));
    }
    Ok(())
}

/// Formats a verification report as a short table.
pub fn format_report(id: &str, report: &VerificationReport) -> String {
    let mut out = format!("{:<64} {:?}\n", truncate(id, 64), report.verdict);
    for violation in &report.violations {
        out.push_str(&format!("  {:<12} {}\n", violation.location, violation.reason));
    }
    out
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
