//! Planetmint CLI - build, sign and verify ledger transactions from the shell.

use clap::{Parser, Subcommand};

mod commands;
mod keys;
mod logging;
mod output;

use commands::{canonicalize, create, keygen, transfer, verify, BuildArgs};
use logging::LogFormat;

#[derive(Parser)]
#[command(name = "planetmint")]
#[command(about = "Planetmint transaction building, signing and verification CLI")]
struct Cli {
    /// Log format: pretty or json (logs go to stderr)
    #[arg(long, global = true, default_value = "pretty", env = "PLANETMINT_LOG_FORMAT")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new Ed25519 key pair
    Keygen {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build and sign a CREATE transaction
    Create {
        /// Private key: 64 hex chars (seed) or 96 hex chars (PKCS#8 DER)
        #[arg(long, env = "PLANETMINT_KEY", hide_env_values = true)]
        key: String,
        /// Asset data as JSON
        #[arg(long)]
        asset: String,
        /// Metadata as JSON
        #[arg(long)]
        metadata: Option<String>,
        /// Output as AMOUNT:BASE58_PUBLIC_KEY (repeatable; default: 1 to self)
        #[arg(long = "output")]
        outputs: Vec<String>,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Build and sign a TRANSFER transaction
    Transfer {
        /// Private key: 64 hex chars (seed) or 96 hex chars (PKCS#8 DER)
        #[arg(long, env = "PLANETMINT_KEY", hide_env_values = true)]
        key: String,
        /// Id of the CREATE transaction that minted the asset
        #[arg(long)]
        asset_id: String,
        /// Output to spend as TXID:INDEX (repeatable)
        #[arg(long = "input", required = true)]
        inputs: Vec<String>,
        /// Output as AMOUNT:BASE58_PUBLIC_KEY (repeatable; default: 1 to self)
        #[arg(long = "output")]
        outputs: Vec<String>,
        /// Metadata as JSON
        #[arg(long)]
        metadata: Option<String>,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Verify a signed transaction
    Verify {
        /// Transaction JSON file (or stdin if not provided)
        input: Option<String>,
        /// Exit with error code if verification fails
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging("warn", LogFormat::from_str_lossy(&cli.log_format));

    let result = match cli.command {
        Commands::Keygen { json } => keygen::run(json),
        Commands::Create {
            key,
            asset,
            metadata,
            outputs,
            build,
        } => create::run(key, asset, metadata, outputs, build),
        Commands::Transfer {
            key,
            asset_id,
            inputs,
            outputs,
            metadata,
            build,
        } => transfer::run(key, asset_id, inputs, outputs, metadata, build),
        Commands::Verify {
            input,
            strict,
            json,
        } => verify::run(input, strict, json),
        Commands::Canonicalize { input } => canonicalize::run(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
