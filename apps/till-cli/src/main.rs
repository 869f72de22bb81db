//! # till
//!
//! Scans product codes and prints the basket total.
//!
//! ## Usage
//! ```text
//! till --config config/till.toml GR1 SR1 GR1 GR1 CF1
//! £22.45
//!
//! echo "GR1,GR1" | till --config config/till.toml --json
//! { "session_id": "...", "lines": [...], "formatted_total": "£3.11", ... }
//! ```
//!
//! Out-of-stock codes are reported on stderr and skipped. Configuration
//! errors and empty codes end the run with a non-zero exit status.

mod config;

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use till_core::ScanOutcome;

use crate::config::TillConfig;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "till", version, about = "Scan product codes and print the basket total")]
struct Cli {
    /// TOML file with products, pricing rules and currency symbol
    #[arg(short, long, env = "TILL_CONFIG")]
    config: Option<PathBuf>,

    /// Print the full receipt as JSON instead of the total
    #[arg(long)]
    json: bool,

    /// Product codes in scan order; read from stdin when omitted
    codes: Vec<String>,
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=till_core=trace` - Show per-line pricing
/// - Default: errors, plus info from the binary itself
///
/// Logs go to stderr so stdout carries only the total.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("error,till=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Splits scanner input on whitespace and commas.
fn parse_codes(input: &str) -> Vec<String> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = TillConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let mut checkout = config
        .checkout()
        .context("Failed to build checkout from configuration")?;

    let codes = if cli.codes.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read codes from stdin")?;
        parse_codes(&input)
    } else {
        cli.codes
    };

    for code in &codes {
        let outcome = checkout
            .scan(code)
            .with_context(|| format!("Cannot scan {:?}", code))?;
        if let ScanOutcome::OutOfStock { .. } = outcome {
            eprintln!("{}", outcome);
        }
    }

    info!(
        session = %checkout.id(),
        items = checkout.item_count(),
        total = %checkout.total(),
        "Basket priced"
    );

    let mut stdout = io::stdout().lock();
    if cli.json {
        let json = checkout.receipt().to_json().context("Failed to encode receipt")?;
        writeln!(stdout, "{}", json)?;
    } else {
        writeln!(stdout, "{}", checkout.formatted_total())?;
    }

    Ok(())
}
