//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `chain_auditor` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use chain_auditor::config::Opt;
use chain_auditor::initialization::init_logger_with;
use chain_auditor::run_audit;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = match Opt::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("chain_auditor error: {e}");
            process::exit(2);
        }
    };

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_audit(config).await {
        Ok(report) => {
            println!("{}", report.tally);
            println!(
                "Audited {} hostname{} in {:.1}s - findings saved in {}",
                report.tally.processed,
                if report.tally.processed == 1 { "" } else { "s" },
                report.elapsed_seconds,
                report.output_path.display()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("chain_auditor error: {:#}", e);
            process::exit(1);
        }
    }
}
