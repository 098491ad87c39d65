//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `seo_audit` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Printing the report, or a classified error
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use seo_audit::initialization::init_logger_with;
use seo_audit::{Analyzer, Config, Entitlement};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Err(e) = config.validate() {
        eprintln!("seo_audit error: {e}");
        process::exit(1);
    }

    let analyzer = Analyzer::from_config(&config).context("Failed to initialize analyzer")?;

    match analyzer
        .analyze(&config.url, &Entitlement::new(config.plan))
        .await
    {
        Ok(report) => {
            let json = report
                .to_json(config.pretty)
                .context("Failed to serialize report")?;
            println!("{json}");
            Ok(())
        }
        Err(e) => {
            eprintln!("seo_audit error [{}]: {}", e.kind(), e);
            process::exit(1);
        }
    }
}
