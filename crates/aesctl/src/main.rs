//! `aesctl`: operator CLI entry point.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`config::Config`] from environment variables.
//! 3. Initialise structured JSON logging on stderr.
//! 4. Run the command and print one JSON object on stdout.

mod cli;
mod config;
mod telemetry;

use aes_facade::Aes;
use anyhow::Result;
use clap::Parser;
use common::protocol::ErrorResponse;
use tracing::{debug, error};

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let cli = cli::Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: aesctl configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    debug!(version = env!("CARGO_PKG_VERSION"), "aesctl starting");

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    let result = cli::resolve_params(&cli, &cfg)
        .and_then(|params| cli::run(&Aes::new(), &cli.command, &params, cfg.key_length));
    match result {
        Ok(outcome) => {
            println!("{}", serde_json::to_string(&outcome)?);
            Ok(())
        }
        Err(e) => {
            error!(code = e.code(), error = %e, "command failed");
            let body = ErrorResponse::new(e.code(), e.to_string());
            println!("{}", serde_json::to_string(&body)?);
            std::process::exit(1);
        }
    }
}
