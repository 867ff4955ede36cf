//! Pagewright CLI Binary
//!
//! Command-line interface for the Pagewright layout quality gate.

use anyhow::{anyhow, Context};
use clap::Parser;
use pagewright::cli::{map_error, Cli, RunContext};
use pagewright::config::ConfigLoader;
use pagewright::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    if let Err(e) = run() {
        error!("Command failed: {:#}", e);
        eprintln!("{:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    init_logging(Some(&logging_config)).context("Failed to initialize logging")?;

    info!(command = cli.command.name(), "Pagewright CLI starting");

    let context = RunContext::new(cli.workspace.clone(), cli.config.clone())
        .map_err(|e| anyhow!(map_error(&e)))?;
    let output = context
        .execute(&cli.command)
        .map_err(|e| anyhow!(map_error(&e)))?;

    info!("Command completed successfully");
    println!("{}", output);
    Ok(())
}

/// Logging configuration from the config file, then CLI flags.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(&cli.workspace),
    };
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if config.output == "file" && config.file.is_relative() {
        config.file = cli.workspace.join(&config.file);
    }
    config
}
