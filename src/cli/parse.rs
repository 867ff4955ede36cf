//! CLI parse: clap types for Pagewright. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pagewright CLI - deterministic layout quality gate
#[derive(Parser)]
#[command(name = "pagewright")]
#[command(about = "Validate, score, repair and gate generated page layouts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate and score one layout file or every *.json under a directory
    Check {
        path: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Run the fix pipeline on a layout and report what changed
    Fix {
        file: PathBuf,
        /// Seed for generated section ids
        #[arg(long, default_value = "0")]
        seed: u64,
        /// Write the fixed layout here
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Drive the retry controller; each file is replayed as one attempt
    Run {
        files: Vec<PathBuf>,
        /// Seed for generated section ids
        #[arg(long, default_value = "0")]
        seed: u64,
        /// Request candidates from the configured HTTP source instead of files
        #[arg(long)]
        remote: bool,
        /// JSON brief forwarded to the candidate source
        #[arg(long)]
        brief: Option<String>,
        /// Write the selected layout here
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}

impl Commands {
    /// Stable command name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Check { .. } => "check",
            Commands::Fix { .. } => "fix",
            Commands::Run { .. } => "run",
            Commands::Config {
                command: ConfigCommands::Show,
            } => "config.show",
        }
    }
}
