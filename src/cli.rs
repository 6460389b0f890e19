//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Journal Unify - merge journal metadata from multiple sources
#[derive(Parser, Debug)]
#[command(name = "journal-unify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Unify source records into canonical journal records
    Unify(commands::unify::UnifyArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp_secs()
            .try_init()
            .ok();

        match self.command {
            Commands::Unify(args) => commands::unify::execute(args),
        }
    }
}
