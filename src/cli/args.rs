//! CLI argument definitions using clap
//!
//! Commands:
//! - budgetd init --config <path>
//! - budgetd start --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// budgetd - a crash-safe envelope budgeting service
#[derive(Parser, Debug)]
#[command(name = "budgetd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Seed a new data file with the default envelopes
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./budgetd.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./budgetd.json")]
        config: PathBuf,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
