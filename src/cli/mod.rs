//! CLI module for budgetd
//!
//! Provides the command-line interface:
//! - init: seed a fresh data file
//! - start: boot the store and serve the HTTP API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, start, Config};
pub use errors::{CliError, CliResult};
