//! CLI module for Backdrop.
//!
//! Every command builds the engine from the loaded configuration, runs once
//! and exits. The hidden loop command is the only long-running mode.

mod commands;
mod output;

use clap::Parser;
pub use commands::{Cli, engine};

use crate::error::BackdropError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), BackdropError> {
    let cli = Cli::parse();
    cli.execute()
}
