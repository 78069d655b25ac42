//! tokenforge: token deployment pipeline for agent tasks.
//!
//! This is the main entry point for the `tokenforge` CLI. It parses
//! arguments, dispatches to the appropriate command handler, and handles
//! errors with proper exit codes.

mod cli;
mod commands;
pub mod address;
pub mod context;
pub mod deploy;
pub mod envfile;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod extract;
pub mod fs;
pub mod process;
pub mod resolve;
pub mod settings;
pub mod tasks;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
