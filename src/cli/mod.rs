//! CLI argument parsing for tokenforge.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::settings::StderrPolicy;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// tokenforge: deploy ERC20 tokens through a Hardhat toolchain.
///
/// Token parameters are merged from arguments, the project's .env file and
/// the environment, then the contracts are compiled and deployed and the
/// contract address is read back from the deploy output.
#[derive(Parser, Debug)]
#[command(name = "tokenforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Toolchain project directory (default: current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Override the stderr policy from tokenforge.yaml (strict, exit_code_only).
    #[arg(long, global = true, value_name = "POLICY", value_parser = parse_stderr_policy)]
    pub stderr_policy: Option<StderrPolicy>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for tokenforge.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deploy a token from explicit arguments.
    ///
    /// Any field left out is taken from .env, then the environment, then the
    /// built-in defaults (MyToken, MTK, 1000000, deployer as owner).
    CreateToken(CreateTokenArgs),

    /// Deploy a token from a free-text human response.
    ///
    /// Without a response, or when name, symbol or supply cannot be read
    /// from it, prints a prompt asking for the token details.
    HandleTask(HandleTaskArgs),

    /// Deploy a token from a nested task payload (JSON).
    ///
    /// Only the first human-assistance request's response is used.
    ProcessTask(ProcessTaskArgs),
}

/// Arguments for the `create-token` command.
#[derive(Parser, Debug)]
pub struct CreateTokenArgs {
    /// Token name.
    #[arg(long)]
    pub name: Option<String>,

    /// Token symbol.
    #[arg(long)]
    pub symbol: Option<String>,

    /// Initial supply in whole tokens.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub supply: Option<u64>,

    /// Owner address (default: the deployer account).
    #[arg(long)]
    pub owner: Option<String>,
}

/// Arguments for the `handle-task` command.
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("response").args(["human_response", "human_response_file"])))]
pub struct HandleTaskArgs {
    /// Task description.
    #[arg(long, default_value = "Token creation task")]
    pub description: String,

    /// Human response text with lines such as `Token Name: Acme`.
    #[arg(long)]
    pub human_response: Option<String>,

    /// Read the human response from a file (`-` for stdin).
    #[arg(long, value_name = "PATH")]
    pub human_response_file: Option<PathBuf>,
}

/// Arguments for the `process-task` command.
#[derive(Parser, Debug)]
pub struct ProcessTaskArgs {
    /// JSON payload of the form `{"task": {...}}` (`-` or omitted for stdin).
    #[arg(long, value_name = "PATH")]
    pub payload: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

fn parse_stderr_policy(s: &str) -> Result<StderrPolicy, String> {
    StderrPolicy::from_str(s)
        .ok_or_else(|| format!("invalid stderr policy '{}' (expected strict or exit_code_only)", s))
}
