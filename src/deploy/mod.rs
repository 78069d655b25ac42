//! Token deployment orchestration.
//!
//! One deployment runs these steps in order, stopping at the first failure:
//!
//! 1. check that the signing key and RPC endpoint are configured
//! 2. resolve the request and write the new defaults back to `.env`
//! 3. run the compile command
//! 4. run the deploy command with `--network <network>`
//! 5. read the contract address from the deploy output
//!
//! A missing address is not a failure; the report says so instead.

mod orchestrator;
mod outcome;

#[cfg(test)]
mod tests;

pub use orchestrator::DeploymentOrchestrator;
pub use outcome::{DeploymentOutcome, DeploymentReport, FailureStage};
