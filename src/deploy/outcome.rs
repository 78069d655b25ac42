//! Deployment outcome and report rendering.

use crate::address::AddressLookup;
use crate::error::TokenforgeError;
use crate::resolve::DeploymentRequest;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// A required secret or the owner identity is absent.
    ConfigMissing,
    /// The resolved request violates a request invariant.
    InvalidRequest,
    Compile,
    Deploy,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureStage::ConfigMissing => write!(f, "config"),
            FailureStage::InvalidRequest => write!(f, "request"),
            FailureStage::Compile => write!(f, "compile"),
            FailureStage::Deploy => write!(f, "deploy"),
        }
    }
}

/// A completed deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReport {
    pub request: DeploymentRequest,
    pub address: AddressLookup,
    pub network_label: String,
    /// Explorer link, present only when the address was found.
    pub explorer_url: Option<String>,
}

impl DeploymentReport {
    pub fn render(&self) -> String {
        let mut out = String::from("Token deployment successful!\n\n");
        out.push_str("Token Details:\n");
        out.push_str(&format!("- Name: {}\n", self.request.name));
        out.push_str(&format!("- Symbol: {}\n", self.request.symbol));
        out.push_str(&format!("- Initial Supply: {}\n", self.request.initial_supply));
        out.push_str(&format!("- Contract Address: {}\n", self.address));
        out.push_str(&format!("- Owner: {}\n", self.request.owner));
        out.push_str(&format!("- Network: {}\n", self.network_label));

        match &self.explorer_url {
            Some(url) => {
                out.push_str(&format!(
                    "\nYou can view your token on the {} explorer:\n{}\n",
                    self.network_label, url
                ));
            }
            None => {
                out.push_str(
                    "\nThe contract address could not be read from the deploy output.\n\
                     Check .tokenforge/logs/deploy/stdout.log for details.\n",
                );
            }
        }

        out
    }
}

/// Result of one orchestration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentOutcome {
    Success(DeploymentReport),
    Failure { stage: FailureStage, detail: String },
}

impl DeploymentOutcome {
    pub fn failure(stage: FailureStage, detail: impl Into<String>) -> Self {
        DeploymentOutcome::Failure {
            stage,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeploymentOutcome::Success(_))
    }

    /// Human-readable report for the caller.
    pub fn render(&self) -> String {
        match self {
            DeploymentOutcome::Success(report) => report.render(),
            DeploymentOutcome::Failure { stage, detail } => {
                format!("Error: {}", stage_error(*stage, detail.clone()))
            }
        }
    }

    /// The success report, or the failure as a typed error.
    pub fn into_result(self) -> crate::error::Result<DeploymentReport> {
        match self {
            DeploymentOutcome::Success(report) => Ok(report),
            DeploymentOutcome::Failure { stage, detail } => Err(stage_error(stage, detail)),
        }
    }
}

fn stage_error(stage: FailureStage, detail: String) -> TokenforgeError {
    match stage {
        FailureStage::ConfigMissing => TokenforgeError::ConfigMissing(detail),
        FailureStage::InvalidRequest => TokenforgeError::InvalidRequest(detail),
        FailureStage::Compile => TokenforgeError::CompileFailure(detail),
        FailureStage::Deploy => TokenforgeError::DeployFailure(detail),
    }
}
