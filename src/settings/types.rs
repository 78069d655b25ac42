//! Settings enums and default value functions.

use serde::{Deserialize, Serialize};

/// How captured stderr affects the success of a subprocess.
///
/// The Hardhat toolchain may print warnings to stderr on success, so a
/// project can relax the check to the exit status alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StderrPolicy {
    /// Any stderr text or a non-zero exit fails the step (default).
    #[default]
    Strict,
    /// Only a non-zero exit (or a timeout) fails the step.
    ExitCodeOnly,
}

impl StderrPolicy {
    /// Parse a stderr policy from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "strict" => Some(Self::Strict),
            "exit_code_only" => Some(Self::ExitCodeOnly),
            _ => None,
        }
    }
}

pub(crate) fn default_compile_command() -> String {
    "npx hardhat compile".to_string()
}
pub(crate) fn default_deploy_command() -> String {
    "npx hardhat run scripts/deploy.js".to_string()
}
pub(crate) fn default_network() -> String {
    "polygonAmoy".to_string()
}
pub(crate) fn default_network_label() -> String {
    "Polygon Amoy Testnet".to_string()
}
pub(crate) fn default_explorer_url() -> String {
    "https://www.oklink.com/amoy/address/{address}".to_string()
}
pub(crate) fn default_signing_key_var() -> String {
    "PRIVATE_KEY".to_string()
}
pub(crate) fn default_signing_key_placeholder() -> String {
    "your_wallet_private_key_here".to_string()
}
pub(crate) fn default_rpc_url_var() -> String {
    "POLYGON_AMOY_RPC_URL".to_string()
}
