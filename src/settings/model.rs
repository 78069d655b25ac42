//! Settings struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Settings for the compile/deploy pipeline.
///
/// This struct represents the contents of `tokenforge.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // =========================================================================
    // Toolchain commands
    // =========================================================================
    /// Command that compiles the contracts (shell-words parsed; no shell).
    #[serde(default = "default_compile_command")]
    pub compile_command: String,

    /// Command that deploys the token. `--network <network>` is appended.
    #[serde(default = "default_deploy_command")]
    pub deploy_command: String,

    /// How stderr output is judged.
    #[serde(default)]
    pub stderr_policy: StderrPolicy,

    /// Kill a subprocess after this many seconds. Unset waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    // =========================================================================
    // Target chain
    // =========================================================================
    /// Network selector passed to the deploy command.
    #[serde(default = "default_network")]
    pub network: String,

    /// Human-readable network name used in reports.
    #[serde(default = "default_network_label")]
    pub network_label: String,

    /// Explorer link template; `{address}` is replaced with the contract address.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,

    // =========================================================================
    // Required secrets
    // =========================================================================
    /// Variable holding the signing credential.
    #[serde(default = "default_signing_key_var")]
    pub signing_key_var: String,

    /// Template value of the signing credential that counts as unset.
    #[serde(default = "default_signing_key_placeholder")]
    pub signing_key_placeholder: String,

    /// Variable holding the network endpoint URL.
    #[serde(default = "default_rpc_url_var")]
    pub rpc_url_var: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compile_command: default_compile_command(),
            deploy_command: default_deploy_command(),
            stderr_policy: StderrPolicy::default(),
            timeout_seconds: None,
            network: default_network(),
            network_label: default_network_label(),
            explorer_url: default_explorer_url(),
            signing_key_var: default_signing_key_var(),
            signing_key_placeholder: default_signing_key_placeholder(),
            rpc_url_var: default_rpc_url_var(),
        }
    }
}
