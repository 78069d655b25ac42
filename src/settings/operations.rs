//! Settings loading, validation, and derived values.

use super::model::Settings;
use crate::error::{Result, TokenforgeError};
use std::path::Path;
use std::time::Duration;

impl Settings {
    /// Load settings from a YAML file, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - Parsed and validated settings, or defaults
    /// * `Err(TokenforgeError::UserError)` - Read error, parse error or validation failure
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            TokenforgeError::UserError(format!(
                "failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string.
    ///
    /// Unknown fields are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Settings = serde_yaml::from_str(yaml).map_err(|e| {
            TokenforgeError::UserError(format!("failed to parse tokenforge.yaml: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings values.
    ///
    /// Validation rules:
    /// - commands, network and secret variable names must be non-empty
    /// - commands must parse as shell words
    /// - `timeout_seconds`, when set, must be positive
    pub fn validate(&self) -> Result<()> {
        for (field, command) in [
            ("compile_command", &self.compile_command),
            ("deploy_command", &self.deploy_command),
        ] {
            let words = shell_words::split(command).map_err(|e| {
                TokenforgeError::UserError(format!(
                    "settings validation failed: {} could not be parsed: {}\n\
                     Fix: check for unmatched quotes in tokenforge.yaml.",
                    field, e
                ))
            })?;
            if words.is_empty() {
                return Err(TokenforgeError::UserError(format!(
                    "settings validation failed: {} must not be empty",
                    field
                )));
            }
        }

        for (field, value) in [
            ("network", &self.network),
            ("signing_key_var", &self.signing_key_var),
            ("rpc_url_var", &self.rpc_url_var),
        ] {
            if value.trim().is_empty() {
                return Err(TokenforgeError::UserError(format!(
                    "settings validation failed: {} must not be empty",
                    field
                )));
            }
        }

        if self.timeout_seconds == Some(0) {
            return Err(TokenforgeError::UserError(
                "settings validation failed: timeout_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The deploy command line with the network selector appended.
    ///
    /// The network is quoted so it always reaches the deploy script as one
    /// argument.
    pub fn deploy_command_line(&self) -> String {
        format!(
            "{} --network {}",
            self.deploy_command.trim(),
            shell_words::quote(&self.network)
        )
    }

    /// Explorer link for a contract address.
    pub fn explorer_link(&self, address: &str) -> String {
        self.explorer_url.replace("{address}", address)
    }

    /// Subprocess timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
