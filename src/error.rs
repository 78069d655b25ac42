//! Error types for the tokenforge CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for tokenforge operations.
///
/// Each variant maps to a specific process exit code.
#[derive(Error, Debug)]
pub enum TokenforgeError {
    /// User provided invalid arguments or the project is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// A required secret or configuration value is absent.
    #[error("{0}")]
    ConfigMissing(String),

    /// The resolved request violates a deployment invariant.
    #[error("invalid deployment request: {0}")]
    InvalidRequest(String),

    /// The external compile command reported an error.
    #[error("compiling contracts failed: {0}")]
    CompileFailure(String),

    /// The external deploy command reported an error.
    #[error("deploying token failed: {0}")]
    DeployFailure(String),

    /// The persisted configuration lock could not be acquired.
    #[error("Lock acquisition failed: {0}")]
    LockError(String),
}

impl TokenforgeError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            TokenforgeError::UserError(_) => exit_codes::USER_ERROR,
            TokenforgeError::ConfigMissing(_) => exit_codes::CONFIG_MISSING,
            TokenforgeError::InvalidRequest(_) => exit_codes::USER_ERROR,
            TokenforgeError::CompileFailure(_) => exit_codes::COMPILE_FAILURE,
            TokenforgeError::DeployFailure(_) => exit_codes::DEPLOY_FAILURE,
            TokenforgeError::LockError(_) => exit_codes::LOCK_FAILURE,
        }
    }
}

/// Result type alias for tokenforge operations.
pub type Result<T> = std::result::Result<T, TokenforgeError>;
