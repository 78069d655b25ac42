//! Exit code constants for the tokenforge CLI.
//!
//! - 0: Success (including a deployment whose address could not be recovered,
//!   and a clarification prompt)
//! - 1: User error (bad args, invalid request)
//! - 2: Required configuration or secret missing
//! - 3: Compile step failure
//! - 4: Deploy step failure
//! - 5: Lock acquisition failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable payloads, or an invalid request.
pub const USER_ERROR: i32 = 1;

/// A signing credential, network endpoint, or other required value is missing.
pub const CONFIG_MISSING: i32 = 2;

/// The external compile command failed.
pub const COMPILE_FAILURE: i32 = 3;

/// The external deploy command failed.
pub const DEPLOY_FAILURE: i32 = 4;

/// The persisted configuration lock could not be acquired.
pub const LOCK_FAILURE: i32 = 5;
