//! Deployment request resolution.
//!
//! A deployment request is assembled field by field from four tiers, highest
//! precedence first:
//!
//! 1. explicit call arguments
//! 2. the persisted `.env` file
//! 3. the process environment
//! 4. hardcoded fallbacks (`MyToken`, `MTK`, `1000000`, the deployer account)
//!
//! Each field is resolved independently, so a caller may pass only a symbol
//! and inherit everything else. The resolved name, symbol and supply are
//! written back to `.env` as the defaults for the next run.

mod environment;
mod request;
mod resolver;


pub use environment::Environment;
pub use request::{
    DEFAULT_INITIAL_SUPPLY, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL, DeploymentRequest, Owner,
    RequestFields, is_valid_address,
};
pub use resolver::{ConfigResolver, resolve};
