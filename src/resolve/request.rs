//! Deployment request types.

use crate::envfile::{
    EnvFile, INITIAL_SUPPLY_KEY, OWNER_ADDRESS_KEY, TOKEN_NAME_KEY, TOKEN_SYMBOL_KEY,
};
use crate::error::{Result, TokenforgeError};
use crate::resolve::Environment;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Fallback token name.
pub const DEFAULT_TOKEN_NAME: &str = "MyToken";

/// Fallback token symbol.
pub const DEFAULT_TOKEN_SYMBOL: &str = "MTK";

/// Fallback initial supply.
pub const DEFAULT_INITIAL_SUPPLY: u64 = 1_000_000;

static ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("Invalid address regex"));

/// Whether `s` is a 20-byte hex account address with a `0x` prefix.
pub fn is_valid_address(s: &str) -> bool {
    ADDRESS_REGEX.is_match(s)
}

/// Partial deployment parameters contributed by one resolution tier.
///
/// Empty strings and a zero supply count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFields {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub initial_supply: Option<u64>,
    pub owner_address: Option<String>,
}

impl RequestFields {
    /// Drop empty values so they fall through to lower tiers.
    pub fn normalized(self) -> Self {
        Self {
            name: non_empty(self.name),
            symbol: non_empty(self.symbol),
            initial_supply: self.initial_supply.filter(|s| *s > 0),
            owner_address: non_empty(self.owner_address),
        }
    }

    /// Fields stored in the persisted `.env` file.
    pub fn from_env_file(file: &EnvFile) -> Self {
        Self::from_lookup(|key| file.get(key))
    }

    /// Fields taken from the process environment.
    pub fn from_environment(env: &Environment) -> Self {
        Self::from_lookup(|key| env.get(key))
    }

    fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        Self {
            name: lookup(TOKEN_NAME_KEY).map(str::to_string),
            symbol: lookup(TOKEN_SYMBOL_KEY).map(str::to_string),
            initial_supply: lookup(INITIAL_SUPPLY_KEY).and_then(parse_supply_value),
            owner_address: lookup(OWNER_ADDRESS_KEY).map(str::to_string),
        }
        .normalized()
    }
}

/// Parse a stored supply value; anything but a positive integer is absent.
fn parse_supply_value(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|s| *s > 0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Who receives ownership of the deployed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    /// An explicit account address.
    Address(String),
    /// The account that signs the deployment.
    Deployer,
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::Address(address) => write!(f, "{}", address),
            Owner::Deployer => write!(f, "deployer account"),
        }
    }
}

/// Fully resolved parameters for one token deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub name: String,
    pub symbol: String,
    pub initial_supply: u64,
    pub owner: Owner,
}

impl DeploymentRequest {
    /// Check the request invariants.
    ///
    /// - name and symbol are non-empty single-line values
    /// - initial supply is strictly positive
    /// - an explicit owner is a `0x` + 40 hex digit address
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("name", &self.name), ("symbol", &self.symbol)] {
            if value.trim().is_empty() {
                return Err(TokenforgeError::InvalidRequest(format!(
                    "token {} must not be empty",
                    field
                )));
            }
            if value.contains(['\n', '\r']) {
                return Err(TokenforgeError::InvalidRequest(format!(
                    "token {} must be a single line",
                    field
                )));
            }
        }

        if self.initial_supply == 0 {
            return Err(TokenforgeError::InvalidRequest(
                "initial supply must be greater than 0".to_string(),
            ));
        }

        if let Owner::Address(address) = &self.owner
            && !is_valid_address(address)
        {
            return Err(TokenforgeError::InvalidRequest(format!(
                "owner address '{}' is not a valid address (expected 0x followed by 40 hex digits)",
                address
            )));
        }

        Ok(())
    }

    /// Environment handed to the toolchain so it sees the resolved values.
    pub fn toolchain_env(&self) -> Vec<(String, String)> {
        let mut env = vec![
            (TOKEN_NAME_KEY.to_string(), self.name.clone()),
            (TOKEN_SYMBOL_KEY.to_string(), self.symbol.clone()),
            (INITIAL_SUPPLY_KEY.to_string(), self.initial_supply.to_string()),
        ];
        if let Owner::Address(address) = &self.owner {
            env.push((OWNER_ADDRESS_KEY.to_string(), address.clone()));
        }
        env
    }
}
