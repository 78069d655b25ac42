//! Contract address recovery from deploy output.

use regex::Regex;
use std::sync::LazyLock;

static DEPLOYED_TO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Token deployed to:\s+(0x[0-9a-fA-F]{40})\b").expect("Invalid deployed-to regex")
});

/// Marker shown in reports when the deploy output names no address.
pub const ADDRESS_NOT_FOUND: &str = "Address not found in output";

/// Result of scanning deploy output for the contract address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressLookup {
    Found(String),
    NotFound,
}

impl AddressLookup {
    pub fn address(&self) -> Option<&str> {
        match self {
            AddressLookup::Found(address) => Some(address),
            AddressLookup::NotFound => None,
        }
    }
}

impl std::fmt::Display for AddressLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressLookup::Found(address) => write!(f, "{}", address),
            AddressLookup::NotFound => write!(f, "{}", ADDRESS_NOT_FOUND),
        }
    }
}

/// Find the first `Token deployed to: 0x...` line in `stdout`.
pub fn extract_address(stdout: &str) -> AddressLookup {
    DEPLOYED_TO_REGEX
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| AddressLookup::Found(m.as_str().to_string()))
        .unwrap_or(AddressLookup::NotFound)
}
