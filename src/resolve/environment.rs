//! Snapshot of the process environment.

use std::collections::BTreeMap;

/// Immutable copy of environment variables taken once per run.
///
/// The pipeline never reads or mutates the live process environment after
/// the snapshot is taken, which keeps resolution deterministic under test.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `key`, treating empty or whitespace-only values as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}
