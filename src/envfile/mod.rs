//! Persisted token defaults and secrets (`.env`).
//!
//! The `.env` file in the project root is shared with the external toolchain:
//! the deploy script reads `TOKEN_NAME`, `TOKEN_SYMBOL` and `INITIAL_SUPPLY`
//! from it, and it usually holds the signing key and RPC endpoint as well.
//! tokenforge reads it at the start of every resolution and writes the
//! resolved token parameters back as the new defaults.
//!
//! # Write-back rules
//!
//! - Only recognized keys are rewritten; every other line is preserved verbatim.
//! - A key already present is replaced in place (first occurrence).
//! - A missing key is appended at the end, never inserted mid-file.
//!
//! All mutations go through [`EnvTransaction`], which holds an [`EnvLock`]
//! for the whole read-modify-write and commits with an atomic replace.

mod file;
mod lock;
mod store;


pub use file::EnvFile;
pub use lock::{EnvLock, LockRecord, STALE_AFTER_MINUTES};
pub use store::{EnvStore, EnvTransaction};

/// Key holding the default token name.
pub const TOKEN_NAME_KEY: &str = "TOKEN_NAME";

/// Key holding the default token symbol.
pub const TOKEN_SYMBOL_KEY: &str = "TOKEN_SYMBOL";

/// Key holding the default initial supply.
pub const INITIAL_SUPPLY_KEY: &str = "INITIAL_SUPPLY";

/// Key holding an owner address. Read as a default, never written back.
pub const OWNER_ADDRESS_KEY: &str = "OWNER_ADDRESS";
