//! Pipeline settings for tokenforge.
//!
//! This module defines the Settings struct that represents `tokenforge.yaml`
//! in the project root. The file is optional: every field has a default that
//! targets the Hardhat toolchain and the Polygon Amoy testnet. Unknown fields
//! are ignored for forward compatibility.

mod model;
mod operations;
pub mod types;


pub use model::Settings;
pub use types::StderrPolicy;
