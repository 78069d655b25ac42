//! External command execution.
//!
//! The compile and deploy steps are external commands. They run behind the
//! [`CommandRunner`] trait so the orchestrator can be driven by a scripted
//! runner in tests without spawning processes.
//!
//! - [`SystemRunner`] spawns real processes with output captured to log files
//! - [`SubprocessResult`] carries the captured text and exit status
//! - success is judged by a [`StderrPolicy`](crate::settings::StderrPolicy)

mod result;
mod system;

pub use result::{Invocation, SubprocessResult};
pub(crate) use result::truncate_output;
pub use system::SystemRunner;

use crate::error::Result;

/// Runs one external command to completion.
pub trait CommandRunner {
    /// Execute `invocation`, blocking until the process exits.
    ///
    /// Returns `Err` only when the command could not be started at all; a
    /// process that ran and failed is reported through the result.
    fn run(&self, invocation: &Invocation) -> Result<SubprocessResult>;
}
