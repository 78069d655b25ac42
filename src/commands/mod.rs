//! Command implementations for tokenforge.
//!
//! Each command turns its arguments into a task payload and runs it through
//! the shared pipeline: resolve the project, load settings, snapshot the
//! environment and dispatch. Reports go to stdout; progress lines from the
//! pipeline go to stderr.

mod create;
mod task;

use crate::cli::{Cli, Command};
use crate::context::{ProjectContext, resolve_project};
use crate::error::{Result, TokenforgeError};
use crate::process::{CommandRunner, SystemRunner};
use crate::resolve::Environment;
use crate::settings::Settings;
use crate::tasks::{DispatchResponse, TaskDispatcher, TaskPayload};
use std::io::Read;
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let payload = match cli.command {
        Command::CreateToken(args) => create::payload(args),
        Command::HandleTask(args) => task::handle_payload(args)?,
        Command::ProcessTask(args) => task::process_payload(args)?,
    };

    let ctx = resolve_project(cli.project.as_deref())?;
    let mut settings = Settings::load_or_default(ctx.settings_path())?;
    if let Some(policy) = cli.stderr_policy {
        settings.stderr_policy = policy;
    }
    let environment = Environment::capture();
    let runner = SystemRunner::new(&ctx, settings.timeout());

    let output = execute(&ctx, &settings, &environment, &runner, payload)?;
    print!("{}", output);
    Ok(())
}

/// Run `payload` and return the text for stdout.
///
/// Pipeline failures become errors so the process exits with the stage's code.
pub(crate) fn execute<R: CommandRunner>(
    ctx: &ProjectContext,
    settings: &Settings,
    environment: &Environment,
    runner: &R,
    payload: TaskPayload,
) -> Result<String> {
    match TaskDispatcher::new(ctx, settings, environment, runner).dispatch(payload)? {
        DispatchResponse::Outcome(outcome) => Ok(outcome.into_result()?.render()),
        clarification => Ok(format!("{}\n", clarification.render())),
    }
}

/// Read text from `path`, or from stdin when the path is absent or `-`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|e| {
            TokenforgeError::UserError(format!("failed to read '{}': {}", path.display(), e))
        }),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(|e| {
                TokenforgeError::UserError(format!("failed to read stdin: {}", e))
            })?;
            Ok(buf)
        }
    }
}
