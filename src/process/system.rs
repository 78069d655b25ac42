//! Runner that spawns real processes.
//!
//! Output is redirected to `stdout.log`/`stderr.log` under the stage's log
//! directory and read back after the process exits, so the log files always
//! reflect the most recent run of each stage.

use super::{CommandRunner, Invocation, SubprocessResult};
use crate::context::ProjectContext;
use crate::error::{Result, TokenforgeError};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawns commands in the project root with optional timeout.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    working_dir: PathBuf,
    logs_dir: PathBuf,
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(ctx: &ProjectContext, timeout: Option<Duration>) -> Self {
        Self {
            working_dir: ctx.project_root.clone(),
            logs_dir: ctx.logs_dir.clone(),
            timeout,
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<SubprocessResult> {
        let args = shell_words::split(&invocation.command).map_err(|e| {
            TokenforgeError::UserError(format!(
                "failed to parse {} command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                invocation.stage, invocation.command, e
            ))
        })?;

        let Some((program, cmd_args)) = args.split_first() else {
            return Err(TokenforgeError::UserError(format!(
                "{} command is empty after parsing: '{}'",
                invocation.stage, invocation.command
            )));
        };

        let stage_dir = self.logs_dir.join(&invocation.stage);
        fs::create_dir_all(&stage_dir).map_err(|e| {
            TokenforgeError::UserError(format!(
                "failed to create logs directory '{}': {}",
                stage_dir.display(),
                e
            ))
        })?;

        let stdout_path = stage_dir.join("stdout.log");
        let stderr_path = stage_dir.join("stderr.log");
        let stdout_file = create_log(&stdout_path)?;
        let stderr_file = create_log(&stderr_path)?;

        let mut command = Command::new(program);
        command
            .args(cmd_args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::from(stderr_file));

        for (key, value) in &invocation.env {
            command.env(key, value);
        }

        let start_time = Instant::now();
        let mut child = command.spawn().map_err(|e| {
            TokenforgeError::UserError(format!(
                "failed to execute {} command '{}': {}\n\
                 Fix: ensure the command is installed and in PATH.",
                invocation.stage, program, e
            ))
        })?;

        let (exit_code, timed_out) = match self.timeout {
            Some(timeout) => wait_with_timeout(&mut child, timeout)?,
            None => {
                let status = child.wait().map_err(|e| {
                    TokenforgeError::UserError(format!("failed to wait for process: {}", e))
                })?;
                (status.code(), false)
            }
        };
        let duration = start_time.elapsed();

        Ok(SubprocessResult {
            stdout: read_log(&stdout_path)?,
            stderr: read_log(&stderr_path)?,
            exit_code,
            timed_out,
            duration,
        })
    }
}

fn create_log(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| {
        TokenforgeError::UserError(format!(
            "failed to create log file '{}': {}",
            path.display(),
            e
        ))
    })
}

fn read_log(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| {
        TokenforgeError::UserError(format!(
            "failed to read log file '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Wait for a child process with timeout.
///
/// Returns (exit_code, timed_out).
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code(), false)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    // SIGKILL on Unix, TerminateProcess on Windows.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok((None, true));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(TokenforgeError::UserError(format!(
                    "failed to check process status: {}",
                    e
                )));
            }
        }
    }
}
