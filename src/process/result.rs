//! Invocation and result types shared by all runners.

use crate::settings::StderrPolicy;
use std::time::Duration;

/// Maximum number of trailing output lines kept in failure details.
pub const DETAIL_MAX_LINES: usize = 50;

/// Maximum characters kept in failure details.
pub const DETAIL_MAX_CHARS: usize = 4096;

/// One external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Stage name (`compile`, `deploy`); also names the log directory.
    pub stage: String,
    /// Command line, split with shell-words rules.
    pub command: String,
    /// Extra environment variables for the child.
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(stage: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            command: command.into(),
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }
}

/// Captured outcome of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubprocessResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit code (None if killed or terminated by a signal).
    pub exit_code: Option<i32>,
    /// Whether the process was killed at the timeout.
    pub timed_out: bool,
    pub duration: Duration,
}

impl SubprocessResult {
    /// A finished process.
    pub fn exited(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
            timed_out: false,
            duration: Duration::ZERO,
        }
    }

    /// Whether the step failed under `policy`.
    pub fn failed(&self, policy: StderrPolicy) -> bool {
        if self.timed_out || self.exit_code != Some(0) {
            return true;
        }
        match policy {
            StderrPolicy::Strict => !self.stderr.is_empty(),
            StderrPolicy::ExitCodeOnly => false,
        }
    }

    /// Failure text for reports: the raw stderr when there is any, otherwise
    /// the exit status and the tail of stdout.
    pub fn failure_detail(&self) -> String {
        if !self.stderr.trim().is_empty() {
            return self.stderr.trim_end().to_string();
        }

        let status = if self.timed_out {
            format!("timed out after {}s", self.duration.as_secs())
        } else {
            match self.exit_code {
                Some(code) => format!("exited with code {}", code),
                None => "terminated by signal".to_string(),
            }
        };

        let tail = truncate_output(&self.stdout, DETAIL_MAX_LINES, DETAIL_MAX_CHARS);
        if tail.is_empty() {
            status
        } else {
            format!("{}\nOutput (truncated):\n{}", status, tail)
        }
    }
}

/// Keep the last `max_lines` lines, capped at `max_chars` characters.
pub(crate) fn truncate_output(output: &str, max_lines: usize, max_chars: usize) -> String {
    let lines: Vec<&str> = output.trim_end().lines().collect();

    let relevant_lines: &[&str] = if lines.len() > max_lines {
        &lines[lines.len() - max_lines..]
    } else {
        &lines
    };

    let result = relevant_lines.join("\n");
    let char_count = result.chars().count();
    if char_count > max_chars {
        let tail: String = result.chars().skip(char_count - max_chars).collect();
        return format!("...(truncated)...\n{}", tail);
    }

    result
}
