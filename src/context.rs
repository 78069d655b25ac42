//! Project context resolution for tokenforge.
//!
//! Every path the tool touches (the persisted `.env` file, the optional
//! `tokenforge.yaml` settings, lock files, subprocess logs and the event log)
//! is derived from a single project root. Commands resolve the context once
//! and pass it down, so no module builds paths on its own.

use crate::error::{Result, TokenforgeError};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the persisted configuration file in the project root.
pub const ENV_FILE_NAME: &str = ".env";

/// Name of the optional settings file in the project root.
pub const SETTINGS_FILE_NAME: &str = "tokenforge.yaml";

/// Name of the state directory holding locks, logs and events.
pub const STATE_DIR_NAME: &str = ".tokenforge";

/// Resolved paths for a tokenforge project.
///
/// All paths are absolute.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Absolute path to the toolchain project (where the commands run).
    pub project_root: PathBuf,

    /// Absolute path to the state directory (default: `{project_root}/.tokenforge/`).
    pub state_dir: PathBuf,

    /// Absolute path to the locks directory (default: `{state_dir}/locks/`).
    pub locks_dir: PathBuf,

    /// Absolute path to the subprocess logs directory (default: `{state_dir}/logs/`).
    pub logs_dir: PathBuf,
}

impl ProjectContext {
    /// Resolve the project context from the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            TokenforgeError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd)
    }

    /// Resolve the project context rooted at a specific directory.
    ///
    /// # Returns
    ///
    /// * `Ok(ProjectContext)` - Successfully resolved context
    /// * `Err(TokenforgeError::UserError)` - The directory does not exist
    pub fn resolve_from<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        if !dir.is_dir() {
            return Err(TokenforgeError::UserError(format!(
                "project directory '{}' does not exist or is not a directory",
                dir.display()
            )));
        }

        let project_root = dir.canonicalize().map_err(|e| {
            TokenforgeError::UserError(format!(
                "failed to resolve project directory '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let state_dir = project_root.join(STATE_DIR_NAME);
        let locks_dir = state_dir.join("locks");
        let logs_dir = state_dir.join("logs");

        Ok(Self {
            project_root,
            state_dir,
            locks_dir,
            logs_dir,
        })
    }

    /// Get the path to the persisted configuration (`.env`) file.
    pub fn env_file_path(&self) -> PathBuf {
        self.project_root.join(ENV_FILE_NAME)
    }

    /// Get the path to the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.project_root.join(SETTINGS_FILE_NAME)
    }

    /// Get the path to the lock guarding `.env` transactions.
    pub fn env_lock_path(&self) -> PathBuf {
        self.locks_dir.join("env.lock")
    }

    /// Get the log directory for one pipeline stage (e.g. `compile`).
    pub fn stage_logs_dir(&self, stage: &str) -> PathBuf {
        self.logs_dir.join(stage)
    }

    /// Get the path to the events directory.
    pub fn events_dir(&self) -> PathBuf {
        self.state_dir.join("events")
    }

    /// Get the path to the main events log file.
    pub fn events_file(&self) -> PathBuf {
        self.events_dir().join("events.ndjson")
    }
}

/// Resolve the context from an explicit `--project` directory, or the
/// current working directory when none was given.
pub fn resolve_project(project: Option<&Path>) -> Result<ProjectContext> {
    match project {
        Some(dir) => ProjectContext::resolve_from(dir),
        None => ProjectContext::resolve(),
    }
}
