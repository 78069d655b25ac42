use crate::context::ProjectContext;
use crate::error::{Result, TokenforgeError};
use crate::process::{CommandRunner, Invocation, SubprocessResult};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// `.env` content with both required secrets set.
pub(crate) const SECRETS_ENV: &str =
    "PRIVATE_KEY=0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d\n\
     POLYGON_AMOY_RPC_URL=https://rpc-amoy.polygon.technology\n";

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Scratch project whose `.env` holds `env_content`.
pub(crate) fn create_test_project(env_content: &str) -> (TempDir, ProjectContext) {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(".env"), env_content).unwrap();
    let ctx = ProjectContext::resolve_from(temp_dir.path()).unwrap();
    (temp_dir, ctx)
}

/// Deploy stdout naming `address`.
pub(crate) fn deployed_output(address: &str) -> SubprocessResult {
    SubprocessResult::exited(
        format!("Deploying MyToken...\nToken deployed to: {}\n", address),
        "",
        0,
    )
}

/// Runner that replays scripted results per stage and records every call.
///
/// Stages without a scripted result succeed with empty output.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    responses: RefCell<HashMap<String, VecDeque<std::result::Result<SubprocessResult, String>>>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue `result` for the next run of `stage`.
    pub(crate) fn respond(self, stage: &str, result: SubprocessResult) -> Self {
        self.push(stage, Ok(result));
        self
    }

    /// Make the next run of `stage` fail to start.
    pub(crate) fn refuse(self, stage: &str, message: &str) -> Self {
        self.push(stage, Err(message.to_string()));
        self
    }

    fn push(&self, stage: &str, response: std::result::Result<SubprocessResult, String>) {
        self.responses
            .borrow_mut()
            .entry(stage.to_string())
            .or_default()
            .push_back(response);
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub(crate) fn stages(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.stage.clone()).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<SubprocessResult> {
        self.calls.borrow_mut().push(invocation.clone());

        let next = self
            .responses
            .borrow_mut()
            .get_mut(&invocation.stage)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(TokenforgeError::UserError(message)),
            None => Ok(SubprocessResult::exited("", "", 0)),
        }
    }
}
