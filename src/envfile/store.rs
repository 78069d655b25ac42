//! Transactional access to the project's `.env` file.

use super::file::EnvFile;
use super::lock::EnvLock;
use crate::context::ProjectContext;
use crate::error::{Result, TokenforgeError};
use crate::fs::atomic_write_file;
use std::path::{Path, PathBuf};

/// Handle to the persisted configuration file of one project.
#[derive(Debug, Clone)]
pub struct EnvStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl EnvStore {
    /// Store backed by the project's `.env` file.
    pub fn for_project(ctx: &ProjectContext) -> Self {
        Self {
            path: ctx.env_file_path(),
            lock_path: ctx.env_lock_path(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current content without taking the lock.
    ///
    /// A missing file reads as an empty document.
    pub fn snapshot(&self) -> Result<EnvFile> {
        read_env_file(&self.path)
    }

    /// Start a read-modify-write transaction.
    ///
    /// The lock is acquired before the file is read and is held until the
    /// transaction is committed or dropped. A failed read releases the lock
    /// without touching the file.
    pub fn begin(&self, action: &str) -> Result<EnvTransaction> {
        let lock = EnvLock::acquire(&self.lock_path, &self.path, action)?;
        let file = read_env_file(&self.path)?;
        let original = file.render();

        Ok(EnvTransaction {
            path: self.path.clone(),
            file,
            original,
            lock,
        })
    }
}

/// An open `.env` transaction holding the env lock.
#[derive(Debug)]
pub struct EnvTransaction {
    path: PathBuf,
    file: EnvFile,
    original: String,
    lock: EnvLock,
}

impl EnvTransaction {
    /// The document as read at the start of the transaction, plus edits so far.
    pub fn file(&self) -> &EnvFile {
        &self.file
    }

    /// Stage `key=value`.
    pub fn set(&mut self, key: &str, value: &str) {
        self.file.set(key, value);
    }

    /// Atomically write the staged document, then release the lock.
    ///
    /// Nothing is written when the document is unchanged.
    pub fn commit(self) -> Result<()> {
        let rendered = self.file.render();
        if rendered != self.original {
            atomic_write_file(&self.path, &rendered)?;
        }
        self.lock.release()
    }
}

fn read_env_file(path: &Path) -> Result<EnvFile> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(EnvFile::parse(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EnvFile::parse("")),
        Err(e) => Err(TokenforgeError::ConfigMissing(format!(
            "could not read '{}': {}\n\
             Make sure the .env file exists and is readable.",
            path.display(),
            e
        ))),
    }
}
