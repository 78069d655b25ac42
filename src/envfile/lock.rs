//! Exclusive lock over `.env` transactions.
//!
//! The lock is a JSON record created with create_new semantics, so a second
//! writer fails fast instead of waiting. A record left behind by a crashed
//! run is reclaimed once its holder process is gone or it is older than
//! [`STALE_AFTER_MINUTES`].

use crate::error::{Result, TokenforgeError};
use crate::events::current_actor;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Age after which a lock counts as abandoned.
///
/// A transaction only spans resolution and one file write, so any record
/// this old was left behind.
pub const STALE_AFTER_MINUTES: i64 = 10;

/// Who holds the `.env` lock and for what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// `user@host` of the holder.
    pub holder: String,
    pub pid: u32,
    pub acquired_at: DateTime<Utc>,
    /// Step that opened the transaction (e.g. `resolve`).
    pub purpose: String,
    /// The `.env` file being rewritten.
    pub env_file: PathBuf,
}

impl LockRecord {
    fn current(purpose: &str, env_file: &Path) -> Self {
        Self {
            holder: current_actor(),
            pid: std::process::id(),
            acquired_at: Utc::now(),
            purpose: purpose.to_string(),
            env_file: env_file.to_path_buf(),
        }
    }

    fn read(lock_path: &Path) -> Option<Self> {
        let content = fs::read_to_string(lock_path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.acquired_at)
    }

    /// The holder exited or the record outlived any real transaction.
    pub fn is_stale(&self) -> bool {
        self.age() > Duration::minutes(STALE_AFTER_MINUTES) || !process_alive(self.pid)
    }

    fn describe(&self) -> String {
        format!(
            "held by {} (pid {}) for '{}' since {}",
            self.holder,
            self.pid,
            self.purpose,
            self.acquired_at.to_rfc3339()
        )
    }
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// Without a cheap liveness check only the age threshold applies.
#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// A held `.env` lock. Dropping it removes the lock file.
#[derive(Debug)]
pub struct EnvLock {
    path: PathBuf,
    released: bool,
}

impl EnvLock {
    /// Take the lock at `lock_path` for a transaction on `env_file`.
    ///
    /// A stale lock is removed and acquisition retried once. A live lock
    /// fails with [`TokenforgeError::LockError`] naming its holder.
    pub fn acquire(lock_path: &Path, env_file: &Path, purpose: &str) -> Result<Self> {
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TokenforgeError::LockError(format!(
                    "failed to create locks directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let record = LockRecord::current(purpose, env_file);
        match try_create(lock_path, &record)? {
            Some(lock) => Ok(lock),
            None if reclaim_stale(lock_path) => {
                try_create(lock_path, &record)?.ok_or_else(|| held_error(lock_path))
            }
            None => Err(held_error(lock_path)),
        }
    }

    /// Remove the lock file, reporting failures.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        fs::remove_file(&self.path).map_err(|e| {
            TokenforgeError::LockError(format!(
                "failed to release lock '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl Drop for EnvLock {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = fs::remove_file(&self.path)
        {
            eprintln!(
                "Warning: failed to release lock '{}': {}",
                self.path.display(),
                e
            );
        }
    }
}

/// `Ok(None)` when the lock file already exists.
fn try_create(lock_path: &Path, record: &LockRecord) -> Result<Option<EnvLock>> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(lock_path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(TokenforgeError::LockError(format!(
                "failed to acquire lock '{}': {}",
                lock_path.display(),
                e
            )));
        }
    };

    // From here on the guard removes the file if writing the record fails.
    let lock = EnvLock {
        path: lock_path.to_path_buf(),
        released: false,
    };
    let json = serde_json::to_string_pretty(record).map_err(|e| {
        TokenforgeError::LockError(format!("failed to serialize lock record: {}", e))
    })?;
    file.write_all(json.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| TokenforgeError::LockError(format!("failed to write lock record: {}", e)))?;

    Ok(Some(lock))
}

/// Remove the lock at `lock_path` if it is stale. Returns whether it was removed.
///
/// A record that cannot be parsed may be mid-write by a live holder, so it
/// is judged by the file's modification time instead.
fn reclaim_stale(lock_path: &Path) -> bool {
    let stale = match LockRecord::read(lock_path) {
        Some(record) => record.is_stale(),
        None => modified_before_threshold(lock_path),
    };
    if !stale {
        return false;
    }

    eprintln!("Warning: removing stale lock '{}'", lock_path.display());
    fs::remove_file(lock_path).is_ok()
}

fn modified_before_threshold(lock_path: &Path) -> bool {
    let Ok(modified) = fs::metadata(lock_path).and_then(|m| m.modified()) else {
        return false;
    };
    let Ok(elapsed) = SystemTime::now().duration_since(modified) else {
        return false;
    };
    Duration::from_std(elapsed).is_ok_and(|age| age > Duration::minutes(STALE_AFTER_MINUTES))
}

fn held_error(lock_path: &Path) -> TokenforgeError {
    let holder = LockRecord::read(lock_path)
        .map(|record| format!("\nLock {}", record.describe()))
        .unwrap_or_default();
    TokenforgeError::LockError(format!(
        "the .env file is locked by another tokenforge run\nLock: {}{}\n\
         If no other run is active, delete the lock file and retry.",
        lock_path.display(),
        holder
    ))
}
