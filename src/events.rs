//! Event logging subsystem for tokenforge.
//!
//! Every pipeline run leaves an append-only audit trail in NDJSON format (one
//! JSON object per line) at `.tokenforge/events/events.ndjson`.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The pipeline step (resolve, compile, deploy, deployed, failed, clarify)
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `capability`: Optional capability that triggered the run (e.g. `handleTask`)
//! - `details`: Freeform object with action-specific details
//!
//! Secrets are never written to the log. Callers pass token parameters,
//! stage names and truncated stderr only.

use crate::context::ProjectContext;
use crate::error::{Result, TokenforgeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Request resolved and written back to `.env`
    Resolve,
    /// Compile command finished
    Compile,
    /// Deploy command finished
    Deploy,
    /// Pipeline reported success
    Deployed,
    /// Pipeline stopped with a failure
    Failed,
    /// Caller was asked for missing token details
    Clarify,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Resolve => write!(f, "resolve"),
            EventAction::Compile => write!(f, "compile"),
            EventAction::Deploy => write!(f, "deploy"),
            EventAction::Deployed => write!(f, "deployed"),
            EventAction::Failed => write!(f, "failed"),
            EventAction::Clarify => write!(f, "clarify"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Capability that triggered the run, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action.
    ///
    /// The timestamp is set to the current time, and the actor is
    /// determined from the environment (USER@HOSTNAME).
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: current_actor(),
            capability: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the capability for this event.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capability = Some(capability.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            TokenforgeError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// Append an event to the events log.
///
/// The file and its directory are created if missing. Each append results in
/// one line with a trailing newline, synced to disk.
pub fn append_event(ctx: &ProjectContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();
    let json_line = event.to_ndjson_line()?;

    let events_dir = ctx.events_dir();
    if !events_dir.exists() {
        fs::create_dir_all(&events_dir).map_err(|e| {
            TokenforgeError::UserError(format!(
                "failed to create events directory '{}': {}",
                events_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            TokenforgeError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        TokenforgeError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        TokenforgeError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// `user@host` of the account running tokenforge.
pub(crate) fn current_actor() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event, downgrading any failure to a warning on stderr.
///
/// The audit log must never change the outcome of a deployment.
pub fn record(ctx: &ProjectContext, event: Event) {
    if let Err(e) = append_event(ctx, &event) {
        eprintln!("Warning: failed to record '{}' event: {}", event.action, e);
    }
}
