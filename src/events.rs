//! Append-only audit log for confsync.
//!
//! Every import attempt and every manual lock clear is recorded as one JSON
//! object per line (NDJSON) in `.confsync/events/events.ndjson`.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `import` or `lock_clear`
//! - `actor`: the owner string (`user@HOST`)
//! - `details`: action-specific object
//!
//! ```no_run
//! use confsync::context::SyncContext;
//! use confsync::events::{Event, EventAction, append_event};
//! use serde_json::json;
//!
//! let ctx = SyncContext::resolve()?;
//! let event = Event::new(EventAction::Import).with_details(json!({"outcome": "succeeded"}));
//! append_event(&ctx.events_file(), &event)?;
//! # Ok::<(), confsync::error::SyncError>(())
//! ```

use crate::error::{Result, SyncError};
use crate::locks::current_actor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Actions recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// An import attempt, whatever its outcome.
    Import,
    /// Import lock cleared manually.
    LockClear,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Import => write!(f, "import"),
            EventAction::LockClear => write!(f, "lock_clear"),
        }
    }
}

/// One audit log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,
    pub action: EventAction,
    pub actor: String,
    pub details: Value,
}

impl Event {
    /// A new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: current_actor(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize to a single JSON line (no trailing newline).
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SyncError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Append `event` to the log at `events_file`, creating it if needed.
pub fn append_event(events_file: &Path, event: &Event) -> Result<()> {
    let json_line = event.to_ndjson_line()?;

    if let Some(dir) = events_file.parent()
        && !dir.exists()
    {
        fs::create_dir_all(dir).map_err(|e| {
            SyncError::UserError(format!(
                "failed to create events directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(events_file)
        .map_err(|e| {
            SyncError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        SyncError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        SyncError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}
