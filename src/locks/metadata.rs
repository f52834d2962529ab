//! What the import lock file records about its holder.

use crate::error::{Result, SyncError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Action recorded by imports.
pub const IMPORT_ACTION: &str = "import";

/// JSON body of the import lock file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockMetadata {
    /// `user@HOST` of the process holding the lock.
    pub owner: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    pub created_at: DateTime<Utc>,

    pub action: String,
}

impl LockMetadata {
    /// Holder record for an import started by this process.
    pub fn for_import() -> Self {
        Self {
            owner: current_actor(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            action: IMPORT_ACTION.to_string(),
        }
    }

    /// Read the holder record from an existing lock file.
    pub fn load(path: &Path) -> Result<Self> {
        let unreadable = |reason: String| {
            SyncError::LockError(format!(
                "import lock '{}' is unreadable: {}",
                path.display(),
                reason
            ))
        };

        let content = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SyncError::LockError(format!("failed to encode import lock: {}", e)))
    }

    /// Whole minutes since the lock was taken.
    pub fn minutes_held(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.created_at)
            .num_minutes()
    }

    /// A lock held longer than `stale_after_minutes` presumably outlived its import.
    pub fn is_stale(&self, stale_after_minutes: u32) -> bool {
        self.minutes_held() > i64::from(stale_after_minutes)
    }

    /// `owner (pid N)`, or just the owner when no pid was recorded.
    pub fn holder(&self) -> String {
        match self.pid {
            Some(pid) => format!("{} (pid {})", self.owner, pid),
            None => self.owner.clone(),
        }
    }

    /// One-line account of who holds the lock and for how long.
    pub fn describe(&self, stale_after_minutes: u32) -> String {
        let mut text = format!(
            "held by {} for {} min since {} ({})",
            self.holder(),
            self.minutes_held(),
            self.created_at.format("%Y-%m-%d %H:%M UTC"),
            self.action
        );
        if self.is_stale(stale_after_minutes) {
            text.push_str(", stale");
        }
        text
    }
}

/// `user@HOST` for this process; also the actor of audit log events.
pub(crate) fn current_actor() -> String {
    let user = ["USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .unwrap_or_else(|| "unknown".to_string());
    let host = hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());

    format!("{}@{}", user, host)
}
