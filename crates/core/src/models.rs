//! Result types produced by a synchronization pass.

use chrono::{DateTime, Utc};

use crate::errors::FileError;
use crate::plan::CopyReason;

/// A file that was copied into the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub name: String,
    pub reason: CopyReason,
}

/// Outcome of one pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Files copied into the destination, with the reason for each.
    pub copied: Vec<CopiedFile>,
    /// Destination-only files that were deleted.
    pub removed: Vec<String>,
    /// Files whose content digests matched; nothing was done.
    pub unchanged: u64,
    /// Per-file failures. The pass carried on past each of these.
    pub failures: Vec<FileError>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SyncReport {
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    /// Copies plus removals.
    pub fn action_count(&self) -> usize {
        self.copied_count() + self.removed_count()
    }

    pub fn has_changes(&self) -> bool {
        self.action_count() > 0
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Copies made for `reason`.
    pub fn copied_for(&self, reason: CopyReason) -> impl Iterator<Item = &str> {
        self.copied
            .iter()
            .filter(move |c| c.reason == reason)
            .map(|c| c.name.as_str())
    }

    /// Wall-clock duration of the pass, once it has completed.
    pub fn duration(&self) -> Option<chrono::Duration> {
        Some(self.completed_at? - self.started_at?)
    }
}
