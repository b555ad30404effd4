//! One-way mirror engine.
//!
//! A pass snapshots both directories, classifies every file with
//! [`plan`](crate::plan::plan), then applies the decisions one file at a
//! time. Digests are only computed for files whose modification times
//! already agree.
//!
//! Each pass is independent: nothing is remembered between runs, so a pass
//! over unchanged directories performs no actions and logs nothing. A failed
//! copy or removal is logged and recorded, and the remaining files are still
//! processed. The next pass retries whatever is still out of sync.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::errors::{FileError, SyncError};
use crate::fs::{LocalFs, MirrorFs};
use crate::logger::SyncLogger;
use crate::models::{CopiedFile, SyncReport};
use crate::plan::{plan, CopyReason, PlannedAction};
use crate::snapshot::Snapshot;

/// Mirrors `source` into `destination`.
pub struct MirrorEngine<F: MirrorFs = LocalFs> {
    source: PathBuf,
    destination: PathBuf,
    fs: F,
    logger: Arc<dyn SyncLogger>,
}

impl MirrorEngine<LocalFs> {
    /// Create an engine operating on the local filesystem.
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        logger: Arc<dyn SyncLogger>,
    ) -> Self {
        Self::with_fs(source, destination, LocalFs::new(), logger)
    }
}

impl<F: MirrorFs> MirrorEngine<F> {
    /// Create an engine over a custom filesystem implementation.
    pub fn with_fs(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        fs: F,
        logger: Arc<dyn SyncLogger>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            fs,
            logger,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Run one synchronization pass.
    ///
    /// Returns [`SyncError::DirectoryAccess`] if either root cannot be
    /// listed; in that case nothing has been modified.
    pub fn run_pass(&self) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport {
            started_at: Some(Utc::now()),
            ..SyncReport::default()
        };

        let source_snap = self.take_snapshot(&self.source)?;
        let dest_snap = self.take_snapshot(&self.destination)?;
        debug!(
            source_files = source_snap.len(),
            dest_files = dest_snap.len(),
            "snapshots taken"
        );

        self.execute(plan(&source_snap, &dest_snap), &mut report);

        report.completed_at = Some(Utc::now());
        if report.has_changes() || report.has_failures() {
            info!(
                copied = report.copied_count(),
                removed = report.removed_count(),
                unchanged = report.unchanged,
                failures = report.failures.len(),
                "sync pass finished"
            );
        } else {
            debug!(unchanged = report.unchanged, "sync pass finished, nothing to do");
        }
        Ok(report)
    }

    fn execute(&self, actions: Vec<PlannedAction>, report: &mut SyncReport) {
        for action in actions {
            match action {
                PlannedAction::Copy { name, reason } => self.copy(name, reason, report),
                PlannedAction::Verify { name } => self.verify(name, report),
                PlannedAction::Remove { name } => self.remove(name, report),
            }
        }
    }

    fn take_snapshot(&self, dir: &Path) -> Result<Snapshot, SyncError> {
        self.fs
            .snapshot(dir)
            .map_err(|source| SyncError::DirectoryAccess {
                path: dir.to_path_buf(),
                source,
            })
    }

    fn copy(&self, name: String, reason: CopyReason, report: &mut SyncReport) {
        let from = self.source.join(&name);
        let to = self.destination.join(&name);
        match self.fs.copy_file(&from, &to) {
            Ok(()) => {
                self.logger.info(&format!("copied {name} ({reason})"));
                report.copied.push(CopiedFile { name, reason });
            }
            Err(source) => self.fail(FileError::Copy { name, source }, report),
        }
    }

    fn verify(&self, name: String, report: &mut SyncReport) {
        let src = match self.fs.fingerprint(&self.source.join(&name)) {
            Ok(d) => d,
            Err(source) => return self.fail(FileError::Fingerprint { name, source }, report),
        };
        let dst = match self.fs.fingerprint(&self.destination.join(&name)) {
            Ok(d) => d,
            Err(source) => return self.fail(FileError::Fingerprint { name, source }, report),
        };

        if src == dst {
            report.unchanged += 1;
        } else {
            debug!(file = %name, source = %src, dest = %dst, "content digests differ");
            self.copy(name, CopyReason::ContentUpdated, report);
        }
    }

    fn remove(&self, name: String, report: &mut SyncReport) {
        match self.fs.remove_file(&self.destination.join(&name)) {
            Ok(()) => {
                self.logger.info(&format!("removed {name}"));
                report.removed.push(name);
            }
            Err(source) => self.fail(FileError::Remove { name, source }, report),
        }
    }

    fn fail(&self, err: FileError, report: &mut SyncReport) {
        self.logger.error(&err.to_string());
        report.failures.push(err);
    }
}

/// Run a single pass of `source` into `destination` on the local filesystem.
pub fn synchronize_pass(
    source: &Path,
    destination: &Path,
    logger: Arc<dyn SyncLogger>,
) -> Result<SyncReport, SyncError> {
    MirrorEngine::new(source, destination, logger).run_pass()
}
