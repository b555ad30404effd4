//! Filesystem access used by the sync engine.
//!
//! [`MirrorFs`] is the seam between the engine and the disk. [`LocalFs`] is
//! the real implementation; tests substitute an in-memory one to drive
//! classification and failure paths without touching a directory.

use std::io;
use std::path::Path;

use filetime::FileTime;
use tracing::debug;

use crate::errors::FingerprintError;
use crate::fingerprint::{self, Digest};
use crate::snapshot::Snapshot;

/// Operations a synchronization pass performs on the filesystem.
pub trait MirrorFs: Send + Sync {
    /// List the regular files directly inside `dir`.
    fn snapshot(&self, dir: &Path) -> io::Result<Snapshot>;

    /// Content digest of the file at `path`.
    fn fingerprint(&self, path: &Path) -> Result<Digest, FingerprintError>;

    /// Copy `from` over `to`, leaving `to` with the modification time of
    /// `from`. The next pass relies on that timestamp to see the pair as
    /// in sync.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// [`MirrorFs`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl MirrorFs for LocalFs {
    fn snapshot(&self, dir: &Path) -> io::Result<Snapshot> {
        Snapshot::scan(dir)
    }

    fn fingerprint(&self, path: &Path) -> Result<Digest, FingerprintError> {
        fingerprint::fingerprint(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        // Both the copy and set_file_times follow links, so a symlink (or any
        // other non-regular entry) under the target name is never written
        // through. Snapshots ignore such entries, so they are left in place.
        match std::fs::symlink_metadata(to) {
            Ok(meta) if !meta.file_type().is_file() => {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "destination exists and is not a regular file",
                ));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        // std::fs::copy carries permission bits but not timestamps.
        let bytes = std::fs::copy(from, to)?;
        let meta = std::fs::metadata(from)?;
        let mtime = FileTime::from_last_modification_time(&meta);
        let atime = FileTime::from_last_access_time(&meta);
        filetime::set_file_times(to, atime, mtime)?;
        debug!(from = %from.display(), to = %to.display(), bytes, "copied file");
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)?;
        debug!(path = %path.display(), "removed file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_preserves_mtime_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        std::fs::write(&src, b"payload").unwrap();
        let mtime = FileTime::from_unix_time(1_500_000_000, 0);
        filetime::set_file_mtime(&src, mtime).unwrap();

        LocalFs::new().copy_file(&src, &dst).unwrap();

        assert_eq!(std::fs::read(&dst).unwrap(), b"payload");
        let dst_meta = std::fs::metadata(&dst).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&dst_meta), mtime);
    }

    #[test]
    fn test_copy_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        std::fs::write(&src, b"new").unwrap();
        std::fs::write(&dst, b"old and longer").unwrap();

        LocalFs::new().copy_file(&src, &dst).unwrap();
        assert_eq!(std::fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = LocalFs::new().copy_file(&dir.path().join("gone"), &dir.path().join("dst"));
        assert!(result.is_err());
        assert!(!dir.path().join("dst").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_refuses_symlink_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let target = dir.path().join("target.txt");
        let link = dir.path().join("link.txt");
        std::fs::write(&src, b"new").unwrap();
        std::fs::write(&target, b"keep").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = LocalFs::new().copy_file(&src, &link).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read(&target).unwrap(), b"keep");
        assert!(std::fs::symlink_metadata(&link)
            .unwrap()
            .file_type()
            .is_symlink());
    }

    #[test]
    fn test_copy_refuses_directory_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let sub = dir.path().join("sub");
        std::fs::write(&src, b"new").unwrap();
        std::fs::create_dir(&sub).unwrap();

        assert!(LocalFs::new().copy_file(&src, &sub).is_err());
        assert!(sub.is_dir());
    }

    #[test]
    fn test_remove_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.txt");
        std::fs::write(&path, b"x").unwrap();

        LocalFs::new().remove_file(&path).unwrap();
        assert!(!path.exists());
        assert!(LocalFs::new().remove_file(&path).is_err());
    }
}
