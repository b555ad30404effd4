//! Directory snapshots.
//!
//! A [`Snapshot`] maps file name to [`FileEntry`] for the direct regular-file
//! children of one directory. It is taken once at the start of a pass and
//! never refreshed; anything that changes afterwards is picked up next pass.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use tracing::{debug, warn};

/// Metadata of one regular file, as seen when the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub modified: SystemTime,
    pub len: u64,
}

impl FileEntry {
    pub fn new(modified: SystemTime, len: u64) -> Self {
        Self { modified, len }
    }
}

/// File name → metadata for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, FileEntry>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// List the regular files directly inside `dir`.
    ///
    /// Subdirectories, symlinks and special files are skipped. Entries that
    /// vanish between `read_dir` and `stat`, or whose names are not valid
    /// UTF-8, are skipped with a warning. Only a failure to open the
    /// directory itself is returned as an error.
    pub fn scan(dir: &Path) -> io::Result<Self> {
        let mut snapshot = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            // DirEntry::file_type does not follow symlinks.
            match entry.file_type() {
                Ok(ft) if ft.is_file() => {}
                Ok(_) => {
                    debug!(path = %entry.path().display(), "skipping non-regular entry");
                    continue;
                }
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "cannot stat entry");
                    continue;
                }
            }

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(name = ?raw, "skipping file with non UTF-8 name");
                    continue;
                }
            };

            let meta = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!(file = %name, error = %e, "file vanished during listing");
                    continue;
                }
            };
            let modified = match meta.modified() {
                Ok(t) => t,
                Err(e) => {
                    warn!(file = %name, error = %e, "modification time unavailable");
                    continue;
                }
            };

            snapshot.insert(name, FileEntry::new(modified, meta.len()));
        }

        debug!(dir = %dir.display(), files = snapshot.len(), "directory snapshot taken");
        Ok(snapshot)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: FileEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&FileEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, FileEntry)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, FileEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
