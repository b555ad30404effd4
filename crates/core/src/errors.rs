//! Error types for the DirMirror core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Sync pass errors
// ---------------------------------------------------------------------------

/// Errors that abort a whole synchronization pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// One of the two root directories could not be listed.
    #[error("cannot access directory '{}': {source}", .path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Per-file errors
// ---------------------------------------------------------------------------

/// A failure on a single file. Logged and recorded, never fatal to a pass.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to copy {name}: {source}")]
    Copy {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {name}: {source}")]
    Remove {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fingerprint {name}: {source}")]
    Fingerprint {
        name: String,
        #[source]
        source: FingerprintError,
    },
}

impl FileError {
    /// Name of the file the failure refers to.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Copy { name, .. } | Self::Remove { name, .. } | Self::Fingerprint { name, .. } => {
                name
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fingerprint errors
// ---------------------------------------------------------------------------

/// Errors from content hashing.
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// The file could not be opened or a read failed mid-stream.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is missing or invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
