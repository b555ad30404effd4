//! Configuration for the DirMirror daemon.
//!
//! All four settings can come from the command line; a TOML file may supply
//! any of them instead. Command-line values win when both are given.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root of the TOML configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub mirror: MirrorSection,
}

/// The `[mirror]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorSection {
    /// Directory whose files are mirrored.
    #[serde(default)]
    pub source: PathBuf,

    /// Directory kept identical to `source`.
    #[serde(default)]
    pub destination: PathBuf,

    /// Seconds between passes (default 60).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// File receiving the action log.
    #[serde(default)]
    pub log_file: PathBuf,

    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for MirrorSection {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            interval_secs: default_interval_secs(),
            log_file: PathBuf::new(),
            log_level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Command-line overrides
// ---------------------------------------------------------------------------

/// Values given on the command line. `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub interval_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl MirrorConfig {
    /// Load a [`MirrorConfig`] from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: MirrorConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Replace file values with whatever the command line provided.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        let m = &mut self.mirror;
        if let Some(v) = overrides.source {
            m.source = v;
        }
        if let Some(v) = overrides.destination {
            m.destination = v;
        }
        if let Some(v) = overrides.interval_secs {
            m.interval_secs = v;
        }
        if let Some(v) = overrides.log_file {
            m.log_file = v;
        }
        if let Some(v) = overrides.log_level {
            m.log_level = v;
        }
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.mirror;
        for (field, value) in [
            ("mirror.source", &m.source),
            ("mirror.destination", &m.destination),
            ("mirror.log_file", &m.log_file),
        ] {
            if value.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    detail: "must not be empty".into(),
                });
            }
        }
        if m.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "mirror.interval_secs".into(),
                detail: "sync interval must be > 0".into(),
            });
        }
        if m.source == m.destination {
            return Err(ConfigError::InvalidValue {
                field: "mirror.destination".into(),
                detail: "destination must differ from source".into(),
            });
        }
        Ok(())
    }

    /// Generate a default TOML config template string.
    pub fn default_template() -> &'static str {
        r#"# DirMirror configuration

[mirror]
source = "/path/to/source"
destination = "/path/to/replica"
interval_secs = 60
log_file = "/var/log/dirmirror.log"
log_level = "info"
"#
    }
}
