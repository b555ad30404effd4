//! DirMirror daemon entry point.
//!
//! Resolves configuration from the command line (and optionally a TOML
//! file), installs console + file logging, then either runs a single pass
//! or keeps mirroring on a fixed interval until SIGINT/SIGTERM.

mod logging;
mod scheduler;
mod signals;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use dirmirror_core::config::{MirrorConfig, Overrides};
use dirmirror_core::{MirrorEngine, TracingLogger};

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// Periodically mirror one directory into another.
#[derive(Parser, Debug)]
#[command(name = "dirmirror", version, about)]
struct Args {
    /// Directory to mirror from.
    #[arg(required_unless_present = "config")]
    source: Option<PathBuf>,

    /// Directory to mirror into.
    #[arg(required_unless_present = "config")]
    destination: Option<PathBuf>,

    /// Seconds between synchronization passes.
    #[arg(
        required_unless_present = "config",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: Option<u64>,

    /// File that receives the action log.
    #[arg(required_unless_present = "config")]
    log_file: Option<PathBuf>,

    /// TOML configuration file; positional arguments override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Run a single pass and exit.
    #[arg(long)]
    once: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            source: self.source.clone(),
            destination: self.destination.clone(),
            interval_secs: self.interval,
            log_file: self.log_file.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    let mirror = &config.mirror;

    let _log_guard = logging::init(&mirror.log_file, &mirror.log_level)
        .context("failed to initialize logging")?;

    info!("========================================");
    info!("  DirMirror v{}", env!("CARGO_PKG_VERSION"));
    info!("========================================");
    info!("Source        : {}", mirror.source.display());
    info!("Destination   : {}", mirror.destination.display());
    info!("Interval      : {}s", mirror.interval_secs);
    info!("Log file      : {}", mirror.log_file.display());
    info!("Log level     : {}", mirror.log_level);
    info!("========================================");

    let engine = Arc::new(MirrorEngine::new(
        &mirror.source,
        &mirror.destination,
        Arc::new(TracingLogger),
    ));

    if args.once {
        return run_once(&engine);
    }

    let shutdown = signals::setup_signal_handlers();
    let interval = Duration::from_secs(mirror.interval_secs);
    let stats = scheduler::run_polling_loop(engine, interval, shutdown).await;

    info!(
        passes = stats.total_passes,
        failed = stats.failed_passes,
        copied = stats.files_copied,
        removed = stats.files_removed,
        "DirMirror stopped"
    );
    Ok(())
}

/// Merge the optional config file with command-line values and validate.
fn resolve_config(args: &Args) -> Result<MirrorConfig> {
    let mut config = match &args.config {
        Some(path) => MirrorConfig::load_from_file(expand_tilde(path))
            .context("failed to load configuration file")?,
        None => MirrorConfig::default(),
    };
    config.apply_overrides(args.overrides());

    let m = &mut config.mirror;
    m.source = expand_tilde(&m.source);
    m.destination = expand_tilde(&m.destination);
    m.log_file = expand_tilde(&m.log_file);

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Run a single pass and print a summary.
fn run_once(engine: &MirrorEngine) -> Result<()> {
    info!("running single sync pass");
    let report = engine.run_pass().context("sync pass failed")?;

    println!(
        "Sync complete: {} copied, {} removed, {} unchanged, {} failed",
        report.copied_count(),
        report.removed_count(),
        report.unchanged,
        report.failures.len()
    );
    Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let args = Args::try_parse_from(["dirmirror", "/a", "/b", "30", "/tmp/m.log"]).unwrap();
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.mirror.source, PathBuf::from("/a"));
        assert_eq!(config.mirror.destination, PathBuf::from("/b"));
        assert_eq!(config.mirror.interval_secs, 30);
        assert_eq!(config.mirror.log_file, PathBuf::from("/tmp/m.log"));
        assert!(!args.once);
    }

    #[test]
    fn test_missing_positionals_rejected() {
        assert!(Args::try_parse_from(["dirmirror", "/a", "/b"]).is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Args::try_parse_from(["dirmirror", "/a", "/b", "0", "/tmp/m.log"]).is_err());
    }

    #[test]
    fn test_config_file_with_positional_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dirmirror.toml");
        std::fs::write(
            &path,
            "[mirror]\nsource = \"/from-file\"\ndestination = \"/dst\"\ninterval_secs = 10\nlog_file = \"/tmp/f.log\"\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "dirmirror",
            "--config",
            path.to_str().unwrap(),
            "--log-level",
            "debug",
        ])
        .unwrap();
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.mirror.source, PathBuf::from("/from-file"));
        assert_eq!(config.mirror.interval_secs, 10);
        assert_eq!(config.mirror.log_level, "debug");

        let args = Args::try_parse_from([
            "dirmirror",
            "/cli-src",
            "/dst",
            "5",
            "/tmp/f.log",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.mirror.source, PathBuf::from("/cli-src"));
        assert_eq!(config.mirror.interval_secs, 5);
    }

    #[test]
    fn test_same_source_and_destination_rejected() {
        let args = Args::try_parse_from(["dirmirror", "/a", "/a", "30", "/tmp/m.log"]).unwrap();
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let plain = Path::new("/var/data");
        assert_eq!(expand_tilde(plain), PathBuf::from("/var/data"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/mirror")), home.join("mirror"));
        }
    }

    #[test]
    fn test_run_once_mirrors_directory() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        std::fs::create_dir(&src).unwrap();
        std::fs::create_dir(&dst).unwrap();
        std::fs::write(src.join("a.txt"), b"hi").unwrap();
        std::fs::write(dst.join("old.txt"), b"bye").unwrap();

        let engine = MirrorEngine::new(&src, &dst, Arc::new(TracingLogger));
        run_once(&engine).unwrap();
        assert!(dst.join("a.txt").exists());
        assert!(!dst.join("old.txt").exists());

        let missing = MirrorEngine::new(dir.path().join("nope"), &dst, Arc::new(TracingLogger));
        assert!(run_once(&missing).is_err());
    }
}
