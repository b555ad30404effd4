//! Log sink setup.
//!
//! Every event goes to two places: the console (stdout) and the log file
//! named on the command line. The file is appended to, never rotated.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

/// Keeps the background file writer alive. Dropping it flushes the log.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Build the filter for `level`, falling back to `info` when it does not parse.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build the console + file subscriber without installing it.
///
/// The guard flushes the file writer when dropped.
pub fn build_subscriber(
    log_file: &Path,
    level: &str,
) -> Result<(impl Subscriber + Send + Sync + 'static, LogGuard)> {
    let file_name = log_file
        .file_name()
        .with_context(|| format!("log path has no file name: {}", log_file.display()))?;
    let dir = match log_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let subscriber = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(file_layer)
        .with(console_layer);

    Ok((subscriber, LogGuard { _guard: guard }))
}

/// Install the console + file subscriber as the global default.
///
/// The returned guard must be held for the lifetime of the process.
pub fn init(log_file: &Path, level: &str) -> Result<LogGuard> {
    let (subscriber, guard) = build_subscriber(log_file, level)?;
    subscriber
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(guard)
}
