//! Polling scheduler for the mirror daemon.
//!
//! Passes never overlap: each one runs to completion on the blocking pool
//! and the loop waits for it before sleeping.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use dirmirror_core::MirrorEngine;

use crate::signals::{is_shutdown_requested, ShutdownFlag};

/// Longest uninterrupted sleep between shutdown checks.
const SLEEP_STEP: Duration = Duration::from_secs(1);

/// Counters accumulated over the life of the loop.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SchedulerStats {
    pub total_passes: u64,
    pub failed_passes: u64,
    pub consecutive_failures: u64,
    pub files_copied: u64,
    pub files_removed: u64,
}

/// Run the mirror engine in a polling loop until `shutdown` is set.
pub async fn run_polling_loop(
    engine: Arc<MirrorEngine>,
    poll_interval: Duration,
    shutdown: ShutdownFlag,
) -> SchedulerStats {
    info!(
        interval_secs = poll_interval.as_secs(),
        source = %engine.source().display(),
        destination = %engine.destination().display(),
        "starting polling loop"
    );
    let mut stats = SchedulerStats::default();

    loop {
        if is_shutdown_requested(&shutdown) {
            info!("shutdown requested, exiting polling loop");
            break;
        }

        let pass_engine = engine.clone();
        let outcome = tokio::task::spawn_blocking(move || pass_engine.run_pass()).await;
        stats.total_passes += 1;

        match outcome {
            Ok(Ok(report)) => {
                stats.consecutive_failures = 0;
                stats.files_copied += report.copied_count() as u64;
                stats.files_removed += report.removed_count() as u64;
                if report.has_failures() {
                    warn!(
                        failures = report.failures.len(),
                        "sync pass completed with file errors, retrying next pass"
                    );
                }
            }
            Ok(Err(e)) => {
                stats.failed_passes += 1;
                stats.consecutive_failures += 1;
                error!(
                    error = %e,
                    consecutive = stats.consecutive_failures,
                    "sync pass failed"
                );
            }
            Err(e) => {
                stats.failed_passes += 1;
                stats.consecutive_failures += 1;
                error!(error = %e, "sync pass task aborted");
            }
        }

        // Sleep with early exit on shutdown
        let step = SLEEP_STEP.min(poll_interval);
        let mut slept = Duration::ZERO;
        while slept < poll_interval {
            if is_shutdown_requested(&shutdown) {
                info!("shutdown requested during sleep, exiting");
                return stats;
            }
            tokio::time::sleep(step).await;
            slept += step;
        }
    }

    stats
}
