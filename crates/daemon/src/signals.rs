//! Shutdown signalling for the mirror daemon.
//!
//! SIGINT and SIGTERM only raise a flag. The polling loop checks it before
//! each pass and between sleep steps, so a pass that has already started
//! always runs to completion and leaves the destination consistent; the
//! daemon exits at the next check after the pass returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

/// Set once a shutdown signal arrives; never cleared.
pub type ShutdownFlag = Arc<AtomicBool>;

/// Return a fresh flag and spawn a task that raises it on SIGINT or SIGTERM.
///
/// Must be called from within a tokio runtime.
pub fn setup_signal_handlers() -> ShutdownFlag {
    let flag = Arc::new(AtomicBool::new(false));
    let raised = flag.clone();

    tokio::spawn(async move {
        match wait_for_signal().await {
            Some(signal) => {
                info!(signal, "shutdown requested, stopping after the current pass");
                raised.store(true, Ordering::SeqCst);
            }
            None => warn!("no shutdown signal can be received, stop the process externally"),
        }
    });

    flag
}

/// Wait for the first shutdown signal and return its name, or `None` when no
/// handler could be registered.
async fn wait_for_signal() -> Option<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                return tokio::select! {
                    res = tokio::signal::ctrl_c() => res.ok().map(|_| "SIGINT"),
                    _ = sigterm.recv() => Some("SIGTERM"),
                };
            }
            Err(e) => warn!(error = %e, "cannot register SIGTERM handler, listening for Ctrl+C only"),
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => Some("SIGINT"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl+C");
            None
        }
    }
}

pub fn is_shutdown_requested(flag: &ShutdownFlag) -> bool {
    flag.load(Ordering::SeqCst)
}
