//! Action logging capability handed to the sync engine.
//!
//! The engine emits exactly one line per copy or removal, plus one per
//! per-file failure. Where those lines go is the caller's decision: the
//! daemon uses [`TracingLogger`], tests use [`MemoryLogger`].

use std::sync::Mutex;

use tracing::{error, info};

/// Receives human-readable action lines from a pass.
pub trait SyncLogger: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str) {
        self.info(message);
    }
}

/// Forwards lines to `tracing`, so they reach every installed layer
/// (console and log file in the daemon).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl SyncLogger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "dirmirror::action", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "dirmirror::action", "{message}");
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything logged so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Drain and return everything logged so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(
            &mut *self
                .lines
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl SyncLogger for MemoryLogger {
    fn info(&self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_records_in_order() {
        let logger = MemoryLogger::new();
        logger.info("copied a.txt (new)");
        logger.error("failed to copy b.txt: denied");
        assert_eq!(
            logger.lines(),
            vec!["copied a.txt (new)", "failed to copy b.txt: denied"]
        );
    }

    #[test]
    fn test_take_drains() {
        let logger = MemoryLogger::new();
        logger.info("one");
        assert_eq!(logger.take(), vec!["one"]);
        assert!(logger.lines().is_empty());
    }
}
