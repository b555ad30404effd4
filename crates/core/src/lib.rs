//! DirMirror core library.
//!
//! One-way mirroring of a flat directory: snapshots, classification,
//! content fingerprinting, and the pass engine that applies the result.

pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod fs;
pub mod logger;
pub mod models;
pub mod plan;
pub mod snapshot;
pub mod sync_engine;

// Re-exports for convenience.
pub use config::MirrorConfig;
pub use logger::{MemoryLogger, SyncLogger, TracingLogger};
pub use models::SyncReport;
pub use sync_engine::{synchronize_pass, MirrorEngine};
