//! # Tracing Initialization
//!
//! One-stop setup for structured logging.

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=plaza=trace` - Show trace for plaza crates only
/// - Default: INFO level, sqlx at WARN
///
/// Safe to call more than once; repeated calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,plaza=debug,sqlx=warn"));

    // try_init instead of init: tests and the shell may both call this.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
