//! # Telemetry
//!
//! tracing-subscriber initialization for processes embedding the
//! operations layer.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Default level is INFO; override with `RUST_LOG` (e.g.
/// `RUST_LOG=welgama_db=debug`). Safe to call more than once: later calls
/// are no-ops, so tests can call it freely.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
