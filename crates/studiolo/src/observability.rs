//! Tracing setup for binaries and tests.

use tracing_subscriber::EnvFilter;

/// Installs a formatted `tracing` subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `info` for this
/// workspace and `warn` for everything else. Calling it twice is harmless;
/// the second call leaves the first subscriber installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,studiolo=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
