//! Logging init for the monitor: stderr, tracing fmt with env-filter.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr.
///
/// The monitor is a foreground process (terminal or container), so stderr is
/// the log sink. `RUST_LOG` overrides the default filter, which keeps the
/// per-decision debug lines quiet unless asked for.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,reswarm=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
