//! Log output setup.

use tracing_subscriber::EnvFilter;

/// Installs a stderr `tracing` subscriber at `level`.
///
/// `RUST_LOG`, when set, overrides `level`. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
