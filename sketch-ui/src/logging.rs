// Tracing setup for hosts embedding the sketchpad.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to `info`.
pub fn init() -> bool {
    init_with_filter("info")
}

/// Like [`init`] with a different fallback filter. Returns false if a
/// subscriber was already installed.
pub fn init_with_filter(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
