//! Log output setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` enables debug output for this
/// crate and everything else stays at `warn`. Later calls are no-ops.
pub fn init(verbose: bool) {
    let fallback = if verbose { "warn,zktree=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .try_init();
}
