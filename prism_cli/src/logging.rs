//! Diagnostic tracing for the launcher.
//!
//! Bootstrap events (phase changes, path calculation, teardown) are emitted
//! through `tracing`. They go to stderr and are off below `warn` unless
//! `RUST_LOG` asks for more.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`. Output is compact, on stderr.
///
/// ```bash
/// RUST_LOG=prism_config=debug prism -c pass
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
