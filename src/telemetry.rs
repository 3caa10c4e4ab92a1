//! Logging setup
//!
//! Logs go to stderr so stdout only ever carries the JSON reports.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `info`, with this crate raised to
/// `debug` when verbose. Dependencies stay at `info`.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose {
        "info,github_app_token=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}
