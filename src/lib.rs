// regionswap - replace a pattern-anchored region of a text file
// The region runs from the first match of a start pattern through the first
// end marker that follows it

pub mod config;
pub mod diff;
pub mod error;
pub mod file;
pub mod utils;

use anyhow::Result;
use tracing::debug;

pub use error::{RegionError, RegionResult};
pub use file::{replace_region, rewrite_file, RewriteRequest, StartAnchor};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Initialize logging to stderr
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects debug over info.
/// Stdout stays free for diffs and JSON output.
pub fn init_with_logger(verbose: bool) -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "regionswap=debug" } else { "regionswap=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(verbose)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    debug!("Initializing regionswap v{}", version());
    Ok(())
}
