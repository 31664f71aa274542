// Job configuration for regionswap
// A job file describes one rewrite; command-line flags override it

#[allow(clippy::module_inception)]
pub mod config;
pub mod config_loader;

pub use config::JobConfig;
pub use config_loader::ConfigLoader;
