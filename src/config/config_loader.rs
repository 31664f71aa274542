use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::JobConfig;
use crate::error::RegionResult;
use crate::utils::fs::read_file_to_string;
use crate::utils::paths::resolve_against;

/// Loads TOML job files
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Set the job file path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load the job file.
    ///
    /// Relative `path` and `replacement_file` entries are resolved against
    /// the job file's directory, not the process working directory.
    pub fn load(&self) -> RegionResult<JobConfig> {
        debug!("Loading job file: {}", self.config_path.display());
        let content = read_file_to_string(&self.config_path)?;
        let mut config: JobConfig = toml::from_str(&content)?;

        let base = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.path = config.path.map(|p| resolve_against(p, &base));
        config.replacement_file = config.replacement_file.map(|p| {
            if p.as_os_str() == "-" {
                p
            } else {
                resolve_against(p, &base)
            }
        });

        Ok(config)
    }
}
