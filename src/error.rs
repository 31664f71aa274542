use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for regionswap
#[derive(Error, Debug)]
pub enum RegionError {
    #[error("Start anchor not found: pattern `{pattern}` has no match")]
    StartNotFound { pattern: String },

    #[error("End marker not found: `{marker}` does not occur at or after byte {from}")]
    EndNotFound { marker: String, from: usize },

    #[error("Invalid start pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("End marker must not be empty")]
    EmptyEndMarker,

    #[error("IO error{}", .path.as_ref().map(|p| format!(" on {}", p.display())).unwrap_or_default())]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Write verification failed for {}: content on disk does not match", .path.display())]
    VerificationFailed { path: PathBuf },
}

impl RegionError {
    /// Create a new start-not-found error
    pub fn start_not_found(pattern: impl Into<String>) -> Self {
        Self::StartNotFound {
            pattern: pattern.into(),
        }
    }

    /// Create a new end-not-found error
    pub fn end_not_found(marker: impl Into<String>, from: usize) -> Self {
        Self::EndNotFound {
            marker: marker.into(),
            from,
        }
    }

    /// Create a new IO error with path context
    pub fn io_error(err: std::io::Error, path: Option<impl Into<PathBuf>>) -> Self {
        Self::Io {
            source: err,
            path: path.map(|p| p.into()),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for the two errors meaning the region could not be located
    pub fn is_region_missing(&self) -> bool {
        matches!(self, Self::StartNotFound { .. } | Self::EndNotFound { .. })
    }
}

impl From<std::io::Error> for RegionError {
    fn from(error: std::io::Error) -> Self {
        RegionError::io_error(error, None::<PathBuf>)
    }
}

impl From<toml::de::Error> for RegionError {
    fn from(error: toml::de::Error) -> Self {
        RegionError::config(error.to_string())
    }
}

/// Result type alias using RegionError
pub type RegionResult<T> = Result<T, RegionError>;

/// Extension trait for attaching a path to IO results
pub trait ErrorExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> RegionResult<T>;
}

impl<T> ErrorExt<T> for Result<T, std::io::Error> {
    fn with_path(self, path: impl Into<PathBuf>) -> RegionResult<T> {
        let path = path.into();
        self.map_err(|e| RegionError::io_error(e, Some(path)))
    }
}

/// Handle file operations with proper context
pub fn with_file_context<T>(
    operation: impl FnOnce() -> Result<T, std::io::Error>,
    path: impl AsRef<Path>,
) -> RegionResult<T> {
    operation().map_err(|e| RegionError::io_error(e, Some(path.as_ref())))
}
