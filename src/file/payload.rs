use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{ErrorExt, RegionResult};
use crate::utils::fs::read_file_to_string;

/// Where the replacement payload comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Text given directly by the caller
    Inline(String),
    /// Contents of a file, read verbatim
    File(PathBuf),
    /// Everything on standard input
    Stdin,
}

impl PayloadSource {
    /// Interpret a `--replacement-file` argument, where `-` means stdin
    pub fn from_file_arg(arg: impl Into<PathBuf>) -> Self {
        let path = arg.into();
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path)
        }
    }

    /// Load the payload exactly as stored
    pub fn load(&self) -> RegionResult<String> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::File(path) => {
                debug!("Loading replacement payload from {}", path.display());
                read_file_to_string(path)
            }
            Self::Stdin => {
                debug!("Loading replacement payload from stdin");
                let mut buf = String::new();
                std::io::stdin()
                    .lock()
                    .read_to_string(&mut buf)
                    .with_path("<stdin>")?;
                Ok(buf)
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Inline(text) => format!("inline ({} bytes)", text.len()),
            Self::File(path) => format!("file {}", path.display()),
            Self::Stdin => "stdin".to_string(),
        }
    }
}
