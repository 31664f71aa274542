use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{with_file_context, ErrorExt, RegionError, RegionResult};

/// Read a file's contents as string
pub fn read_file_to_string(path: impl AsRef<Path>) -> RegionResult<String> {
    let path = path.as_ref();
    debug!("Reading file: {}", path.display());

    fs::read_to_string(path).with_path(path)
}

/// Overwrite a file in place, then verify what landed on disk
pub fn write_file_sync(path: impl AsRef<Path>, content: &str) -> RegionResult<()> {
    let path = path.as_ref();
    debug!("Writing to file in place: {}", path.display());

    {
        let mut file = fs::File::create(path).with_path(path)?;
        file.write_all(content.as_bytes()).with_path(path)?;
        file.flush().with_path(path)?;
    }

    let hash_after = calculate_file_hash(path)?;
    let expected_hash = calculate_string_hash(content);
    if hash_after != expected_hash {
        warn!(
            "File hash after write doesn't match expected: {}",
            path.display()
        );
        return Err(RegionError::VerificationFailed {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Write into a temporary file next to `path` and rename it over `path`
///
/// Keeps the permissions of the file being replaced. A symlinked `path` is
/// resolved first so the link survives and its target gets the content.
pub fn write_file_atomic(path: impl AsRef<Path>, content: &str) -> RegionResult<()> {
    let target = resolve_write_target(path.as_ref())?;
    let path = target.as_path();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    debug!(
        "Writing to file atomically: {} (temp dir {})",
        path.display(),
        dir.display()
    );

    let mut temp = tempfile::NamedTempFile::new_in(dir).with_path(dir)?;
    temp.write_all(content.as_bytes()).with_path(temp.path())?;
    temp.as_file().sync_all().with_path(temp.path())?;

    if let Ok(metadata) = fs::metadata(path) {
        with_file_context(
            || fs::set_permissions(temp.path(), metadata.permissions()),
            temp.path(),
        )?;
    }

    temp.persist(path)
        .map_err(|e| RegionError::io_error(e.error, Some(path)))?;
    Ok(())
}

fn resolve_write_target(path: &Path) -> RegionResult<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            let target = fs::canonicalize(path).with_path(path)?;
            debug!("{} is a symlink to {}", path.display(), target.display());
            Ok(target)
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Copy `path` to `<path>.<timestamp>.bak` and return the backup location
pub fn backup_file(path: impl AsRef<Path>) -> RegionResult<PathBuf> {
    let path = path.as_ref();
    let backup = backup_path(path, &chrono::Local::now().format("%Y%m%d%H%M%S").to_string());

    debug!("Backing up {} to {}", path.display(), backup.display());
    fs::copy(path, &backup).with_path(&backup)?;
    Ok(backup)
}

fn backup_path(path: &Path, stamp: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.bak", stamp));
    path.with_file_name(name)
}

/// Calculate a hash for file content
pub fn calculate_file_hash(path: impl AsRef<Path>) -> RegionResult<String> {
    let path = path.as_ref();
    let content = fs::read(path).with_path(path)?;

    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Calculate a hash for a string
pub fn calculate_string_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
