use std::path::{Path, PathBuf};

/// Expand the tilde in a path to the home directory
pub fn expand_tilde(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    match (path_str.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path_str == "~" => dirs::home_dir().unwrap_or_else(|| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// Resolve `path` against `base` unless it is already absolute
///
/// `~/` is expanded first, so home-relative paths never depend on `base`.
pub fn resolve_against(path: impl AsRef<Path>, base: impl AsRef<Path>) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.as_ref().join(expanded)
    }
}
