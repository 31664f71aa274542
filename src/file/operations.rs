use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::diff::{summarize_changes, unified_diff, ChangeSummary};
use crate::error::RegionResult;
use crate::file::region::{locate_region_with, splice, Region, StartAnchor};
use crate::utils::fs::{backup_file, read_file_to_string, write_file_atomic, write_file_sync};

/// How the rewritten document reaches the disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Overwrite in place, then verify the written bytes
    #[default]
    Direct,
    /// Write a sibling temp file and rename it over the target
    Atomic,
}

/// Everything needed to rewrite one file
#[derive(Debug, Clone)]
pub struct RewriteRequest {
    pub path: PathBuf,
    pub anchor: StartAnchor,
    pub end_marker: String,
    pub replacement: String,
    pub write_mode: WriteMode,
    pub backup: bool,
    pub dry_run: bool,
    pub skip_if_unchanged: bool,
}

impl RewriteRequest {
    pub fn new(
        path: impl Into<PathBuf>,
        anchor: StartAnchor,
        end_marker: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            anchor,
            end_marker: end_marker.into(),
            replacement: replacement.into(),
            write_mode: WriteMode::Direct,
            backup: false,
            dry_run: false,
            skip_if_unchanged: true,
        }
    }
}

/// Report of a rewrite, whether or not it touched the disk
#[derive(Debug, Clone, Serialize)]
pub struct ReplacementOutcome {
    pub path: PathBuf,
    pub region: Region,
    pub bytes_before: usize,
    pub bytes_after: usize,
    pub changed: bool,
    pub written: bool,
    pub write_mode: WriteMode,
    pub backup: Option<PathBuf>,
    pub summary: ChangeSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Read the file, replace its region and write it back.
///
/// The whole result is assembled in memory before anything is written, so
/// a missing start anchor or end marker leaves the file untouched.
pub fn rewrite_file(request: &RewriteRequest) -> RegionResult<ReplacementOutcome> {
    let path = request.path.as_path();
    let original = read_file_to_string(path)?;

    let region = locate_region_with(&original, &request.anchor, &request.end_marker)?;
    info!(
        "Located region in {} at lines {}-{} ({} bytes)",
        path.display(),
        region.start_line,
        region.end_line,
        region.range.len()
    );

    let rewritten = splice(&original, &region, &request.replacement);
    let changed = rewritten != original;
    let summary = summarize_changes(&original, &rewritten);

    let mut outcome = ReplacementOutcome {
        path: path.to_path_buf(),
        region,
        bytes_before: original.len(),
        bytes_after: rewritten.len(),
        changed,
        written: false,
        write_mode: request.write_mode,
        backup: None,
        summary,
        diff: None,
    };

    if request.dry_run {
        debug!("Dry run, leaving {} untouched", path.display());
        outcome.diff = Some(unified_diff(path, &original, &rewritten));
        return Ok(outcome);
    }

    if !changed && request.skip_if_unchanged {
        warn!(
            "Replacement is identical to the current region, not writing {}",
            path.display()
        );
        return Ok(outcome);
    }

    if request.backup {
        outcome.backup = Some(backup_file(path)?);
    }

    write_document(path, &rewritten, request.write_mode)?;
    outcome.written = true;
    info!(
        "Wrote {} ({} -> {} bytes, {})",
        path.display(),
        outcome.bytes_before,
        outcome.bytes_after,
        outcome.summary
    );

    Ok(outcome)
}

fn write_document(path: &Path, content: &str, mode: WriteMode) -> RegionResult<()> {
    match mode {
        WriteMode::Direct => write_file_sync(path, content),
        WriteMode::Atomic => write_file_atomic(path, content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegionError;
    use std::fs;
    use tempfile::tempdir;

    fn request(path: &Path, replacement: &str) -> RewriteRequest {
        RewriteRequest::new(
            path,
            StartAnchor::literal("<form>").unwrap(),
            "</form>",
            replacement,
        )
    }

    #[test]
    fn test_rewrites_file_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.tsx");
        fs::write(&path, "A<form>X</form>B").unwrap();

        let outcome = rewrite_file(&request(&path, "<form>Y</form>")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "A<form>Y</form>B");
        assert!(outcome.written);
        assert!(outcome.changed);
        assert_eq!(outcome.region.range, 1..15);
        assert_eq!(outcome.write_mode, WriteMode::Direct);
    }

    #[test]
    fn test_missing_end_leaves_file_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.tsx");
        fs::write(&path, "A<form>X").unwrap();

        let err = rewrite_file(&request(&path, "<form>Y</form>")).unwrap_err();

        assert!(matches!(err, RegionError::EndNotFound { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "A<form>X");
    }

    #[test]
    fn test_missing_start_leaves_file_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.tsx");
        fs::write(&path, "AXB").unwrap();

        let err = rewrite_file(&request(&path, "<form>Y</form>")).unwrap_err();

        match err {
            RegionError::StartNotFound { pattern } => assert_eq!(pattern, "<form>"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "AXB");
    }

    #[test]
    fn test_dry_run_reports_diff_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.tsx");
        fs::write(&path, "head\n<form>\nold\n</form>\ntail\n").unwrap();

        let mut req = request(&path, "<form>\nnew\n</form>");
        req.dry_run = true;
        let outcome = rewrite_file(&req).unwrap();

        assert!(!outcome.written);
        assert!(outcome.changed);
        let diff = outcome.diff.unwrap();
        assert!(diff.contains("-old"));
        assert!(diff.contains("+new"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "head\n<form>\nold\n</form>\ntail\n"
        );
    }

    #[test]
    fn test_atomic_write_with_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.tsx");
        fs::write(&path, "A<form>X</form>B").unwrap();

        let mut req = request(&path, "<form>Y</form>");
        req.write_mode = WriteMode::Atomic;
        req.backup = true;
        let outcome = rewrite_file(&req).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "A<form>Y</form>B");
        let backup = outcome.backup.unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "A<form>X</form>B");
    }

    #[test]
    fn test_unchanged_region_is_not_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.tsx");
        fs::write(&path, "A<form>X</form>B").unwrap();

        let mut req = request(&path, "<form>X</form>");
        req.backup = true;
        let outcome = rewrite_file(&req).unwrap();

        assert!(!outcome.changed);
        assert!(!outcome.written);
        assert!(outcome.backup.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.tsx");
        let err = rewrite_file(&request(&path, "x")).unwrap_err();
        assert!(matches!(err, RegionError::Io { .. }));
    }
}
