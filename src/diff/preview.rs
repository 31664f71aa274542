use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Line counts of a rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub lines_removed: usize,
    pub lines_added: usize,
}

impl ChangeSummary {
    pub fn is_empty(&self) -> bool {
        self.lines_removed == 0 && self.lines_added == 0
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{} +{} lines", self.lines_removed, self.lines_added)
    }
}

/// Count removed and added lines between two versions
pub fn summarize_changes(old: &str, new: &str) -> ChangeSummary {
    let diff = TextDiff::from_lines(old, new);
    let mut summary = ChangeSummary::default();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => summary.lines_removed += 1,
            ChangeTag::Insert => summary.lines_added += 1,
            ChangeTag::Equal => {}
        }
    }

    summary
}

/// Render a unified diff with three lines of context
///
/// Headers follow git's `a/` and `b/` form; an absolute path loses its root
/// so the header never reads `a//...`.
pub fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    let display = header_path(path).display().to_string();
    let diff = TextDiff::from_lines(old, new);
    diff.unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", display), &format!("b/{}", display))
        .to_string()
}

fn header_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect()
}
