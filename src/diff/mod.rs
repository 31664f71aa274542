pub mod preview;

pub use preview::{summarize_changes, unified_diff, ChangeSummary};
