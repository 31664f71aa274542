use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{RegionError, RegionResult};
use crate::file::operations::{RewriteRequest, WriteMode};
use crate::file::payload::PayloadSource;
use crate::file::region::StartAnchor;

/// One rewrite, as described by a job file and/or command-line flags
///
/// Every field is optional so a partial job file can be completed from the
/// command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// File to rewrite
    pub path: Option<PathBuf>,

    /// Start anchor (regular expression unless `literal_start` is set)
    pub start: Option<String>,

    /// End marker, matched literally
    pub end: Option<String>,

    /// Inline replacement payload
    pub replacement: Option<String>,

    /// File holding the replacement payload; `-` reads stdin
    pub replacement_file: Option<PathBuf>,

    #[serde(default)]
    pub literal_start: Option<bool>,

    #[serde(default)]
    pub atomic: Option<bool>,

    #[serde(default)]
    pub backup: Option<bool>,

    #[serde(default)]
    pub dry_run: Option<bool>,
}

impl JobConfig {
    /// Layer `overrides` on top of `self`, field by field.
    ///
    /// The payload is treated as one field: if the overrides name any
    /// payload source, the job file's payload is dropped entirely.
    pub fn merge(self, overrides: JobConfig) -> JobConfig {
        let (replacement, replacement_file) =
            if overrides.replacement.is_some() || overrides.replacement_file.is_some() {
                (overrides.replacement, overrides.replacement_file)
            } else {
                (self.replacement, self.replacement_file)
            };

        JobConfig {
            path: overrides.path.or(self.path),
            start: overrides.start.or(self.start),
            end: overrides.end.or(self.end),
            replacement,
            replacement_file,
            literal_start: overrides.literal_start.or(self.literal_start),
            atomic: overrides.atomic.or(self.atomic),
            backup: overrides.backup.or(self.backup),
            dry_run: overrides.dry_run.or(self.dry_run),
        }
    }

    /// Where the payload comes from, if exactly one source is configured
    pub fn payload_source(&self) -> RegionResult<PayloadSource> {
        match (&self.replacement, &self.replacement_file) {
            (Some(text), None) => Ok(PayloadSource::Inline(text.clone())),
            (None, Some(path)) => Ok(PayloadSource::from_file_arg(path.clone())),
            (Some(_), Some(_)) => Err(RegionError::config(
                "set either `replacement` or `replacement_file`, not both",
            )),
            (None, None) => Err(RegionError::config(
                "no replacement payload given (`replacement` or `replacement_file`)",
            )),
        }
    }

    /// Validate the job and turn it into a request, loading the payload
    pub fn into_request(self) -> RegionResult<RewriteRequest> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| RegionError::config("no target file given (`path`)"))?;
        let start = self
            .start
            .as_deref()
            .ok_or_else(|| RegionError::config("no start anchor given (`start`)"))?;
        let end = self
            .end
            .clone()
            .ok_or_else(|| RegionError::config("no end marker given (`end`)"))?;
        if end.is_empty() {
            return Err(RegionError::EmptyEndMarker);
        }

        let anchor = if self.literal_start.unwrap_or(false) {
            StartAnchor::literal(start)?
        } else {
            StartAnchor::regex(start)?
        };
        let source = self.payload_source()?;
        debug!("Replacement payload from {}", source.describe());
        let replacement = source.load()?;

        let mut request = RewriteRequest::new(path, anchor, end, replacement);
        if self.atomic.unwrap_or(false) {
            request.write_mode = WriteMode::Atomic;
        }
        request.backup = self.backup.unwrap_or(false);
        request.dry_run = self.dry_run.unwrap_or(false);
        Ok(request)
    }
}
