use regex::Regex;
use std::fmt;
use std::ops::Range;
use tracing::debug;

use crate::error::{RegionError, RegionResult};

/// Pattern marking the beginning of the region to replace
///
/// Both forms compile to a regular expression; a literal anchor is escaped
/// first so it matches its exact text.
#[derive(Debug, Clone)]
pub struct StartAnchor {
    source: String,
    regex: Regex,
}

impl StartAnchor {
    /// Build an anchor from a regular expression
    pub fn regex(pattern: &str) -> RegionResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| RegionError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Build an anchor that matches `text` literally
    pub fn literal(text: &str) -> RegionResult<Self> {
        let regex = Regex::new(&regex::escape(text)).map_err(|e| RegionError::InvalidPattern {
            pattern: text.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            source: text.to_string(),
            regex,
        })
    }

    /// The pattern as the caller supplied it
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Display for StartAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// A located region, inclusive of the start match and the end marker
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Region {
    /// Byte range of the region within the document
    pub range: Range<usize>,
    /// 1-based line of the first byte of the region
    pub start_line: usize,
    /// 1-based line of the last byte of the region
    pub end_line: usize,
}

impl Region {
    /// The text of the region within `document`
    pub fn slice<'a>(&self, document: &'a str) -> &'a str {
        &document[self.range.clone()]
    }
}

/// Locate the region bounded by the first match of `start_pattern` and the
/// first occurrence of `end_marker` at or after that match's start offset.
///
/// The marker search never looks before the start match, so a marker that
/// appears earlier in the document cannot truncate the region.
pub fn locate_region(
    document: &str,
    start_pattern: &Regex,
    end_marker: &str,
) -> RegionResult<Region> {
    if end_marker.is_empty() {
        return Err(RegionError::EmptyEndMarker);
    }

    let start_match = start_pattern
        .find(document)
        .ok_or_else(|| RegionError::start_not_found(start_pattern.as_str()))?;
    let start = start_match.start();
    debug!(
        "Start anchor matched at bytes {}..{}",
        start,
        start_match.end()
    );

    let end = document[start..]
        .find(end_marker)
        .map(|offset| start + offset + end_marker.len())
        .ok_or_else(|| RegionError::end_not_found(end_marker, start))?;
    debug!("End marker found, region spans bytes {}..{}", start, end);

    Ok(Region {
        range: start..end,
        start_line: line_of(document, start),
        end_line: line_of(document, end - 1),
    })
}

/// Replace the located region with `replacement`, verbatim.
///
/// Text before and after the region is preserved byte for byte. The
/// replacement is never interpreted, so `$1`-style references stay literal.
pub fn replace_region(
    document: &str,
    start_pattern: &Regex,
    end_marker: &str,
    replacement: &str,
) -> RegionResult<String> {
    let region = locate_region(document, start_pattern, end_marker)?;
    Ok(splice(document, &region, replacement))
}

/// Same as [`locate_region`] but takes a [`StartAnchor`]
///
/// A missing anchor is reported as the caller wrote it, not in its escaped
/// form.
pub fn locate_region_with(
    document: &str,
    anchor: &StartAnchor,
    end_marker: &str,
) -> RegionResult<Region> {
    locate_region(document, anchor.as_regex(), end_marker).map_err(|e| match e {
        RegionError::StartNotFound { .. } => RegionError::start_not_found(anchor.source()),
        other => other,
    })
}

/// Same as [`replace_region`] but takes a [`StartAnchor`]
pub fn replace_region_with(
    document: &str,
    anchor: &StartAnchor,
    end_marker: &str,
    replacement: &str,
) -> RegionResult<String> {
    let region = locate_region_with(document, anchor, end_marker)?;
    Ok(splice(document, &region, replacement))
}

/// Assemble prefix + replacement + suffix around an already located region
pub fn splice(document: &str, region: &Region, replacement: &str) -> String {
    let prefix = &document[..region.range.start];
    let suffix = &document[region.range.end..];

    let mut result = String::with_capacity(prefix.len() + replacement.len() + suffix.len());
    result.push_str(prefix);
    result.push_str(replacement);
    result.push_str(suffix);
    result
}

fn line_of(document: &str, offset: usize) -> usize {
    document.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
