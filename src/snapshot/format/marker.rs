//! Header line recognition and rendering.
//!
//! # Header Line Grammar
//! ```text
//! [ws] [opener ws] "=== " <path> " ===" [ws closer] [ws]
//! ```
//! `opener` is one of `//`, `#`, `--`, `;`, `%`, `/*`, `<!--`. The block
//! openers require their closers (`*/`, `-->`) and no other style may carry
//! one. Decorative banners like `//===--- Foo.cpp ---===//` never match
//! because the path must be separated from both `===` runs by one space.

use std::sync::OnceLock;
use encoding_rs::Encoding;
use log::trace;
use regex::Regex;

use crate::snapshot::types::comment::CommentStyle;
use crate::snapshot::types::error::{Result, SnapshotError};
use crate::snapshot::types::models::Marker;

static MARKER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn marker_regex() -> &'static Regex {
    MARKER_PATTERN.get_or_init(|| {
        Regex::new(
            r"^[ \t]*(?:(?P<open>//|#|--|;|%|/\*|<!--)[ \t]*)?=== (?P<path>.+?) ===[ \t]*(?P<close>\*/|-->)?[ \t]*$",
        )
        .expect("Invalid header line regex pattern")
    })
}

/// Parses a single line (without its terminator) as a header line.
///
/// Returns `None` for ordinary content lines. The returned marker has no
/// line ending; the caller knows how the line was terminated.
pub fn parse_marker(line: &[u8], encoding: &'static Encoding) -> Option<Marker> {
    // Cheap rejection before decoding; nearly every line is content.
    if !line.windows(4).any(|w| w == b"=== ") {
        return None;
    }
    let (decoded, _, _) = encoding.decode(line);
    let caps = marker_regex().captures(&decoded)?;

    let style = match caps.name("open") {
        Some(open) => CommentStyle::from_opener(open.as_str())?,
        None => CommentStyle::Bare,
    };
    let close = caps.name("close").map(|m| m.as_str());
    if close != style.closer() {
        return None;
    }

    let path = caps.name("path")?.as_str();
    if validate_path(path).is_err() {
        return None;
    }
    trace!("Header line for {} ({:?})", path, style);

    Some(Marker {
        path: path.to_string(),
        style,
        raw: line.to_vec(),
        ending: None,
    })
}

/// Renders the canonical header line for `path` in the given comment style.
pub fn render_marker(path: &str, style: CommentStyle) -> String {
    match (style.opener(), style.closer()) {
        (Some(open), Some(close)) => format!("{} === {} === {}", open, path, close),
        (Some(open), None) => format!("{} === {} ===", open, path),
        _ => format!("=== {} ===", path),
    }
}

/// Checks that a path can be carried in a header line and read back unchanged.
pub fn validate_path(path: &str) -> Result<()> {
    let reason = if path.is_empty() {
        Some("path is empty")
    } else if path.trim() != path {
        Some("path has leading or trailing whitespace")
    } else if path.contains(['\n', '\r']) {
        Some("path contains a line break")
    } else if path.contains("===") {
        Some("path contains '==='")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(SnapshotError::InvalidPath {
            path: path.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
