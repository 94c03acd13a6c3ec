//! Core data structures for snapshot streams.
//!
//! This module defines the fundamental types used throughout the library:
//! - Header lines and the fragments they introduce
//! - Parsing options
//! - License header information
//! - Verification and statistics reports

use std::collections::BTreeMap;
use std::fmt;
use encoding_rs::Encoding;

use super::comment::CommentStyle;

/// Line terminator found at the end of a header line or separating fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }

    /// Splits a trailing terminator off `bytes`, if there is one.
    pub fn strip(bytes: &[u8]) -> (&[u8], Option<LineEnding>) {
        if let Some(rest) = bytes.strip_suffix(b"\r\n") {
            (rest, Some(LineEnding::CrLf))
        } else if let Some(rest) = bytes.strip_suffix(b"\n") {
            (rest, Some(LineEnding::Lf))
        } else {
            (bytes, None)
        }
    }
}

/// A parsed header line.
///
/// `raw` keeps the line exactly as it appeared (minus its terminator) so a
/// parsed snapshot can be written back byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub path: String,
    pub style: CommentStyle,
    pub raw: Vec<u8>,
    /// `None` only when the header is the last line of the stream.
    pub ending: Option<LineEnding>,
}

/// One path-delimited file within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub marker: Marker,
    /// The file's bytes, exactly as they were before packing.
    pub content: Vec<u8>,
    /// Terminator joining the content to the next header (or ending the stream).
    pub separator: Option<LineEnding>,
    /// Byte offset of the header line in the stream.
    pub offset: u64,
    /// 1-based line number of the header line in the stream.
    pub line: u64,
}

impl Fragment {
    pub fn path(&self) -> &str {
        &self.marker.path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content decoded as UTF-8, with replacement characters for invalid input.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    pub fn line_count(&self) -> u64 {
        crate::snapshot::utils::line_count(&self.content)
    }

    /// Lower-cased extension of the final path component, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.path().rsplit('/').next().unwrap_or_default();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Comment syntax of the file itself, derived from its path.
    pub fn host_style(&self) -> CommentStyle {
        CommentStyle::for_path(self.path())
    }
}

/// Options controlling how a snapshot stream is parsed.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Reject orphan preamble content and conflicting duplicate paths.
    pub strict: bool,
    /// Encoding used to decode paths in header lines.
    pub encoding: &'static Encoding,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: true,
            encoding: encoding_rs::UTF_8,
        }
    }
}

impl ParseOptions {
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }
}

/// A copyright statement found in a license header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Copyright {
    /// Year or year range as written, e.g. `2014 - 2017` or `1999, 2003`.
    pub years: Option<String>,
    pub holder: String,
}

/// License family recognised from a fragment's leading comment block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LicenseKind {
    Apache2,
    Apsl,
    Gpl,
    Lgpl,
    Mpl,
    Php,
    Mit,
    Bsd,
    /// An SPDX identifier with no dedicated variant.
    Spdx(String),
    /// A leading comment exists but no known license text was found.
    Unknown,
    /// The fragment has no leading comment block.
    None,
}

impl fmt::Display for LicenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseKind::Apache2 => write!(f, "Apache-2.0"),
            LicenseKind::Apsl => write!(f, "APSL"),
            LicenseKind::Gpl => write!(f, "GPL"),
            LicenseKind::Lgpl => write!(f, "LGPL"),
            LicenseKind::Mpl => write!(f, "MPL"),
            LicenseKind::Php => write!(f, "PHP"),
            LicenseKind::Mit => write!(f, "MIT"),
            LicenseKind::Bsd => write!(f, "BSD"),
            LicenseKind::Spdx(id) => write!(f, "{}", id),
            LicenseKind::Unknown => write!(f, "unknown"),
            LicenseKind::None => write!(f, "none"),
        }
    }
}

/// License information extracted from the top of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseHeader {
    /// The leading comment block with comment delimiters removed.
    pub text: Option<String>,
    pub copyrights: Vec<Copyright>,
    pub license: LicenseKind,
    pub spdx: Option<String>,
}

/// Result of checking a snapshot's structural properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub fragments: usize,
    pub total_lines: u64,
    pub expected_lines: Option<u64>,
    pub preamble_bytes: usize,
    /// Paths repeated with identical content.
    pub identical_duplicates: Vec<String>,
    /// Paths repeated with differing content.
    pub conflicts: Vec<String>,
    /// Whether re-rendering reproduced the original stream.
    pub roundtrip_ok: bool,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.conflicts.is_empty()
            && self.roundtrip_ok
            && self.preamble_bytes == 0
            && self.expected_lines.is_none_or(|n| n == self.total_lines)
    }
}

/// Fragment and line totals for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub fragments: u64,
    pub lines: u64,
}

impl Tally {
    pub fn add(&mut self, lines: u64) {
        self.fragments += 1;
        self.lines += lines;
    }
}

/// Aggregate counts over a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    pub total: Tally,
    pub by_extension: BTreeMap<String, Tally>,
    pub by_license: BTreeMap<String, Tally>,
    /// Keyed by the first `depth` path components.
    pub by_group: BTreeMap<String, Tally>,
}
