//! In-memory snapshot: the ordered list of fragments plus any preamble.

use std::collections::HashMap;
use std::io::BufRead;
use log::{info, warn};

use super::format::scanner::FragmentScanner;
use super::types::error::{Result, SnapshotError};
use super::types::models::{Fragment, ParseOptions, VerifyReport};

/// A fully parsed snapshot stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Bytes before the first header line.
    pub preamble: Vec<u8>,
    pub fragments: Vec<Fragment>,
}

impl Snapshot {
    /// Parses a complete snapshot held in memory.
    ///
    /// # Errors
    /// In strict mode:
    /// - `OrphanContent` if non-blank bytes precede the first header line
    /// - `ConflictingDuplicate` if a path repeats with different content
    pub fn parse(bytes: &[u8], options: &ParseOptions) -> Result<Self> {
        Self::from_reader(bytes, options)
    }

    /// Parses a snapshot from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R, options: &ParseOptions) -> Result<Self> {
        let mut scanner = FragmentScanner::new(reader, *options);
        let fragments = scanner.by_ref().collect::<Result<Vec<_>>>()?;
        let snapshot = Self {
            preamble: scanner.into_preamble(),
            fragments,
        };

        if !snapshot.preamble.iter().all(u8::is_ascii_whitespace) {
            if options.strict {
                return Err(SnapshotError::OrphanContent {
                    bytes: snapshot.preamble.len(),
                });
            }
            warn!("Keeping {} bytes of content before the first header line", snapshot.preamble.len());
        }

        let (_, conflicts) = snapshot.duplicates();
        if let Some(path) = conflicts.into_iter().next() {
            if options.strict {
                return Err(SnapshotError::ConflictingDuplicate { path });
            }
            warn!("Path {} repeats with different content", path);
        }

        info!(
            "Snapshot parsed: {} fragments, {} lines",
            snapshot.fragments.len(),
            snapshot.total_lines()
        );
        Ok(snapshot)
    }

    /// Re-joins preamble, header lines, contents and separators.
    ///
    /// For a parsed snapshot this reproduces the input byte for byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.preamble.clone();
        for fragment in &self.fragments {
            out.extend_from_slice(&fragment.marker.raw);
            if let Some(ending) = fragment.marker.ending {
                out.extend_from_slice(ending.as_bytes());
            }
            out.extend_from_slice(&fragment.content);
            if let Some(separator) = fragment.separator {
                out.extend_from_slice(separator.as_bytes());
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// First fragment with the given path.
    pub fn get(&self, path: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.path() == path)
    }

    /// Paths in stream order, repeats included.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(Fragment::path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    /// Sum of the line counts of all fragments.
    pub fn total_lines(&self) -> u64 {
        self.fragments.iter().map(Fragment::line_count).sum()
    }

    /// Repeated paths, split into `(identical, conflicting)`, each in first-seen order.
    pub fn duplicates(&self) -> (Vec<String>, Vec<String>) {
        let mut first: HashMap<&str, &[u8]> = HashMap::new();
        let mut identical = Vec::new();
        let mut conflicting = Vec::new();
        for fragment in &self.fragments {
            match first.get(fragment.path()) {
                None => {
                    first.insert(fragment.path(), fragment.content());
                }
                Some(content) => {
                    let bucket = if *content == fragment.content() {
                        &mut identical
                    } else {
                        &mut conflicting
                    };
                    if !bucket.iter().any(|p: &String| p == fragment.path()) {
                        bucket.push(fragment.path().to_string());
                    }
                }
            }
        }
        (identical, conflicting)
    }

    /// Checks the structural properties of the stream.
    ///
    /// The round-trip check re-renders the snapshot, parses the result again
    /// and requires the same `(path, content)` records in the same order.
    pub fn verify(&self, expect_lines: Option<u64>) -> VerifyReport {
        let (identical_duplicates, conflicts) = self.duplicates();
        let rendered = self.to_bytes();
        let roundtrip_ok = match Snapshot::parse(&rendered, &ParseOptions::lenient()) {
            Ok(reparsed) => {
                reparsed.preamble == self.preamble
                    && reparsed.fragments.len() == self.fragments.len()
                    && reparsed
                        .fragments
                        .iter()
                        .zip(&self.fragments)
                        .all(|(a, b)| a.path() == b.path() && a.content == b.content)
            }
            Err(_) => false,
        };
        let preamble_bytes = if self.preamble.iter().all(u8::is_ascii_whitespace) {
            0
        } else {
            self.preamble.len()
        };

        VerifyReport {
            fragments: self.fragments.len(),
            total_lines: self.total_lines(),
            expected_lines: expect_lines,
            preamble_bytes,
            identical_duplicates,
            conflicts,
            roundtrip_ok,
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}
