use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};
use log::{debug, info};

use super::document::Snapshot;
use super::format::scanner::FragmentScanner;
use super::stats;
use super::types::error::{Result, SnapshotError};
use super::types::models::{Fragment, LicenseHeader, ParseOptions, SnapshotStats, VerifyReport};
use super::utils;

/// The main reader for snapshot files.
///
/// Loads a whole snapshot, indexes its fragments by path and offers
/// lookup, verification, license inspection and extraction.
#[derive(Debug)]
pub struct SnapshotReader {
    snapshot: Snapshot,
    /// Path → index of its first occurrence.
    index: HashMap<String, usize>,
    source_len: u64,
    source_checksum: u32,
}

impl SnapshotReader {
    /// Reads a snapshot file from the given path.
    ///
    /// # Errors
    /// Returns an error if:
    /// - File cannot be read
    /// - In strict mode, content precedes the first header line
    /// - In strict mode, a path repeats with different content
    pub fn open(path: impl AsRef<Path>, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening snapshot: {}", path.display());
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes, options)
    }

    /// Builds a reader over a snapshot already in memory.
    pub fn from_bytes(bytes: &[u8], options: ParseOptions) -> Result<Self> {
        let snapshot = Snapshot::parse(bytes, &options)?;
        let mut index = HashMap::with_capacity(snapshot.len());
        for (i, fragment) in snapshot.fragments.iter().enumerate() {
            index.entry(fragment.path().to_string()).or_insert(i);
        }
        Ok(Self {
            snapshot,
            index,
            source_len: bytes.len() as u64,
            source_checksum: utils::checksum(bytes),
        })
    }

    /// Opens a snapshot file for streaming, without loading it whole.
    ///
    /// No strict checks are applied; see [`Snapshot::verify`] for those.
    pub fn stream(
        path: impl AsRef<Path>,
        options: ParseOptions,
    ) -> Result<FragmentScanner<BufReader<File>>> {
        let file = File::open(path.as_ref())?;
        Ok(FragmentScanner::new(BufReader::new(file), options))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Returns the number of fragments, repeats included.
    pub fn num_fragments(&self) -> usize {
        self.snapshot.len()
    }

    /// Returns the total line count across all fragments.
    pub fn total_lines(&self) -> u64 {
        self.snapshot.total_lines()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.snapshot.iter()
    }

    /// Looks a fragment up by path; the first occurrence wins.
    pub fn fragment(&self, path: &str) -> Result<&Fragment> {
        self.index
            .get(path)
            .map(|&i| &self.snapshot.fragments[i])
            .ok_or_else(|| SnapshotError::NotFound(path.to_string()))
    }

    /// Checks the snapshot, including that re-rendering reproduces the source bytes.
    pub fn verify(&self, expect_lines: Option<u64>) -> VerifyReport {
        let mut report = self.snapshot.verify(expect_lines);
        let rendered = self.snapshot.to_bytes();
        let identical = rendered.len() as u64 == self.source_len
            && utils::checksum(&rendered) == self.source_checksum;
        debug!("Re-rendered stream identical to source: {}", identical);
        report.roundtrip_ok &= identical;
        report
    }

    /// Like [`verify`](Self::verify), but fails on the first violated property.
    pub fn check(&self, expect_lines: Option<u64>) -> Result<VerifyReport> {
        let report = self.verify(expect_lines);
        if let Some(path) = report.conflicts.first() {
            return Err(SnapshotError::ConflictingDuplicate { path: path.clone() });
        }
        if report.preamble_bytes > 0 {
            return Err(SnapshotError::OrphanContent {
                bytes: report.preamble_bytes,
            });
        }
        if let Some(expected) = expect_lines
            && expected != report.total_lines
        {
            return Err(SnapshotError::LineCountMismatch {
                expected,
                found: report.total_lines,
            });
        }
        Ok(report)
    }

    /// License header of every fragment, in stream order.
    pub fn licenses(&self) -> Vec<(&str, LicenseHeader)> {
        self.snapshot
            .iter()
            .map(|f| (f.path(), LicenseHeader::detect(f)))
            .collect()
    }

    /// Tallies by extension, license and the first `depth` path components.
    pub fn stats(&self, depth: usize) -> SnapshotStats {
        stats::collect(&self.snapshot, depth)
    }

    /// Writes fragments below `dir`.
    ///
    /// With an empty `only`, every distinct path is written (first occurrence
    /// wins); otherwise only the listed paths, each of which must exist.
    /// Returns the number of files written.
    ///
    /// # Errors
    /// - `UnsafePath` for absolute paths or paths containing `..`
    /// - `NotFound` for a requested path missing from the snapshot
    pub fn extract_to(&self, dir: impl AsRef<Path>, only: &[String]) -> Result<usize> {
        let dir = dir.as_ref();
        let selected: Vec<&Fragment> = if only.is_empty() {
            self.snapshot
                .iter()
                .enumerate()
                .filter(|(i, f)| self.index.get(f.path()) == Some(i))
                .map(|(_, f)| f)
                .collect()
        } else {
            only.iter()
                .map(|p| self.fragment(p))
                .collect::<Result<Vec<_>>>()?
        };

        // Validate everything before touching the filesystem.
        let targets = selected
            .iter()
            .map(|f| Ok::<_, SnapshotError>((safe_join(dir, f.path())?, *f)))
            .collect::<Result<Vec<_>>>()?;

        for (target, fragment) in &targets {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, fragment.content())?;
            debug!("Extracted {} -> {}", fragment.path(), target.display());
        }
        info!("Extracted {} files to {}", targets.len(), dir.display());
        Ok(targets.len())
    }
}

/// Joins a fragment path onto `dir`, refusing anything that could escape it.
fn safe_join(dir: &Path, path: &str) -> Result<PathBuf> {
    let mut target = dir.to_path_buf();
    let mut pushed = false;
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => {
                target.push(part);
                pushed = true;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(SnapshotError::UnsafePath(path.to_string()));
            }
        }
    }
    if !pushed {
        return Err(SnapshotError::UnsafePath(path.to_string()));
    }
    Ok(target)
}
