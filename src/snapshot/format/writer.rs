//! Snapshot packing.
//!
//! Every file is written as its header line, a newline, the file's bytes and
//! one more newline. The trailing newline is the separator the scanner strips,
//! so contents with or without a final newline survive unchanged. Contents
//! ending in a bare `\r` get a `\r\n` separator instead.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};

use crate::snapshot::format::marker::{parse_marker, render_marker, validate_path};
use crate::snapshot::types::comment::CommentStyle;
use crate::snapshot::types::error::{Result, SnapshotError};
use crate::snapshot::utils;

/// Writes files into a snapshot stream.
pub struct SnapshotWriter<W: Write> {
    inner: W,
    written: HashMap<String, [u8; 16]>,
    count: usize,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            written: HashMap::new(),
            count: 0,
        }
    }

    /// Appends one file.
    ///
    /// Returns `Ok(false)` when the same path was already written with the
    /// same content; nothing is written in that case.
    ///
    /// # Errors
    /// - `InvalidPath` if the path cannot be carried in a header line
    /// - `ConflictingDuplicate` if the path was written with other content
    /// - `EmbeddedMarker` if a content line would be read back as a header
    pub fn append(&mut self, path: &str, content: &[u8]) -> Result<bool> {
        validate_path(path)?;

        let digest = utils::digest(content);
        if let Some(previous) = self.written.get(path) {
            if *previous == digest {
                warn!("Skipping identical duplicate of {}", path);
                return Ok(false);
            }
            return Err(SnapshotError::ConflictingDuplicate {
                path: path.to_string(),
            });
        }

        check_embedded_markers(path, content)?;

        let header = render_marker(path, CommentStyle::for_path(path));
        self.inner.write_all(header.as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.inner.write_all(content)?;
        // A lone trailing '\r' would otherwise merge with "\n" into a CRLF separator.
        let separator: &[u8] = if content.ends_with(b"\r") { b"\r\n" } else { b"\n" };
        self.inner.write_all(separator)?;

        debug!("Packed {} ({} bytes)", path, content.len());
        self.written.insert(path.to_string(), digest);
        self.count += 1;
        Ok(true)
    }

    /// Number of fragments written so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Flushes and returns the inner writer with the number of fragments written.
    pub fn finish(mut self) -> Result<(W, usize)> {
        self.inner.flush()?;
        Ok((self.inner, self.count))
    }
}

fn check_embedded_markers(path: &str, content: &[u8]) -> Result<()> {
    for (idx, line) in content.split(|&b| b == b'\n').enumerate() {
        let text = line.strip_suffix(b"\r").unwrap_or(line);
        if parse_marker(text, encoding_rs::UTF_8).is_some() {
            return Err(SnapshotError::EmbeddedMarker {
                path: path.to_string(),
                line: idx as u64 + 1,
            });
        }
    }
    Ok(())
}

/// Packs every regular file below `root` into `writer`.
///
/// Paths are written relative to `root` with `/` separators, in sorted
/// order. Symbolic links are not followed. Entries whose name starts with
/// `.` are skipped unless `include_hidden` is set. `exclude` names a file
/// that is never packed, typically the snapshot being written when it lies
/// inside `root`.
pub fn pack_directory<W: Write>(
    root: &Path,
    writer: &mut SnapshotWriter<W>,
    include_hidden: bool,
    exclude: Option<&Path>,
) -> Result<usize> {
    info!("Packing directory: {}", root.display());
    // A path that does not exist yet cannot be inside the tree.
    let exclude = exclude.and_then(|path| fs::canonicalize(path).ok());
    let mut files = Vec::new();
    collect_files(root, root, include_hidden, exclude.as_deref(), &mut files)?;
    files.sort();

    let mut packed = 0;
    for (relative, full) in files {
        let content = fs::read(&full)?;
        if writer.append(&relative, &content)? {
            packed += 1;
        }
    }
    info!("Packed {} files from {}", packed, root.display());
    Ok(packed)
}

fn collect_files(
    root: &Path,
    dir: &Path,
    include_hidden: bool,
    exclude: Option<&Path>,
    out: &mut Vec<(String, PathBuf)>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !include_hidden && name.to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry.file_type()?;
        let full = entry.path();
        if file_type.is_dir() {
            collect_files(root, &full, include_hidden, exclude, out)?;
        } else if file_type.is_file() {
            if is_excluded(&full, exclude) {
                debug!("Skipping output file {}", full.display());
                continue;
            }
            out.push((relative_path(root, &full)?, full));
        }
    }
    Ok(())
}

fn is_excluded(full: &Path, exclude: Option<&Path>) -> bool {
    exclude.is_some_and(|skip| {
        skip.file_name() == full.file_name()
            && fs::canonicalize(full).is_ok_and(|resolved| resolved == skip)
    })
}

fn relative_path(root: &Path, full: &Path) -> Result<String> {
    let relative = full.strip_prefix(root).unwrap_or(full);
    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| SnapshotError::InvalidPath {
            path: relative.to_string_lossy().into_owned(),
            reason: "path is not valid UTF-8",
        })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}
