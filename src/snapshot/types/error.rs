//! Custom error types for the snapshot-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// A fragment path cannot be written as a header line.
    #[error("Invalid fragment path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// A fragment path would escape the extraction directory.
    #[error("Refusing to extract unsafe path: {0}")]
    UnsafePath(String),

    /// The same path appears twice with different content.
    #[error("Path {path} appears more than once with different content")]
    ConflictingDuplicate { path: String },

    /// Non-blank bytes were found before the first header line.
    #[error("Found {bytes} bytes of content before the first header line")]
    OrphanContent { bytes: usize },

    /// A requested fragment does not exist in the snapshot.
    #[error("No fragment with path: {0}")]
    NotFound(String),

    /// The sum of fragment line counts differs from the expected total.
    #[error("Line count mismatch: expected {expected} lines, but found {found}")]
    LineCountMismatch { expected: u64, found: u64 },

    /// A file's content contains a line that would be read back as a header.
    #[error("Content of {path} contains a header line at line {line}")]
    EmbeddedMarker { path: String, line: u64 },

    /// The requested text encoding label is not known or cannot decode header lines.
    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),
}

/// A convenience `Result` type alias using the crate's `SnapshotError` type.
pub type Result<T> = std::result::Result<T, SnapshotError>;
