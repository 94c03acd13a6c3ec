//! # snapshot-reader
//!
//! A reader for source snapshots: plain-text streams of concatenated files,
//! each introduced by a `=== <path> ===` header line written in the host
//! file's comment syntax (`// === a/b.c ===`, `# === Makefile ===`, ...).
//!
//! Parsing is lossless: a parsed snapshot renders back to the same bytes.
//! Each fragment's leading license/copyright comment can be inspected.
pub mod snapshot;

// Re-export the main types for convenience
pub use snapshot::{
    Snapshot,
    SnapshotReader,
    format::{
        marker::{parse_marker, render_marker},
        scanner::FragmentScanner,
        writer::{SnapshotWriter, pack_directory},
    },
    types::{
        comment::CommentStyle,
        error::{Result, SnapshotError},
        models::{
            Copyright,
            Fragment,
            LicenseHeader,
            LicenseKind,
            LineEnding,
            Marker,
            ParseOptions,
            SnapshotStats,
            Tally,
            VerifyReport,
        },
    },
};
