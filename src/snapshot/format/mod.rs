//! Stream format layer for snapshot files.
//!
//! This module sits between raw bytes and the high-level
//! [`SnapshotReader`](crate::snapshot::reader::SnapshotReader).
//!
//! # Module Organization
//!
//! - [`marker`]: Recognises and renders `=== <path> ===` header lines
//! - [`scanner`]: Streams fragments out of a snapshot, losslessly
//! - [`writer`]: Packs files and directories into a snapshot
//!
//! # Architecture
//!
//! ```text
//! Stream Structure:
//! ┌──────────────────────┐
//! │  Preamble (optional) │ ← scanner::FragmentScanner::preamble()
//! ├──────────────────────┤
//! │  // === a/b.c ===    │ ← marker::parse_marker()
//! │  file bytes          │
//! │  separator           │ ← stripped by the scanner
//! ├──────────────────────┤
//! │  # === Makefile ===  │
//! │  ...                 │
//! └──────────────────────┘
//! ```

pub mod marker;
pub mod scanner;
pub mod writer;
