//! Core snapshot reader module.
//!
//! # Module Organization
//!
//! - [`types`]: Errors, data models and host comment syntax
//! - [`format`]: Header lines, streaming scanner and writer
//! - [`license`]: License/copyright header detection
//! - [`document`]: The in-memory [`Snapshot`]
//! - [`reader`]: The file-backed [`SnapshotReader`]

pub mod document;
pub mod format;
pub mod license;
pub mod reader;
pub mod stats;
pub mod types;
pub mod utils;

pub use document::Snapshot;
pub use reader::SnapshotReader;
pub use types::error::{Result, SnapshotError};
