//! License/copyright header detection.
//!
//! Fragments in a snapshot usually open with their upstream project's
//! license block. Detection works in three steps:
//!
//! 1. [`leading_comment`] pulls the first comment block out of the content,
//!    using the host file's comment syntax.
//! 2. [`parse_copyrights`] collects the copyright lines.
//! 3. [`classify`] names the license family.

mod classify;
mod comment;

pub use classify::{classify, parse_copyrights, spdx_identifier};
pub use comment::leading_comment;

use crate::snapshot::types::comment::CommentStyle;
use crate::snapshot::types::models::{Fragment, LicenseHeader, LicenseKind};

impl LicenseHeader {
    /// Detects the license header of a fragment.
    pub fn detect(fragment: &Fragment) -> LicenseHeader {
        Self::from_content(fragment.content(), fragment.host_style())
    }

    /// Detects the license header of raw file content in the given style.
    pub fn from_content(content: &[u8], style: CommentStyle) -> LicenseHeader {
        match leading_comment(content, style) {
            Some(text) => LicenseHeader {
                copyrights: parse_copyrights(&text),
                license: classify(&text),
                spdx: spdx_identifier(&text),
                text: Some(text),
            },
            None => LicenseHeader {
                text: None,
                copyrights: Vec::new(),
                license: LicenseKind::None,
                spdx: None,
            },
        }
    }

    /// Distinct copyright holders, in order of appearance.
    pub fn holders(&self) -> Vec<&str> {
        let mut holders: Vec<&str> = Vec::new();
        for copyright in &self.copyrights {
            if !copyright.holder.is_empty() && !holders.contains(&copyright.holder.as_str()) {
                holders.push(&copyright.holder);
            }
        }
        holders
    }
}
