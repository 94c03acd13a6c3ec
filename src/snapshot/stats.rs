//! Aggregate counts over a snapshot.

use log::debug;

use super::document::Snapshot;
use super::types::models::{LicenseHeader, SnapshotStats};

/// Key used for fragments without an extension.
const NO_EXTENSION: &str = "(none)";

/// Tallies fragments and lines by extension, license family and path group.
///
/// The group key is the first `depth` components of the path; shallower
/// paths use their directory (or the file name at the top level).
pub fn collect(snapshot: &Snapshot, depth: usize) -> SnapshotStats {
    let mut stats = SnapshotStats::default();
    for fragment in snapshot {
        let lines = fragment.line_count();
        stats.total.add(lines);

        let extension = fragment.extension().unwrap_or_else(|| NO_EXTENSION.to_string());
        stats.by_extension.entry(extension).or_default().add(lines);

        let license = LicenseHeader::detect(fragment).license.to_string();
        stats.by_license.entry(license).or_default().add(lines);

        stats
            .by_group
            .entry(group_key(fragment.path(), depth))
            .or_default()
            .add(lines);
    }
    debug!(
        "Stats: {} extensions, {} license families, {} groups",
        stats.by_extension.len(),
        stats.by_license.len(),
        stats.by_group.len()
    );
    stats
}

fn group_key(path: &str, depth: usize) -> String {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let dirs = parts.len().saturating_sub(1).max(1);
    parts[..depth.max(1).min(dirs).min(parts.len())].join("/")
}
