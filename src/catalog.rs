use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};
use crate::kind::MediaKind;
use crate::normalize;

/// No-filter sentinel: the client sends `char=a` when it wants everything.
/// The check is case-sensitive; `char=A` is a real substring filter.
pub const NO_FILTER: &str = "a";

/// One display-ready listing row. Equality and ordering are over the
/// `(display_name, size_bytes)` pair: two entries that compare equal are
/// duplicates no matter which raw files produced them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CatalogEntry {
    pub display_name: String,
    pub size_bytes: u64,
}

/// Raw directory hit. Lives only inside the builder and resolver; never
/// crosses the response boundary.
#[derive(Debug, Clone)]
pub struct RawFileRecord {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Enumerates regular files of the given kind, sorted by raw filename.
///
/// Per-entry stat failures are skipped rather than fatal; only a missing
/// directory or a failed enumeration aborts the scan. The sorted order makes
/// the dedup tie-break (first raw filename wins) deterministic for a fixed
/// directory snapshot.
pub fn scan_raw_files(dir: &Path, kind: MediaKind) -> Result<Vec<RawFileRecord>> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "serve directory not found");
        return Err(CatalogError::DirectoryUnavailable);
    }

    let mut records = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skip: unreadable directory entry");
                continue;
            }
        };
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !kind.matches(&file_name) {
            debug!(file = %file_name, "skip: no matching extension");
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                debug!(file = %file_name, error = %e, "skip: could not stat");
                continue;
            }
        };
        if !metadata.is_file() {
            debug!(file = %file_name, "skip: not a regular file");
            continue;
        }
        debug!(file = %file_name, size = metadata.len(), "match");
        records.push(RawFileRecord {
            path: entry.path(),
            size_bytes: metadata.len(),
            file_name,
        });
    }

    records.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(records)
}

/// Builds the ordered, deduplicated catalog for one request. Rebuilt from
/// the directory every time; nothing is cached across requests.
pub fn build_catalog(dir: &Path, kind: MediaKind, filter: &str) -> Result<Vec<CatalogEntry>> {
    info!(%kind, filter, dir = %dir.display(), "building catalog");
    let raw = scan_raw_files(dir, kind)?;

    let filtering = filter != NO_FILTER;
    let needle = filter.to_lowercase();
    let mut entries: Vec<CatalogEntry> = Vec::new();
    for record in &raw {
        let display_name = normalize::display_name(&record.file_name);
        if filtering && !display_name.to_lowercase().contains(&needle) {
            debug!(name = %display_name, filter, "filtered out");
            continue;
        }
        let entry = CatalogEntry {
            display_name,
            size_bytes: record.size_bytes,
        };
        // Raw scan order is lexicographic, so the first raw file to produce
        // a given (name, size) pair is the survivor.
        if entries.contains(&entry) {
            debug!(name = %entry.display_name, size = entry.size_bytes, "duplicate dropped");
            continue;
        }
        debug!(name = %entry.display_name, size = entry.size_bytes, "added");
        entries.push(entry);
    }

    entries.sort();
    info!(count = entries.len(), "catalog built");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, len: usize) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(&vec![0u8; len]).unwrap();
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let err = build_catalog(Path::new("/no/such/dir"), MediaKind::Rom, NO_FILTER).unwrap_err();
        assert!(matches!(err, CatalogError::DirectoryUnavailable));
    }

    #[test]
    fn test_only_matching_extensions_and_files_survive() {
        let tmp = tempdir().unwrap();
        write_file(tmp.path(), "keep.rom", 4);
        write_file(tmp.path(), "keep2.ROM", 4);
        write_file(tmp.path(), "other.dsk", 4);
        write_file(tmp.path(), "notes.txt", 4);
        fs::create_dir(tmp.path().join("sub.rom")).unwrap();

        let entries = build_catalog(tmp.path(), MediaKind::Rom, NO_FILTER).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["keep", "keep2"]);
    }

    #[test]
    fn test_sorted_and_duplicate_free() {
        let tmp = tempdir().unwrap();
        // Both normalize to ("Game [5401]", 8).
        write_file(tmp.path(), "Game [original] [5401].rom", 8);
        write_file(tmp.path(), "Game [5401].ROM", 8);
        write_file(tmp.path(), "Aardvark.rom", 3);

        let entries = build_catalog(tmp.path(), MediaKind::Rom, NO_FILTER).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].display_name, "Aardvark");
        assert_eq!(entries[1].display_name, "Game [5401]");
        for pair in entries.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_same_name_different_size_is_not_a_duplicate() {
        let tmp = tempdir().unwrap();
        write_file(tmp.path(), "Game.rom", 8);
        write_file(tmp.path(), "Game.ROM", 9);

        let entries = build_catalog(tmp.path(), MediaKind::Rom, NO_FILTER).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].size_bytes, 8);
        assert_eq!(entries[1].size_bytes, 9);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let tmp = tempdir().unwrap();
        write_file(tmp.path(), "Metal Gear.rom", 5);
        write_file(tmp.path(), "Gradius.rom", 5);

        let entries = build_catalog(tmp.path(), MediaKind::Rom, "gEaR").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "Metal Gear");
    }

    #[test]
    fn test_sentinel_filter_returns_everything() {
        let tmp = tempdir().unwrap();
        write_file(tmp.path(), "Metal Gear.rom", 5);
        write_file(tmp.path(), "Gradius.rom", 5);

        // "a" is the sentinel even though neither name would need to
        // contain the letter.
        let entries = build_catalog(tmp.path(), MediaKind::Rom, NO_FILTER).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_capital_sorts_before_lowercase() {
        let tmp = tempdir().unwrap();
        write_file(tmp.path(), "b.ROM", 20);
        write_file(tmp.path(), "A [original].rom", 10);

        let entries = build_catalog(tmp.path(), MediaKind::Rom, NO_FILTER).unwrap();
        assert_eq!(
            entries,
            vec![
                CatalogEntry {
                    display_name: "A".into(),
                    size_bytes: 10
                },
                CatalogEntry {
                    display_name: "b".into(),
                    size_bytes: 20
                },
            ]
        );
    }
}
