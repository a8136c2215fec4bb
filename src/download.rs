use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::catalog::{self, RawFileRecord};
use crate::error::{CatalogError, Result};
use crate::kind::MediaKind;
use crate::normalize;

/// Maps a zero-based catalog index back to the file on disk.
///
/// The catalog is rebuilt with the same kind and filter the listing used, so
/// index N lands on the same entry a prior listing placed at position N. The
/// directory is an uncoordinated shared resource: if it changed between the
/// two requests the name match can fail, reported as `ResolutionMismatch`.
pub fn resolve(dir: &Path, kind: MediaKind, filter: &str, index: usize) -> Result<RawFileRecord> {
    let entries = catalog::build_catalog(dir, kind, filter)?;
    let entry = entries
        .get(index)
        .ok_or_else(|| CatalogError::index_out_of_range(index, entries.len()))?;
    info!(index, name = %entry.display_name, "resolving download");

    let raw = catalog::scan_raw_files(dir, kind)?;
    raw.into_iter()
        .find(|record| normalize::display_name(&record.file_name) == entry.display_name)
        .ok_or(CatalogError::ResolutionMismatch(index))
}

/// Builds the download payload: a newline-terminated metadata header in the
/// legacy server's format, followed by the raw file bytes.
///
/// The header reports the actual read length rather than the size recorded
/// at scan time, tolerating drift between the two. A read failure after
/// resolution is a retrieval failure; nothing is retried.
pub fn package(kind: MediaKind, record: &RawFileRecord) -> Result<Vec<u8>> {
    let content = fs::read(&record.path).map_err(CatalogError::FileRead)?;
    let display_name = normalize::display_name(&record.file_name);
    let header = match kind {
        MediaKind::Dsk => format!(
            "size:{},disks:1,name:{}.{}\n",
            content.len(),
            display_name,
            kind.wire_extension()
        ),
        MediaKind::Rom => format!(
            "type:,start:,size:{},name:{}.{}\n",
            content.len(),
            display_name,
            kind.wire_extension()
        ),
    };
    debug!(bytes = content.len(), name = %display_name, "packaging download");

    let mut payload = header.into_bytes();
    payload.extend_from_slice(&content);
    Ok(payload)
}
