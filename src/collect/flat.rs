//! Collector for picker-style selections: a flat, ordered file list where
//! every file arrives with a pre-attached, root-prefixed relative path.

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::collect::{NormalizedSelection, PICKED_FALLBACK_NAME};
use crate::common::{FileContent, FileEntry};
use crate::error::IngestError;
use crate::filter::PathFilter;

/// One file as a folder picker hands it over.
#[derive(Debug, Clone)]
pub struct PickedFile {
    /// Slash-delimited path whose first segment is the selected folder's
    /// name.
    pub relative_path: String,
    pub size: u64,
    pub content: FileContent,
}

/// Normalize a flat selection: filter, preserve input order, derive the
/// folder name from the first path's first segment.
pub fn collect_flat(
    files: Vec<PickedFile>,
    filter: &PathFilter,
) -> Result<NormalizedSelection, IngestError> {
    let folder_name = files
        .first()
        .and_then(|f| f.relative_path.split('/').next())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(PICKED_FALLBACK_NAME)
        .to_string();

    let offered = files.len();
    let entries: Vec<FileEntry> = files
        .into_iter()
        .filter(|f| !f.relative_path.is_empty() && !filter.skips_path(&f.relative_path))
        .map(|f| FileEntry {
            relative_path: f.relative_path,
            size: f.size,
            content: f.content,
        })
        .collect();

    if entries.is_empty() {
        return Err(IngestError::NoSupportedFiles);
    }
    debug!(
        folder = %folder_name,
        kept = entries.len(),
        dropped = offered - entries.len(),
        "flat selection normalized"
    );
    Ok(NormalizedSelection {
        folder_name,
        entries,
    })
}

/// Build the picked-file list a folder picker would produce from a real
/// directory: every file below `dir`, in enumeration order, each path
/// rooted at the directory's own name. No filtering happens here; that is
/// the collector's job.
pub fn picked_from_dir(dir: &Path) -> Result<Vec<PickedFile>, IngestError> {
    let root_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PICKED_FALLBACK_NAME.to_string());

    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| IngestError::FolderRead {
            source: e.into(),
            path: dir.display().to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let size = entry
            .metadata()
            .map_err(|e| IngestError::FolderRead {
                source: e.into(),
                path: entry.path().display().to_string(),
            })?
            .len();
        let rel = entry.path().strip_prefix(dir).map_err(|e| {
            IngestError::FolderRead {
                source: std::io::Error::new(std::io::ErrorKind::Other, e),
                path: entry.path().display().to_string(),
            }
        })?;

        let mut relative_path = root_name.clone();
        for segment in rel.components() {
            relative_path.push('/');
            relative_path.push_str(&segment.as_os_str().to_string_lossy());
        }
        files.push(PickedFile {
            relative_path,
            size,
            content: FileContent::Disk(entry.into_path()),
        });
    }
    Ok(files)
}
