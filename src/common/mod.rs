//! Shared data model for folder ingestion.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::error::IngestError;

/// Opaque reference to a file's bytes.
///
/// A picker-style host hands content over already resident; the tree walker
/// materializes handles that are read lazily while the archive is built.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// Content resident in memory.
    Bytes(Vec<u8>),
    /// Content on disk, opened during archive serialization.
    Disk(PathBuf),
}

/// One file to be archived: slash-delimited path from the selected folder
/// root down to the file, plus content handle and byte length.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub relative_path: String,
    pub size: u64,
    pub content: FileContent,
}

/// Summary of a normalized selection, created once collection and filtering
/// complete and read-only thereafter. Serializes in the shape a host UI
/// renders directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSelection {
    pub name: String,
    pub file_count: u64,
    pub total_bytes: u64,
}

impl FolderSelection {
    pub fn from_entries(name: impl Into<String>, entries: &[FileEntry]) -> Self {
        Self {
            name: name.into(),
            file_count: entries.len() as u64,
            total_bytes: entries.iter().map(|e| e.size).sum(),
        }
    }
}

/// Cooperative cancellation flag shared between the caller and an in-flight
/// packaging run. Observed at suspension points: directory reads and each
/// chunk of archive serialization.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the run stops at its next checkpoint.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn checkpoint(&self) -> Result<(), IngestError> {
        if self.is_cancelled() {
            Err(IngestError::Cancelled)
        } else {
            Ok(())
        }
    }
}
