//! Asynchronous enumeration contract for dropped folder trees.
//!
//! Hosts expose a dropped selection as a set of top-level entry handles;
//! directory children can only be obtained through a paginated async read
//! that returns successive batches until an empty batch signals exhaustion.
//! A single read call is never assumed to return all children; callers
//! must drain.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::common::FileContent;
use crate::error::IngestError;

/// Upper bound on how many child entries one `read_children` call returns.
pub const CHILD_BATCH: usize = 64;

/// One node of a dropped folder hierarchy.
#[async_trait]
pub trait SourceEntry: Send {
    /// Leaf name of this entry, no separators.
    fn name(&self) -> &str;

    /// True for directory nodes.
    fn is_dir(&self) -> bool;

    /// Next batch of children; an empty batch means the directory is
    /// exhausted. Only meaningful for directory nodes.
    async fn read_children(&mut self) -> Result<Vec<Box<dyn SourceEntry>>, IngestError>;

    /// Materialize this file's content handle and byte length. Only
    /// meaningful for file nodes.
    async fn open_file(&self) -> Result<(FileContent, u64), IngestError>;
}

fn read_err(source: std::io::Error, path: &Path) -> IngestError {
    IngestError::FolderRead {
        source,
        path: path.display().to_string(),
    }
}

/// Filesystem-backed [`SourceEntry`] serving real directories through the
/// same paginated batch contract a host would.
#[derive(Debug)]
pub struct FsEntry {
    path: PathBuf,
    name: String,
    is_dir: bool,
    reader: Option<fs::ReadDir>,
    exhausted: bool,
}

impl FsEntry {
    /// Wrap an existing file or directory as a top-level entry.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, IngestError> {
        let path = path.into();
        let meta = fs::metadata(&path).await.map_err(|e| read_err(e, &path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            is_dir: meta.is_dir(),
            path,
            reader: None,
            exhausted: false,
        })
    }
}

#[async_trait]
impl SourceEntry for FsEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        self.is_dir
    }

    async fn read_children(&mut self) -> Result<Vec<Box<dyn SourceEntry>>, IngestError> {
        if self.exhausted {
            return Ok(Vec::new());
        }
        if self.reader.is_none() {
            let reader = fs::read_dir(&self.path)
                .await
                .map_err(|e| read_err(e, &self.path))?;
            self.reader = Some(reader);
        }
        let Some(reader) = self.reader.as_mut() else {
            return Ok(Vec::new());
        };

        let mut batch: Vec<Box<dyn SourceEntry>> = Vec::new();
        while batch.len() < CHILD_BATCH {
            match reader
                .next_entry()
                .await
                .map_err(|e| read_err(e, &self.path))?
            {
                Some(child) => {
                    let child_path = child.path();
                    let file_type = child
                        .file_type()
                        .await
                        .map_err(|e| read_err(e, &child_path))?;
                    batch.push(Box::new(FsEntry {
                        name: child.file_name().to_string_lossy().into_owned(),
                        is_dir: file_type.is_dir(),
                        path: child_path,
                        reader: None,
                        exhausted: false,
                    }));
                }
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }
        Ok(batch)
    }

    async fn open_file(&self) -> Result<(FileContent, u64), IngestError> {
        let meta = fs::metadata(&self.path)
            .await
            .map_err(|e| read_err(e, &self.path))?;
        Ok((FileContent::Disk(self.path.clone()), meta.len()))
    }
}
