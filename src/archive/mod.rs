//! Stored-entry ZIP construction from a normalized file sequence.
//!
//! Entries are written uncompressed: the payload is typically
//! already-compressed or incompressible export formats, so storing is
//! strictly faster and the container stays byte-faithful. The archive is
//! spooled through a temp file that the result owns; any failure abandons
//! the spool.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempPath};
use tokio::io::AsyncReadExt;
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::common::{CancelFlag, FileContent, FileEntry};
use crate::error::IngestError;

/// Media type of the produced artifact.
pub const ARCHIVE_MEDIA_TYPE: &str = "application/zip";

/// Chunk size for content serialization. Each chunk is one unit of
/// cooperative work: a progress tick and a cancellation checkpoint.
const WRITE_CHUNK: usize = 1024 * 1024;

/// The finished upload artifact: a named, spooled ZIP.
#[derive(Debug)]
pub struct ArchiveFile {
    file_name: String,
    size: u64,
    spool: TempPath,
}

impl ArchiveFile {
    /// Suggested file name for the upload, `<folder>.zip`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &'static str {
        ARCHIVE_MEDIA_TYPE
    }

    /// Size of the finished container in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// On-disk location of the spool. Valid while this value lives; the
    /// spool is removed when it is dropped.
    pub fn path(&self) -> &Path {
        &self.spool
    }

    /// Detach the spool for a transport that outlives this value.
    pub fn into_spool(self) -> TempPath {
        self.spool
    }
}

/// Terminal output of a packaging run.
#[derive(Debug)]
pub struct ArchiveResult {
    pub archive: ArchiveFile,
    pub folder_name: String,
    pub file_count: u64,
}

/// Serializes one ordered entry sequence into one stored-entry archive.
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    /// Directory the spool file is created in; system temp dir when unset.
    pub spool_dir: Option<PathBuf>,
}

impl ArchiveBuilder {
    /// Build the archive, reporting monotonically non-decreasing progress
    /// percentages; 100 is always the last value reported before return.
    pub async fn build(
        &self,
        entries: &[FileEntry],
        folder_name: &str,
        progress: &mut dyn FnMut(f64),
        cancel: &CancelFlag,
    ) -> Result<ArchiveFile, IngestError> {
        let spool = match &self.spool_dir {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(|e| build_failed(format!("could not create spool file: {e}")))?;

        let mut writer = ZipWriter::new(spool);
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .large_file(true);

        let total_bytes: u64 = entries.iter().map(|e| e.size).sum();
        let mut reporter = Reporter::new(total_bytes);
        progress(0.0);

        for entry in entries {
            cancel.checkpoint()?;
            writer
                .start_file(entry.relative_path.as_str(), options)
                .map_err(|e| {
                    build_failed(format!(
                        "could not start entry '{}': {e}",
                        entry.relative_path
                    ))
                })?;
            self.write_content(&mut writer, entry, &mut reporter, progress, cancel)
                .await?;
        }

        let mut spool = writer
            .finish()
            .map_err(|e| build_failed(format!("could not finalize archive: {e}")))?;
        spool
            .flush()
            .map_err(|e| build_failed(format!("could not flush spool: {e}")))?;
        let size = spool
            .as_file()
            .metadata()
            .map_err(|e| build_failed(format!("could not stat spool: {e}")))?
            .len();
        reporter.finish(progress);

        let file_name = format!("{folder_name}.zip");
        info!(%file_name, entries = entries.len(), size, "archive spooled");
        Ok(ArchiveFile {
            file_name,
            size,
            spool: spool.into_temp_path(),
        })
    }

    async fn write_content(
        &self,
        writer: &mut ZipWriter<NamedTempFile>,
        entry: &FileEntry,
        reporter: &mut Reporter,
        progress: &mut dyn FnMut(f64),
        cancel: &CancelFlag,
    ) -> Result<(), IngestError> {
        match &entry.content {
            FileContent::Bytes(bytes) => {
                for chunk in bytes.chunks(WRITE_CHUNK) {
                    cancel.checkpoint()?;
                    writer.write_all(chunk).map_err(|e| {
                        build_failed(format!(
                            "could not write entry '{}': {e}",
                            entry.relative_path
                        ))
                    })?;
                    reporter.advance(chunk.len() as u64, progress);
                }
            }
            FileContent::Disk(path) => {
                let mut file = tokio::fs::File::open(path).await.map_err(|e| {
                    build_failed(format!(
                        "could not read entry '{}': {e}",
                        entry.relative_path
                    ))
                })?;
                let mut buf = vec![0u8; WRITE_CHUNK];
                loop {
                    cancel.checkpoint()?;
                    let n = file.read(&mut buf).await.map_err(|e| {
                        build_failed(format!(
                            "could not read entry '{}': {e}",
                            entry.relative_path
                        ))
                    })?;
                    if n == 0 {
                        break;
                    }
                    writer.write_all(&buf[..n]).map_err(|e| {
                        build_failed(format!(
                            "could not write entry '{}': {e}",
                            entry.relative_path
                        ))
                    })?;
                    reporter.advance(n as u64, progress);
                }
            }
        }
        Ok(())
    }
}

fn build_failed(reason: String) -> IngestError {
    IngestError::ArchiveCreationFailed { reason }
}

/// Tracks serialized bytes and keeps reported percentages non-decreasing.
struct Reporter {
    total: u64,
    done: u64,
    last: f64,
}

impl Reporter {
    fn new(total: u64) -> Self {
        Self {
            total,
            done: 0,
            last: 0.0,
        }
    }

    fn advance(&mut self, bytes: u64, progress: &mut dyn FnMut(f64)) {
        self.done += bytes;
        let pct = if self.total == 0 {
            0.0
        } else {
            ((self.done as f64 / self.total as f64) * 100.0).min(100.0)
        };
        if pct > self.last {
            self.last = pct;
            progress(pct);
        }
    }

    fn finish(&mut self, progress: &mut dyn FnMut(f64)) {
        self.last = 100.0;
        progress(100.0);
    }
}
