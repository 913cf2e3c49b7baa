//! Orchestration facade: one call takes a selection source to a ready
//! archive or a classified failure.
//!
//! The facade owns no durable state. Everything a host UI tracks while a
//! run is in flight lives in [`PackState`], a small record the caller owns,
//! feeds from the event stream, and resets on completion, failure, or an
//! explicit user reset.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::archive::{ArchiveBuilder, ArchiveResult};
use crate::collect::flat::{collect_flat, PickedFile};
use crate::collect::tree::collect_tree;
use crate::collect::NormalizedSelection;
use crate::common::{CancelFlag, FolderSelection};
use crate::error::IngestError;
use crate::filter::PathFilter;
use crate::guard::{SizeGuard, MAX_FILES, MAX_TOTAL_BYTES};
use crate::source::SourceEntry;

/// Which input channel produced the selection.
pub enum FolderSource {
    /// Folder-picker style: a flat ordered list with pre-attached relative
    /// paths.
    Picked(Vec<PickedFile>),
    /// Drag-and-drop style: top-level entry handles walked recursively.
    Dropped(Vec<Box<dyn SourceEntry>>),
}

/// Tuning knobs for a packaging run. Defaults reproduce the product
/// ceilings and keep the enumeration source's own ordering.
#[derive(Debug, Clone)]
pub struct PackOptions {
    pub max_files: u64,
    pub max_total_bytes: u64,
    /// Sort entries lexicographically by relative path before the ceiling
    /// check, for archives that are reproducible regardless of enumeration
    /// order.
    pub sort_entries: bool,
    /// Where the archive spool file is created; system temp dir when unset.
    pub spool_dir: Option<PathBuf>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES,
            max_total_bytes: MAX_TOTAL_BYTES,
            sort_entries: false,
            spool_dir: None,
        }
    }
}

/// Events emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PackEvent {
    /// Collection and filtering finished; the ceilings have not run yet.
    Selected(FolderSelection),
    /// Archive serialization progress, 0–100, non-decreasing.
    Progress(f64),
}

/// Transient in-flight record owned by the calling UI context. Never
/// persisted; reset clears everything so the same folder can be selected
/// again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackState {
    pub is_building: bool,
    pub progress: f64,
    pub selection: Option<FolderSelection>,
}

impl PackState {
    pub fn apply(&mut self, event: &PackEvent) {
        match event {
            PackEvent::Selected(selection) => {
                self.selection = Some(selection.clone());
                self.is_building = true;
                self.progress = 0.0;
            }
            PackEvent::Progress(pct) => self.progress = *pct,
        }
    }

    /// Reset on completion, failure, or explicit user reset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Wires collectors, filter, guard, and builder into one pipeline.
#[derive(Debug, Clone, Default)]
pub struct FolderPackager {
    filter: PathFilter,
    options: PackOptions,
}

impl FolderPackager {
    pub fn new(options: PackOptions) -> Self {
        Self {
            filter: PathFilter,
            options,
        }
    }

    /// Run the full pipeline for one selection.
    ///
    /// Emits [`PackEvent::Selected`] once collection and filtering finish,
    /// then progress events while the archive is serialized. Returns the
    /// ready archive or exactly one classified failure; on failure the
    /// caller resets its [`PackState`] and no partial state survives.
    pub async fn package(
        &self,
        source: FolderSource,
        mut on_event: impl FnMut(PackEvent),
        cancel: &CancelFlag,
    ) -> Result<ArchiveResult, IngestError> {
        cancel.checkpoint()?;
        let NormalizedSelection {
            folder_name,
            mut entries,
        } = match source {
            FolderSource::Picked(files) => collect_flat(files, &self.filter)?,
            FolderSource::Dropped(roots) => {
                collect_tree(roots, &self.filter, cancel).await?
            }
        };

        if self.options.sort_entries {
            entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        }

        let selection = FolderSelection::from_entries(&folder_name, &entries);
        on_event(PackEvent::Selected(selection.clone()));

        let guard = SizeGuard {
            max_files: self.options.max_files,
            max_total_bytes: self.options.max_total_bytes,
        };
        guard.check(selection.file_count, selection.total_bytes)?;

        let builder = ArchiveBuilder {
            spool_dir: self.options.spool_dir.clone(),
        };
        let archive = builder
            .build(
                &entries,
                &folder_name,
                &mut |pct| on_event(PackEvent::Progress(pct)),
                cancel,
            )
            .await?;

        info!(
            folder = %folder_name,
            files = selection.file_count,
            bytes = selection.total_bytes,
            "folder packaged"
        );
        Ok(ArchiveResult {
            archive,
            folder_name,
            file_count: selection.file_count,
        })
    }
}
