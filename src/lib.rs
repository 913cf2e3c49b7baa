//! # Foldpack Core Library
//!
//! This crate packages a user-selected folder tree into a single
//! stored-entry ZIP suitable for upload. Two enumeration sources, a flat
//! picker-style file list and a recursive drag-and-drop entry tree with
//! paginated async reads, are normalized into one ordered file sequence,
//! filtered, checked against hard count/size ceilings, and serialized with
//! progress reporting and cooperative cancellation.
//!
//! ## Key Modules
//!
//! - [`collect`]: Normalizes both selection channels into one file sequence.
//! - [`source`]: The paginated async enumeration contract and its
//!   filesystem-backed implementation.
//! - [`filter`]: Skip rules for OS metadata and hidden entries.
//! - [`guard`]: Hard ceilings checked before archive construction.
//! - [`archive`]: Stored-entry ZIP serialization with progress.
//! - [`pipeline`]: The orchestration facade a host UI drives.

pub mod archive;
pub mod collect;
pub mod common;
pub mod error;
pub mod filter;
pub mod guard;
pub mod pipeline;
pub mod source;

pub use archive::{ArchiveBuilder, ArchiveFile, ArchiveResult, ARCHIVE_MEDIA_TYPE};
pub use collect::flat::{picked_from_dir, PickedFile};
pub use common::{CancelFlag, FileContent, FileEntry, FolderSelection};
pub use error::IngestError;
pub use filter::PathFilter;
pub use guard::SizeGuard;
pub use pipeline::{FolderPackager, FolderSource, PackEvent, PackOptions, PackState};
pub use source::{FsEntry, SourceEntry};
