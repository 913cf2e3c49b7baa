//! Selection collectors.
//!
//! Two structurally different input channels (a flat picker list with
//! pre-attached relative paths, and a recursive tree of async entry handles)
//! are normalized here into one ordered [`FileEntry`] sequence plus the
//! root name the archive will be labelled with. The rest of the pipeline
//! never learns which channel produced a selection.

pub mod flat;
pub mod tree;

use crate::common::FileEntry;

/// Fallback root name for picker selections with no usable first path.
pub const PICKED_FALLBACK_NAME: &str = "selected-folder";

/// Fallback root name for drops whose top level contains no directory.
pub const DROPPED_FALLBACK_NAME: &str = "dropped-folder";

/// Output of either collector: the ordered, filtered file sequence and the
/// derived folder root name.
#[derive(Debug)]
pub struct NormalizedSelection {
    pub folder_name: String,
    pub entries: Vec<FileEntry>,
}
