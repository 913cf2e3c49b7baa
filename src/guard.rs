//! Hard ceilings checked between collection and archive construction.
//!
//! Archive building is the expensive step, so the guard runs on the
//! normalized totals before any archive I/O happens.

use tracing::warn;

use crate::error::IngestError;

/// Most files a single selection may contain.
pub const MAX_FILES: u64 = 10_000;

/// Largest total payload a single selection may carry: 5 GiB.
pub const MAX_TOTAL_BYTES: u64 = 5 * 1024 * 1024 * 1024;

/// Count/size ceiling check. Boundaries are inclusive: the threshold value
/// itself passes, one more is rejected.
#[derive(Debug, Clone, Copy)]
pub struct SizeGuard {
    pub max_files: u64,
    pub max_total_bytes: u64,
}

impl Default for SizeGuard {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES,
            max_total_bytes: MAX_TOTAL_BYTES,
        }
    }
}

impl SizeGuard {
    pub fn check(&self, file_count: u64, total_bytes: u64) -> Result<(), IngestError> {
        if file_count > self.max_files {
            warn!(file_count, limit = self.max_files, "file count over ceiling");
            return Err(IngestError::FileCountExceeded {
                found: file_count,
                limit: self.max_files,
            });
        }
        if total_bytes > self.max_total_bytes {
            warn!(total_bytes, limit = self.max_total_bytes, "total size over ceiling");
            return Err(IngestError::TotalSizeExceeded {
                total: total_bytes,
                limit: self.max_total_bytes,
            });
        }
        Ok(())
    }
}
