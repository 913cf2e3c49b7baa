//! Failure classifications for folder packaging.
//!
//! Every failure in the pipeline is mapped to exactly one variant at its
//! point of origin; the `Display` string is the human-readable message a
//! host UI shows verbatim. Nothing is retried automatically; recovery is
//! always a fresh user selection.

use std::io;

use thiserror::Error;

const GIB: u64 = 1024 * 1024 * 1024;

/// The primary error type for all operations in the `foldpack` crate.
#[derive(Debug, Error)]
pub enum IngestError {
    /// After filtering, zero entries remained in the selection.
    #[error("No supported files found in the selected folder.")]
    NoSupportedFiles,

    /// The selection holds more files than the configured ceiling.
    #[error(
        "Folder contains {} files, exceeding the {} file limit.",
        grouped(.found),
        grouped(.limit)
    )]
    FileCountExceeded { found: u64, limit: u64 },

    /// The selection's total byte size is over the configured ceiling.
    #[error(
        "Total folder size is {} GB, exceeding the {} GB limit.",
        gigabytes(.total),
        limit_gigabytes(.limit)
    )]
    TotalSizeExceeded { total: u64, limit: u64 },

    /// An I/O error occurred while enumerating or materializing a source
    /// entry, before archive construction started.
    #[error("Failed to read '{path}': {source}")]
    FolderRead { source: io::Error, path: String },

    /// An entry read or container-write failure during archive building.
    /// The in-progress spool is abandoned.
    #[error("Failed to create ZIP from folder: {reason}")]
    ArchiveCreationFailed { reason: String },

    /// The caller cancelled the in-flight operation.
    #[error("Folder packaging was cancelled.")]
    Cancelled,
}

/// Digit-grouped rendering for counts, e.g. `10000` → `"10,000"`.
fn grouped(n: &u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One-decimal GB figure for measured totals, e.g. `5.4`.
fn gigabytes(bytes: &u64) -> String {
    format!("{:.1}", *bytes as f64 / GIB as f64)
}

/// GB figure for configured limits: whole numbers print without a decimal
/// so the default ceiling reads "5 GB", not "5.0 GB".
fn limit_gigabytes(bytes: &u64) -> String {
    let gb = *bytes as f64 / GIB as f64;
    if gb.fract() == 0.0 {
        format!("{}", gb as u64)
    } else {
        format!("{:.1}", gb)
    }
}
