//! Library error types.
//!
//! Only boundary failures are errors. Insufficient data, unknown applications,
//! zero-variance features and missing metrics all have defined fallbacks and
//! never surface here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid input record #{index}: {reason}")]
    InvalidInput { index: usize, reason: String },

    #[error("Empty batch: no records to analyze")]
    EmptyBatch,

    #[error("Failed to read records from {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse records (line {line}): {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
