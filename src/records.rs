//! Record input: JSON arrays or JSON Lines of [`RawRecord`].
//!
//! Input is expected in metric units already (m, %, mD, °C, MPa, m/s).
//! The format is chosen from the first non-whitespace character: `[` means a
//! single JSON array, anything else is read line by line with blank lines
//! skipped.

use std::io::Read;
use std::path::Path;

use crate::error::AnalysisError;
use crate::types::RawRecord;

/// Parse records from an in-memory JSON array or JSON Lines document.
pub fn parse_records(text: &str) -> Result<Vec<RawRecord>, AnalysisError> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).map_err(|source| AnalysisError::Parse {
            line: source.line(),
            source,
        });
    }

    let mut records = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line)
            .map_err(|source| AnalysisError::Parse { line: i + 1, source })?;
        records.push(record);
    }
    Ok(records)
}

/// Read and parse every record from `reader`.
pub fn read_records_from<R: Read>(mut reader: R, origin: &Path) -> Result<Vec<RawRecord>, AnalysisError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| AnalysisError::Io(origin.to_path_buf(), e))?;
    parse_records(&text)
}

/// Read and parse every record in the file at `path`.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>, AnalysisError> {
    let file = std::fs::File::open(path).map_err(|e| AnalysisError::Io(path.to_path_buf(), e))?;
    read_records_from(file, path)
}
