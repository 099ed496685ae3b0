//! Error types for ranking table ingestion.

use std::fmt;
use std::path::PathBuf;

use ranktab_model::ModelError;
use thiserror::Error;

/// Which of the two interchange files an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvFile {
    Main,
    Notes,
}

impl fmt::Display for CsvFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvFile::Main => f.write_str("main"),
            CsvFile::Notes => f.write_str("notes"),
        }
    }
}

/// Structural failures; no partial table is produced.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Malformed quoting or unequal record lengths.
    #[error("failed to parse {file} CSV: {source}")]
    CsvParse {
        file: CsvFile,
        #[source]
        source: csv::Error,
    },

    /// A quoted field is never closed.
    #[error("unterminated quoted field in {file} CSV")]
    UnbalancedQuotes { file: CsvFile },

    /// No header row.
    #[error("{file} CSV is empty")]
    EmptyCsv { file: CsvFile },

    /// A header the layout depends on is absent.
    #[error("required column '{header}' not found in {file} CSV")]
    MissingHeader { file: CsvFile, header: &'static str },

    /// One or more of the six metadata rows is absent.
    #[error("missing control rows with id {}", join_ids(.ids))]
    MissingControlRows { ids: Vec<u32> },

    // === Payload Errors ===
    #[error("malformed table payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::MissingControlRows { ids: vec![3, 5] };
        assert_eq!(err.to_string(), "missing control rows with id 3, 5");

        let err = IngestError::MissingHeader {
            file: CsvFile::Notes,
            header: "id",
        };
        assert_eq!(err.to_string(), "required column 'id' not found in notes CSV");
    }
}
