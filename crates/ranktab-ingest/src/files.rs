//! Loading the CSV pair from disk.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Contents of a main CSV and its optional notes companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPair {
    pub main: String,
    pub notes: Option<String>,
}

impl CsvPair {
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Read the main CSV and, when given, the notes CSV.
///
/// A missing main file is an error; a missing notes file is logged and
/// treated as absent.
pub fn read_csv_pair(main_path: &Path, notes_path: Option<&Path>) -> Result<CsvPair> {
    let main = read_text(main_path)?;
    let notes = match notes_path {
        Some(path) if !path.exists() => {
            tracing::warn!(path = %path.display(), "Notes file not found; continuing without notes");
            None
        }
        Some(path) => Some(read_text(path)?),
        None => None,
    };
    tracing::debug!(
        main = %main_path.display(),
        bytes = main.len(),
        has_notes = notes.is_some(),
        "Loaded CSV files"
    );
    Ok(CsvPair { main, notes })
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => IngestError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        },
    })
}
