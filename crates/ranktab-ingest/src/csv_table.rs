//! Strict CSV reading into a header plus rows of trimmed cells.

use csv::ReaderBuilder;

use crate::error::{CsvFile, IngestError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Position of the first header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell text, or `""` when the row or column is out of range.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or("", String::as_str)
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Parse CSV text with RFC 4180 quoting.
///
/// Records of unequal length and an unterminated quote are errors. Rows whose
/// cells are all empty are skipped.
pub fn parse_csv_text(text: &str, file: CsvFile) -> Result<CsvTable> {
    if text.bytes().filter(|&b| b == b'"').count() % 2 != 0 {
        return Err(IngestError::UnbalancedQuotes { file });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(text.as_bytes());

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse { file, source })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        raw_rows.push(row);
    }

    let mut rows = raw_rows.into_iter();
    let headers = rows.next().ok_or(IngestError::EmptyCsv { file })?;
    tracing::debug!(%file, columns = headers.len(), "Parsed CSV header");
    Ok(CsvTable {
        headers,
        rows: rows.collect(),
    })
}
