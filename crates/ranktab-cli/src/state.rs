//! Reading tables from disk and writing the JSON state file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ranktab_ingest::{Decoded, decode_csv, decode_payload_json, read_csv_pair};
use ranktab_model::TableModel;

/// What an input path holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A main CSV file, optionally with a notes file beside it.
    Csv,
    /// A JSON state file written by `ranktab import`.
    State,
}

impl InputKind {
    /// Classify by extension: `.json` is a state file, anything else CSV.
    pub fn detect(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json { Self::State } else { Self::Csv }
    }
}

/// Load a table from a CSV pair or a state file.
///
/// `notes` is only consulted for CSV input.
pub fn load_table(input: &Path, notes: Option<&Path>) -> Result<Decoded> {
    match InputKind::detect(input) {
        InputKind::State => {
            if notes.is_some() {
                tracing::warn!("--notes is ignored for state file input");
            }
            load_state(input)
        }
        InputKind::Csv => {
            let pair = read_csv_pair(input, notes)
                .with_context(|| format!("read {}", input.display()))?;
            decode_csv(&pair.main, pair.notes())
                .with_context(|| format!("decode {}", input.display()))
        }
    }
}

/// Load a JSON state file.
pub fn load_state(path: &Path) -> Result<Decoded> {
    let json =
        fs::read_to_string(path).with_context(|| format!("read state {}", path.display()))?;
    decode_payload_json(&json).with_context(|| format!("decode state {}", path.display()))
}

/// Write the model snapshot as pretty JSON.
pub fn save_state(path: &Path, model: &TableModel) -> Result<()> {
    let json = serde_json::to_string_pretty(&model.snapshot()).context("serialize state")?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("write state {}", path.display()))?;
    tracing::info!(path = %path.display(), "Saved table state");
    Ok(())
}
