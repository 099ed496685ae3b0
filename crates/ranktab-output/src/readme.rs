//! README text shipped inside an export bundle.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::archive::{MAIN_FILE_NAME, NOTES_FILE_NAME};

/// Inputs of [`render_readme`].
#[derive(Debug, Clone)]
pub struct ReadmeContext<'a> {
    pub generated_at: DateTime<Utc>,
    pub main_csv: &'a str,
    pub notes_csv: &'a str,
    pub entity_count: usize,
    pub column_count: usize,
}

/// Hex-encoded SHA-256 of `contents`.
pub fn sha256_hex(contents: &[u8]) -> String {
    hex::encode(Sha256::digest(contents))
}

pub fn render_readme(context: &ReadmeContext<'_>) -> String {
    let generated = context
        .generated_at
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let main_digest = sha256_hex(context.main_csv.as_bytes());
    let notes_digest = sha256_hex(context.notes_csv.as_bytes());

    let lines = [
        "LLM Ranking Export (CSV Compatible Format)".to_string(),
        format!("Generated: {generated}"),
        String::new(),
        "Files included:".to_string(),
        format!("- {MAIN_FILE_NAME}: Main ranking data in the interchange CSV format with control rows"),
        format!("- {NOTES_FILE_NAME}: Data notes in the interchange CSV format"),
        String::new(),
        format!(
            "Contents: {} entities, {} columns",
            context.entity_count, context.column_count
        ),
        String::new(),
        "SHA-256:".to_string(),
        format!("{main_digest}  {MAIN_FILE_NAME}"),
        format!("{notes_digest}  {NOTES_FILE_NAME}"),
        String::new(),
        "Notes:".to_string(),
        "- Control rows (id 1-6) describe the columns: metric flag, hidden flag,".to_string(),
        "  show-beside-model flag, full name, notes and column id".to_string(),
        "- Multi-value entries (separated by /) are preserved as-is; displays average".to_string(),
        "  them when every value is numeric and show the first value otherwise".to_string(),
        "- Values marked with ? are estimated".to_string(),
    ];
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
