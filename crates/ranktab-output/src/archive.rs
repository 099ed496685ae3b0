//! ZIP bundle of an export.

use std::io::{Cursor, Seek, Write};

use chrono::NaiveDate;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

pub const MAIN_FILE_NAME: &str = "default-ranking.csv";
pub const NOTES_FILE_NAME: &str = "data-notes.csv";
pub const README_FILE_NAME: &str = "README.txt";

/// Deflate level used unless configured otherwise.
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 9;

/// The three documents of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub main_csv: String,
    pub notes_csv: String,
    pub readme: String,
    pub compression_level: i64,
}

impl Bundle {
    pub fn new(
        main_csv: impl Into<String>,
        notes_csv: impl Into<String>,
        readme: impl Into<String>,
    ) -> Self {
        Self {
            main_csv: main_csv.into(),
            notes_csv: notes_csv.into(),
            readme: readme.into(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    #[must_use]
    pub fn with_compression_level(mut self, level: i64) -> Self {
        self.compression_level = level;
        self
    }

    fn entries(&self) -> [(&'static str, &str); 3] {
        [
            (MAIN_FILE_NAME, self.main_csv.as_str()),
            (NOTES_FILE_NAME, self.notes_csv.as_str()),
            (README_FILE_NAME, self.readme.as_str()),
        ]
    }
}

/// Stream the bundle into `writer` one entry at a time and return the writer.
pub fn write_bundle<W: Write + Seek>(writer: W, bundle: &Bundle) -> Result<W> {
    let _span = tracing::info_span!("write_bundle").entered();
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(bundle.compression_level));

    let mut zip = ZipWriter::new(writer);
    for (name, contents) in bundle.entries() {
        zip.start_file(name, options)?;
        zip.write_all(contents.as_bytes())?;
        tracing::debug!(entry = name, bytes = contents.len(), "Wrote bundle entry");
    }
    let writer = zip.finish()?;
    tracing::info!(level = bundle.compression_level, "Wrote export bundle");
    Ok(writer)
}

/// Build the bundle in memory.
pub fn build_bundle(main_csv: &str, notes_csv: &str, readme: &str) -> Result<Vec<u8>> {
    let bundle = Bundle::new(main_csv, notes_csv, readme);
    let cursor = write_bundle(Cursor::new(Vec::new()), &bundle)?;
    Ok(cursor.into_inner())
}

/// `{prefix}-YYYY-MM-DD.zip`
pub fn bundle_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{}.zip", date.format("%Y-%m-%d"))
}
