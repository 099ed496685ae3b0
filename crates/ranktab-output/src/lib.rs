//! Ranking table output generation.
//!
//! - [`encode`]: the self-describing CSV pair (main file plus notes file)
//! - [`encode_view_csv`]: a flat CSV of the current view with display values
//! - [`write_bundle`]: a ZIP holding both CSV files and a README manifest

pub mod archive;
pub mod encode;
pub mod error;
pub mod readme;
pub mod view;

pub use archive::{
    Bundle, DEFAULT_COMPRESSION_LEVEL, MAIN_FILE_NAME, NOTES_FILE_NAME, README_FILE_NAME,
    build_bundle, bundle_file_name, write_bundle,
};
pub use encode::{EncodeScope, EncodedTable, encode, encode_with, layout_columns};
pub use error::{OutputError, Result};
pub use readme::{ReadmeContext, render_readme, sha256_hex};
pub use view::encode_view_csv;
