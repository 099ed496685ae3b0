pub mod csv_table;
pub mod decode;
pub mod error;
pub mod files;
pub mod merge;
pub mod payload;

pub use csv_table::{CsvTable, parse_csv_text};
pub use decode::{Decoded, decode_csv};
pub use error::{CsvFile, IngestError, Result};
pub use files::{CsvPair, read_csv_pair};
pub use merge::merge_csv;
pub use payload::{decode_payload, decode_payload_json};
