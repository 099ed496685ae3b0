use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("encoded CSV is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;
