use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("CSV Error")]
    CsvError(#[from] csv::Error),
    #[error("I/O Error")]
    IoError(#[from] io::Error),
    #[error("Input file {path} could not be opened")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Missing column `{0}` in CSV header")]
    MissingColumn(&'static str),
    #[error("Prices must be non-negative amounts with two decimal places")]
    InvalidAmount,
}
