//! Error types for the chase engine

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Alias or override tables that cannot be used as given.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A ledger row that is missing or cannot parse a required field.
    #[error("Malformed record in {} at row {row}: {reason}", file.display())]
    MalformedRecord {
        file: PathBuf,
        row: u64,
        reason: String,
    },

    /// An export that cannot be opened.
    #[error("Cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn malformed(file: impl Into<PathBuf>, row: u64, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            file: file.into(),
            row,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_names_file_and_row() {
        let err = Error::malformed("statements/jan.csv", 7, "missing Amount");
        assert_eq!(
            err.to_string(),
            "Malformed record in statements/jan.csv at row 7: missing Amount"
        );
    }

    #[test]
    fn test_open_error_names_path() {
        let err = Error::Open {
            path: PathBuf::from("statements/feb.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "Cannot open statements/feb.csv: not found");
    }
}
