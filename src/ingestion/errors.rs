use std::path::PathBuf;

use thiserror::Error;

/// Why a single line was rejected by the parser.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Expected {expected} fields but found {found}")]
    FieldCount {
        expected: usize,
        found: usize
    },
    #[error("Quantity [{0}] is not an integer")]
    InvalidQuantity(String),
    #[error("Unit price [{0}] is not a number")]
    InvalidUnitPrice(String)
}

/// File-level failures; these abort the run.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Input file not found: {}", path.display())]
    FileNotFound {
        path: PathBuf
    },
    #[error("Input file {} could not be read: {reason}", path.display())]
    FileNotReadable {
        path: PathBuf,
        reason: String
    }
}
