use thiserror::Error;

use crate::models::ValidationError;
use crate::types::MoneyError;

/// A failed catalog request. Callers treat any of these as "no data" for that lookup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Catalog returned status [{status}] for [{target}]")]
    Status {
        target: String,
        status: u16
    }
}

/// Failures while writing or reading an enriched-output file.
#[derive(Debug, Error)]
pub enum EnrichedFileError {
    #[error("Enriched file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Enriched file format error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Enriched file has an invalid unit price: {0}")]
    Money(#[from] MoneyError),
    #[error("Enriched file has an invalid row: {0}")]
    Invalid(#[from] ValidationError)
}
