use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;
use serde::{Deserialize, Serialize};

use crate::catalog::EnrichedFileError;
use crate::models::{CatalogAttributes, EnrichedTransaction, ParsedRecord, Transaction};
use crate::types::parse_money;

pub const ENRICHED_HEADER: [&str; 12] = [
    "TransactionID", "Date", "ProductID", "ProductName", "Quantity", "UnitPrice",
    "CustomerID", "Region", "API_Category", "API_Brand", "API_Rating", "API_Match"
];

const DELIMITER: u8 = b'|';

/// One row of the enriched file; field order matches [`ENRICHED_HEADER`].
#[derive(Debug, Serialize, Deserialize)]
struct EnrichedRow {
    #[serde(rename = "TransactionID")]
    transaction_id: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "ProductID")]
    product_id: String,
    #[serde(rename = "ProductName")]
    product_name: String,
    #[serde(rename = "Quantity")]
    quantity: i64,
    #[serde(rename = "UnitPrice")]
    unit_price: String,
    #[serde(rename = "CustomerID")]
    customer_id: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "API_Category")]
    category: Option<String>,
    #[serde(rename = "API_Brand")]
    brand: Option<String>,
    #[serde(rename = "API_Rating")]
    rating: Option<f64>,
    #[serde(rename = "API_Match")]
    matched: bool
}

impl From<&EnrichedTransaction> for EnrichedRow {
    fn from(enriched: &EnrichedTransaction) -> Self {
        let transaction = &enriched.transaction;

        Self {
            transaction_id: transaction.transaction_id().to_string(),
            date: transaction.date().to_string(),
            product_id: transaction.product_id().to_string(),
            product_name: transaction.product_name().to_string(),
            quantity: transaction.quantity(),
            unit_price: transaction.unit_price().to_string(),
            customer_id: transaction.customer_id().to_string(),
            region: transaction.region().to_string(),
            category: enriched.category().map(str::to_string),
            brand: enriched.brand().map(str::to_string),
            rating: enriched.rating(),
            matched: enriched.is_matched()
        }
    }
}

impl TryFrom<EnrichedRow> for EnrichedTransaction {
    type Error = EnrichedFileError;

    fn try_from(row: EnrichedRow) -> Result<Self, Self::Error> {
        let transaction = Transaction::try_from(ParsedRecord {
            transaction_id: row.transaction_id,
            date: row.date,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: parse_money(&row.unit_price)?,
            customer_id: row.customer_id,
            region: row.region
        })?;

        if !row.matched {
            return Ok(EnrichedTransaction::unmatched(transaction));
        }

        Ok(EnrichedTransaction::matched(transaction, CatalogAttributes {
            category: row.category,
            brand: row.brand,
            rating: row.rating
        }))
    }
}

/// Writes `enriched` as a pipe-delimited file preceded by a `#` comment line and the header.
///
/// Absent catalog fields are written as empty strings. Parent directories are created.
pub fn write_enriched(path: impl AsRef<Path>, enriched: &[EnrichedTransaction], comment: &str) -> Result<(), EnrichedFileError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "# {}", comment.replace(['\r', '\n'], " "))?;

    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(file);

    writer.write_record(ENRICHED_HEADER)?;

    for transaction in enriched {
        writer.serialize(EnrichedRow::from(transaction))?;
    }

    writer.flush()?;

    Ok(())
}

/// Reads a file produced by [`write_enriched`]. Comment lines are skipped.
#[cfg(test)]
pub fn read_enriched(path: impl AsRef<Path>) -> Result<Vec<EnrichedTransaction>, EnrichedFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .comment(Some(b'#'))
        .from_path(path)?;

    reader
        .deserialize::<EnrichedRow>()
        .map(|row| EnrichedTransaction::try_from(row?))
        .collect()
}
