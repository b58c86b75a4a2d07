//! Remote product-catalog lookups and transaction enrichment.
//!
//! The pipeline only depends on [`CatalogSource`]; [`HttpCatalogClient`] is the
//! production implementation against a DummyJSON-style products API.

mod client;
mod enrich;
mod errors;
mod mapping;
mod output;
#[cfg(test)]
mod tests;

use std::ops::RangeInclusive;

use serde::Deserialize;
use tracing::warn;

pub use client::HttpCatalogClient;
pub use enrich::{enrich, EnrichmentSummary};
pub use errors::{CatalogError, EnrichedFileError};
pub use mapping::{fetch_mapping, fetch_mapping_range, remote_identifier, ProductMapping};
pub use output::write_enriched;
#[cfg(test)]
pub use output::read_enriched;

/// One product as returned by the catalog. Unknown JSON fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogProduct {
    pub id: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>
}

pub trait CatalogSource {
    /// Looks up a single product. `Ok(None)` means the catalog has no such product.
    async fn product(&self, id: u32) -> Result<Option<CatalogProduct>, CatalogError>;

    /// Fetches every available product whose identifier falls in `range`.
    ///
    /// The default looks identifiers up one at a time; a failed lookup is logged and
    /// skipped rather than failing the batch.
    async fn products(&self, range: RangeInclusive<u32>) -> Result<Vec<CatalogProduct>, CatalogError> {
        let mut products = Vec::new();

        for id in range {
            match self.product(id).await {
                Ok(Some(product)) => products.push(product),
                Ok(None) => {},
                Err(error) => warn!("Catalog lookup for product [{id}] failed: {error}")
            }
        }

        Ok(products)
    }
}
