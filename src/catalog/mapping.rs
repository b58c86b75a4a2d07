use std::collections::{BTreeSet, HashMap};
use std::ops::RangeInclusive;

use tracing::{debug, info, warn};

use crate::catalog::{CatalogProduct, CatalogSource};
use crate::models::{CatalogAttributes, Transaction};

/// Catalog attributes keyed by remote product identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductMapping {
    entries: HashMap<u32, CatalogAttributes>
}

impl ProductMapping {
    pub fn from_products(products: impl IntoIterator<Item = CatalogProduct>) -> Self {
        let entries = products
            .into_iter()
            .map(|product| {
                (product.id, CatalogAttributes {
                    category: product.category,
                    brand: product.brand,
                    rating: product.rating
                })
            })
            .collect();

        Self { entries }
    }

    pub fn get(&self, id: u32) -> Option<&CatalogAttributes> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps a sales product id such as `P101` to the catalog identifier `101`.
pub fn remote_identifier(product_id: &str) -> Option<u32> {
    product_id
        .strip_prefix('P')?
        .parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
}

/// Looks up every distinct product referenced by `transactions`, one request at a time.
///
/// Failed or missing lookups simply leave that identifier out of the mapping.
pub async fn fetch_mapping<S: CatalogSource>(source: &S, transactions: &[Transaction]) -> ProductMapping {
    let ids: BTreeSet<u32> = transactions
        .iter()
        .filter_map(|transaction| remote_identifier(transaction.product_id()))
        .collect();

    let mut products = Vec::with_capacity(ids.len());

    for id in ids {
        match source.product(id).await {
            Ok(Some(product)) => products.push(product),
            Ok(None) => debug!("Catalog has no product [{id}]"),
            Err(error) => warn!("Catalog lookup for product [{id}] failed: {error}")
        }
    }

    let mapping = ProductMapping::from_products(products);
    info!("Catalog mapping built with {} products", mapping.len());
    mapping
}

/// Fetches a bounded identifier range in one batch.
pub async fn fetch_mapping_range<S: CatalogSource>(source: &S, range: RangeInclusive<u32>) -> ProductMapping {
    let (start, end) = (*range.start(), *range.end());

    match source.products(range).await {
        Ok(products) => {
            let mapping = ProductMapping::from_products(products);
            info!("Catalog mapping built with {} products from range {start}-{end}", mapping.len());
            mapping
        },
        Err(error) => {
            warn!("Catalog batch {start}-{end} failed: {error}");
            ProductMapping::default()
        }
    }
}
