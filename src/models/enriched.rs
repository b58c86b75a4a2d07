use crate::models::Transaction;

/// Catalog attributes attached to a transaction whose product was found remotely.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogAttributes {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<f64>
}

/// A validated transaction together with the outcome of its catalog lookup.
///
/// `catalog` is `None` when the product id could not be mapped or the lookup missed.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub catalog: Option<CatalogAttributes>
}

impl EnrichedTransaction {
    pub fn matched(transaction: Transaction, attributes: CatalogAttributes) -> Self {
        Self {
            transaction,
            catalog: Some(attributes)
        }
    }

    pub fn unmatched(transaction: Transaction) -> Self {
        Self {
            transaction,
            catalog: None
        }
    }

    pub fn is_matched(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn category(&self) -> Option<&str> {
        self.catalog.as_ref().and_then(|catalog| catalog.category.as_deref())
    }

    pub fn brand(&self) -> Option<&str> {
        self.catalog.as_ref().and_then(|catalog| catalog.brand.as_deref())
    }

    pub fn rating(&self) -> Option<f64> {
        self.catalog.as_ref().and_then(|catalog| catalog.rating)
    }
}
