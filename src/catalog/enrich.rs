use std::collections::BTreeSet;

use crate::catalog::{remote_identifier, ProductMapping};
use crate::models::{EnrichedTransaction, Transaction};
use crate::types::{percentage_of, Money};

/// Attaches catalog attributes to each transaction whose product is in `mapping`.
pub fn enrich(transactions: &[Transaction], mapping: &ProductMapping) -> Vec<EnrichedTransaction> {
    transactions
        .iter()
        .map(|transaction| {
            match remote_identifier(transaction.product_id()).and_then(|id| mapping.get(id)) {
                Some(attributes) => EnrichedTransaction::matched(transaction.clone(), attributes.clone()),
                None => EnrichedTransaction::unmatched(transaction.clone())
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnrichmentSummary {
    pub matched: usize,
    pub total: usize,
    /// Percentage of transactions matched, 0-100.
    pub success_rate: Money,
    /// Distinct product ids that could not be enriched, sorted.
    pub unmatched_products: Vec<String>
}

impl EnrichmentSummary {
    pub fn from_enriched(enriched: &[EnrichedTransaction]) -> Self {
        let matched = enriched.iter().filter(|transaction| transaction.is_matched()).count();

        let unmatched_products: BTreeSet<&str> = enriched
            .iter()
            .filter(|transaction| !transaction.is_matched())
            .map(|transaction| transaction.transaction.product_id())
            .collect();

        Self {
            matched,
            total: enriched.len(),
            success_rate: percentage_of(Money::from(matched), Money::from(enriched.len())),
            unmatched_products: unmatched_products.into_iter().map(str::to_string).collect()
        }
    }
}
