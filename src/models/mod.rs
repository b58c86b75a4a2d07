mod enriched;
mod errors;
mod transaction;

pub use enriched::{CatalogAttributes, EnrichedTransaction};
pub use errors::ValidationError;
pub use transaction::{ParsedRecord, Transaction};

/// Identifier fields that must carry a fixed leading character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    Transaction,
    Product,
    Customer
}

impl IdField {
    pub fn prefix(&self) -> char {
        match self {
            IdField::Transaction => 'T',
            IdField::Product => 'P',
            IdField::Customer => 'C'
        }
    }
}
