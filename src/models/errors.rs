use crate::models::{IdField, ParsedRecord};
use crate::types::Money;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Transaction [{transaction_id}] is missing required field [{field}]")]
    MissingField {
        transaction_id: String,
        field: &'static str
    },
    #[error("Transaction [{transaction_id}] has {field:?} id [{value}] without the required '{prefix}' prefix")]
    InvalidPrefix {
        transaction_id: String,
        field: IdField,
        value: String,
        prefix: char
    },
    #[error("Transaction [{transaction_id}] has non-positive quantity [{quantity}]")]
    NonPositiveQuantity {
        transaction_id: String,
        quantity: i64
    },
    #[error("Transaction [{transaction_id}] has non-positive unit price [{unit_price}]")]
    NonPositiveUnitPrice {
        transaction_id: String,
        unit_price: Money
    },
    #[error("Amount for transaction [{transaction_id}] exceeds the supported maximum")]
    AmountOverflow {
        transaction_id: String
    }
}

impl ValidationError {
    pub fn missing_field(record: &ParsedRecord, field: &'static str) -> Self {
        Self::MissingField {
            transaction_id: record.transaction_id.clone(),
            field
        }
    }

    pub fn invalid_prefix(record: &ParsedRecord, field: IdField, value: &str) -> Self {
        Self::InvalidPrefix {
            transaction_id: record.transaction_id.clone(),
            field,
            value: value.to_string(),
            prefix: field.prefix()
        }
    }

    pub fn non_positive_quantity(record: &ParsedRecord) -> Self {
        Self::NonPositiveQuantity {
            transaction_id: record.transaction_id.clone(),
            quantity: record.quantity
        }
    }

    pub fn non_positive_unit_price(record: &ParsedRecord) -> Self {
        Self::NonPositiveUnitPrice {
            transaction_id: record.transaction_id.clone(),
            unit_price: record.unit_price
        }
    }

    pub fn amount_overflow(record: &ParsedRecord) -> Self {
        Self::AmountOverflow {
            transaction_id: record.transaction_id.clone()
        }
    }
}
