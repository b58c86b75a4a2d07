use crate::models::errors::ValidationError;
use crate::models::IdField;
use crate::types::Money;
use rust_decimal::Decimal;

/// Largest accepted `quantity × unit_price`.
///
/// Aggregates add amounts with plain `Decimal` arithmetic, whose range ends near 7.9e28.
/// With this cap, a sum only overflows after about 7.9e13 transactions.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// A line that has the right shape: eight fields with a numeric quantity and unit price.
///
/// Nothing about its meaning has been checked yet; that happens when it is turned
/// into a [`Transaction`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub transaction_id: String,
    pub date: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub customer_id: String,
    pub region: String
}

/// A validated sales transaction.
///
/// Construction through `TryFrom<ParsedRecord>` is the only way to obtain one, so every
/// instance satisfies the required-field, prefix and positivity rules and has an amount
/// no larger than [`MAX_AMOUNT`]. Values are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    transaction_id: String,
    date: String,
    product_id: String,
    product_name: String,
    quantity: i64,
    unit_price: Money,
    customer_id: String,
    region: String,
    amount: Money
}

impl Transaction {
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// ISO `YYYY-MM-DD`; compared lexically.
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// `quantity × unit_price`.
    pub fn amount(&self) -> Money {
        self.amount
    }
}

impl TryFrom<ParsedRecord> for Transaction {
    type Error = ValidationError;

    fn try_from(record: ParsedRecord) -> Result<Self, Self::Error> {
        let required = [
            ("transaction_id", &record.transaction_id),
            ("date", &record.date),
            ("product_id", &record.product_id),
            ("product_name", &record.product_name),
            ("customer_id", &record.customer_id),
            ("region", &record.region)
        ];

        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::missing_field(&record, *field))
        }

        for (field, value) in [
            (IdField::Transaction, &record.transaction_id),
            (IdField::Product, &record.product_id),
            (IdField::Customer, &record.customer_id)
        ] {
            if !value.starts_with(field.prefix()) {
                return Err(ValidationError::invalid_prefix(&record, field, value))
            }
        }

        if record.quantity <= 0 {
            return Err(ValidationError::non_positive_quantity(&record))
        }

        if record.unit_price <= Decimal::ZERO {
            return Err(ValidationError::non_positive_unit_price(&record))
        }

        let amount = Decimal::from(record.quantity)
            .checked_mul(record.unit_price)
            .filter(|amount| *amount <= Decimal::from(MAX_AMOUNT))
            .ok_or_else(|| ValidationError::amount_overflow(&record))?;

        Ok(Self {
            transaction_id: record.transaction_id,
            date: record.date,
            product_id: record.product_id,
            product_name: record.product_name,
            quantity: record.quantity,
            unit_price: record.unit_price,
            customer_id: record.customer_id,
            region: record.region,
            amount
        })
    }
}
