use crate::ingestion::ParseError;
use crate::models::ParsedRecord;
use crate::types::parse_money;

pub const FIELD_DELIMITER: char = '|';
pub const FIELD_COUNT: usize = 8;

/// Turns one pipe-delimited line into a [`ParsedRecord`].
///
/// Only the shape is checked here: the field count and whether quantity and unit price
/// are numbers. Identifier prefixes and positivity are left to validation.
#[derive(Debug, Clone)]
pub struct LineParser {
    thousands_separators: Vec<char>
}

impl LineParser {
    pub fn new(thousands_separators: impl Into<Vec<char>>) -> Self {
        Self {
            thousands_separators: thousands_separators.into()
        }
    }

    pub fn parse(&self, line: &str) -> Result<ParsedRecord, ParseError> {
        let fields: Vec<&str> = line.trim().split(FIELD_DELIMITER).map(str::trim).collect();

        let [transaction_id, date, product_id, product_name, quantity, unit_price, customer_id, region] =
            <[&str; FIELD_COUNT]>::try_from(fields.as_slice()).map_err(|_| ParseError::FieldCount {
                expected: FIELD_COUNT,
                found: fields.len()
            })?;

        let quantity = self.strip_separators(quantity)
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidQuantity(quantity.to_string()))?;

        let unit_price = parse_money(&self.strip_separators(unit_price))
            .map_err(|_| ParseError::InvalidUnitPrice(unit_price.to_string()))?;

        Ok(ParsedRecord {
            transaction_id: transaction_id.to_string(),
            date: date.to_string(),
            product_id: product_id.to_string(),
            product_name: self.strip_separators(product_name),
            quantity,
            unit_price,
            customer_id: customer_id.to_string(),
            region: region.to_string()
        })
    }

    fn strip_separators(&self, value: &str) -> String {
        value
            .chars()
            .filter(|character| !self.thousands_separators.contains(character))
            .collect::<String>()
            .trim()
            .to_string()
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new([','])
    }
}
