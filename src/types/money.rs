use crate::types::errors::MoneyError;
use rust_decimal::Decimal;
use std::str::FromStr;

const DECIMAL_PLACES: u32 = 2;

/// Exact decimal amount used for prices, revenue and percentages.
pub type Money = Decimal;

/// Parses a decimal amount, accepting plain (`12.50`) and scientific (`1.25e1`) notation.
///
/// Thousands separators must already have been removed by the caller.
pub fn parse_money(value: &str) -> Result<Money, MoneyError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(MoneyError::InvalidFormat("Value is an empty string".to_string()));
    }

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|error| MoneyError::InvalidFormat(format!("Value [{value}] is not a number: {error}")))
}

/// Rounds to two decimal places (banker's rounding).
pub fn round_money(value: Money) -> Money {
    value.round_dp(DECIMAL_PLACES)
}

/// Share of `part` in `total` as a percentage rounded to two places, or zero when `total` is zero.
pub fn percentage_of(part: Money, total: Money) -> Money {
    if total.is_zero() {
        return Decimal::ZERO;
    }

    round_money(part / total * Decimal::ONE_HUNDRED)
}

/// Formats an amount as `<symbol>1,234.56`.
pub fn format_money(value: Money, symbol: &str) -> String {
    let rounded = round_money(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{symbol}{grouped}.{fraction}")
}
