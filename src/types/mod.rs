mod errors;
mod money;

pub use errors::MoneyError;
pub use money::{format_money, parse_money, percentage_of, round_money, Money};
