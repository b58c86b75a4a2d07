use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("Money error: {0}")]
    InvalidFormat(String)
}
