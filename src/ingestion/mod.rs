mod encoding;
mod errors;
mod loader;
mod parser;
#[cfg(test)]
mod tests;

pub use encoding::TextEncoding;
pub use errors::{IngestionError, ParseError};
pub use loader::{LoadOutcome, Loader};
pub use parser::LineParser;
