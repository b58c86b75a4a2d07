use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::ingestion::parser::FIELD_DELIMITER;
use crate::ingestion::{IngestionError, LineParser, TextEncoding};
use crate::models::ParsedRecord;

const HEADER_PREFIX: &str = "transaction";

/// Result of reading and parsing a sales file.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Successfully parsed records, in file order.
    pub records: Vec<ParsedRecord>,
    /// Non-blank, non-header lines handed to the parser.
    pub total_parsed: usize,
    /// Lines the parser rejected.
    pub parse_failures: usize,
    /// Encoding that decoded the file.
    pub encoding: TextEncoding
}

/// Reads a sales file and runs every data line through a [`LineParser`].
#[derive(Debug, Clone)]
pub struct Loader {
    parser: LineParser,
    encodings: Vec<TextEncoding>
}

impl Loader {
    pub fn new(parser: LineParser, encodings: Vec<TextEncoding>) -> Self {
        Self {
            parser,
            encodings
        }
    }

    /// Loads `path`, trying each configured encoding in turn.
    ///
    /// # Errors
    /// - [`IngestionError::FileNotFound`] if the path does not exist.
    /// - [`IngestionError::FileNotReadable`] if it cannot be read or none of the encodings decode it.
    ///
    /// Individual malformed lines are never errors; they are counted in [`LoadOutcome::parse_failures`].
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadOutcome, IngestionError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(IngestionError::FileNotFound { path: path.to_path_buf() })
        }

        let bytes = fs::read(path).map_err(|error| IngestionError::FileNotReadable {
            path: path.to_path_buf(),
            reason: error.to_string()
        })?;

        let (encoding, text) = TextEncoding::decode_first(&self.encodings, &bytes)
            .ok_or_else(|| IngestionError::FileNotReadable {
                path: path.to_path_buf(),
                reason: format!("no encoding in {} could decode it", self.encoding_names())
            })?;

        debug!("Decoded {} as {encoding}", path.display());

        let (records, total_parsed, parse_failures) = self.parse_text(&text);

        info!("Loaded {} records from {} ({total_parsed} lines, {parse_failures} unparseable)", records.len(), path.display());

        Ok(LoadOutcome {
            records,
            total_parsed,
            parse_failures,
            encoding
        })
    }

    /// Parses already-decoded text, returning `(records, total_parsed, parse_failures)`.
    pub fn parse_text(&self, text: &str) -> (Vec<ParsedRecord>, usize, usize) {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .peekable();

        if lines.next_if(|(_, line)| is_header(line)).is_some() {
            debug!("Skipping header line");
        }

        let mut records = Vec::new();
        let mut total_parsed = 0;
        let mut parse_failures = 0;

        for (index, line) in lines {
            total_parsed += 1;

            match self.parser.parse(line) {
                Ok(record) => records.push(record),
                Err(error) => {
                    parse_failures += 1;
                    debug!("Line {} skipped: {error}", index + 1);
                }
            }
        }

        (records, total_parsed, parse_failures)
    }

    fn encoding_names(&self) -> String {
        let names: Vec<String> = self.encodings.iter().map(ToString::to_string).collect();
        format!("[{}]", names.join(", "))
    }
}

fn is_header(line: &str) -> bool {
    line.split(FIELD_DELIMITER)
        .next()
        .is_some_and(|token| token.trim().to_lowercase().starts_with(HEADER_PREFIX))
}
