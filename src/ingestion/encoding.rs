use std::fmt::{self, Display, Formatter};
use std::str;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Text encodings the loader can try, in the order given by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 that starts with a byte order mark; the mark is dropped.
    Utf8Bom,
    Utf8,
    /// ISO-8859-1. Every byte sequence decodes, so this is a natural last resort.
    Latin1
}

impl TextEncoding {
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8Bom => bytes
                .strip_prefix(UTF8_BOM)
                .and_then(|rest| str::from_utf8(rest).ok())
                .map(str::to_owned),
            TextEncoding::Utf8 => str::from_utf8(bytes).ok().map(str::to_owned),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&byte| char::from(byte)).collect())
        }
    }

    /// Decodes with the first encoding in `encodings` that accepts the bytes.
    pub fn decode_first(encodings: &[TextEncoding], bytes: &[u8]) -> Option<(TextEncoding, String)> {
        encodings
            .iter()
            .find_map(|encoding| encoding.decode(bytes).map(|text| (*encoding, text)))
    }
}

impl Display for TextEncoding {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Utf8Bom => "utf-8-sig",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1"
        };

        formatter.write_str(name)
    }
}
