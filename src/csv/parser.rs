//! Field splitting for a single logical line

use crate::Row;

/// Splits one logical line (terminator already stripped) into fields
///
/// Quoting follows RFC 4180 with lenient recovery: ragged or unterminated
/// quotes never fail, they only change where the current field ends.
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
    quote_char: u8,
    empty_value: String,
}

impl CsvParser {
    /// Splitter for `delimiter`-separated fields quoted with `quote_char`
    pub fn new(delimiter: u8, quote_char: u8) -> Self {
        Self {
            delimiter,
            quote_char,
            empty_value: String::new(),
        }
    }

    /// Substitute `value` for fields that end up empty
    pub fn with_empty_value(mut self, value: impl Into<String>) -> Self {
        self.empty_value = value.into();
        self
    }

    /// Split `line` into fields, removing quotes and collapsing `""`
    pub fn parse_line(&self, line: &[u8]) -> Row {
        let mut fields = Vec::new();
        let mut current_field: Vec<u8> = Vec::new();
        let mut in_quotes = false;
        let mut bytes = line.iter().copied().peekable();

        while let Some(byte) = bytes.next() {
            if byte == self.quote_char {
                if in_quotes {
                    if bytes.peek() == Some(&self.quote_char) {
                        // "" inside a quoted span
                        current_field.push(self.quote_char);
                        bytes.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            } else if byte == self.delimiter && !in_quotes {
                fields.push(self.finish_field(&current_field));
                current_field.clear();
            } else {
                current_field.push(byte);
            }
        }

        fields.push(self.finish_field(&current_field));
        fields
    }

    fn finish_field(&self, raw: &[u8]) -> String {
        if raw.is_empty() {
            self.empty_value.clone()
        } else {
            String::from_utf8_lossy(raw).into_owned()
        }
    }
}
