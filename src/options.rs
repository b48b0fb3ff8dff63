//! Parser configuration

use crate::error::{CsvStreamError, Result};
use crate::output::OutputEncoding;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Construction options for a [`CsvStreamer`](crate::CsvStreamer)
///
/// Options are fixed once the streamer is built. Setters follow the builder
/// pattern so they can be chained off [`ParserOptions::new`].
///
/// # Examples
///
/// ```
/// use csvstream::{OutputEncoding, ParserOptions};
///
/// let options = ParserOptions::new()
///     .delimiter(b';')
///     .line_terminator("\r\n")
///     .output_encoding(OutputEncoding::Text);
///
/// assert_eq!(options.terminator(), b"\r\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserOptions {
    /// Byte sequence that ends a logical line
    pub line_terminator: Vec<u8>,
    /// Field separator
    pub delimiter: u8,
    /// Quote character, doubled inside a quoted field to escape itself
    pub quote_char: u8,
    /// Value substituted for empty fields
    pub empty_value: String,
    /// Representation handed to the sink for every row
    pub output_encoding: OutputEncoding,
    /// Force structured rows regardless of `output_encoding`
    pub object_mode: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            line_terminator: b"\n".to_vec(),
            delimiter: b',',
            quote_char: b'"',
            empty_value: String::new(),
            output_encoding: OutputEncoding::Raw,
            object_mode: false,
        }
    }
}

impl ParserOptions {
    /// Create options with the defaults: `\n`, `,`, `"`, raw JSON output
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line terminator (builder pattern)
    pub fn line_terminator(mut self, terminator: impl AsRef<[u8]>) -> Self {
        self.line_terminator = terminator.as_ref().to_vec();
        self
    }

    /// Set custom delimiter (builder pattern)
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Set custom quote character (builder pattern)
    pub fn quote_char(mut self, quote: u8) -> Self {
        self.quote_char = quote;
        self
    }

    /// Set the value used for empty fields (builder pattern)
    pub fn empty_value(mut self, value: impl Into<String>) -> Self {
        self.empty_value = value.into();
        self
    }

    /// Select the output representation (builder pattern)
    pub fn output_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.output_encoding = encoding;
        self
    }

    /// Force structured rows (builder pattern)
    pub fn object_mode(mut self, enabled: bool) -> Self {
        self.object_mode = enabled;
        self
    }

    /// The configured line terminator
    pub fn terminator(&self) -> &[u8] {
        &self.line_terminator
    }

    /// Encoding actually applied to rows, with `object_mode` taken into account
    pub fn effective_encoding(&self) -> OutputEncoding {
        if self.object_mode {
            OutputEncoding::Structured
        } else {
            self.output_encoding
        }
    }

    /// Check the options for combinations the scanner cannot handle
    pub fn validate(&self) -> Result<()> {
        if self.line_terminator.is_empty() {
            return Err(CsvStreamError::InvalidOptions(
                "line terminator must not be empty".to_string(),
            ));
        }
        if !self.delimiter.is_ascii() || !self.quote_char.is_ascii() {
            return Err(CsvStreamError::InvalidOptions(
                "delimiter and quote character must be ASCII".to_string(),
            ));
        }
        if self.delimiter == self.quote_char {
            return Err(CsvStreamError::InvalidOptions(format!(
                "delimiter and quote character are both {:?}",
                self.delimiter as char
            )));
        }
        if self.line_terminator.contains(&self.quote_char) {
            return Err(CsvStreamError::InvalidOptions(
                "line terminator must not contain the quote character".to_string(),
            ));
        }
        if self.line_terminator.contains(&self.delimiter) {
            return Err(CsvStreamError::InvalidOptions(
                "line terminator must not contain the delimiter".to_string(),
            ));
        }
        Ok(())
    }
}
