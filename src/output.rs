//! Row output representations

use crate::error::Result;
use crate::Row;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How each parsed row is handed downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OutputEncoding {
    /// JSON array literal as undecoded UTF-8 bytes
    #[default]
    Raw,
    /// JSON array literal as a `String`
    Text,
    /// The field list itself, no serialization
    Structured,
}

/// A single row as delivered to a [`RowSink`](crate::RowSink)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Structured field list
    Row(Row),
    /// JSON text, e.g. `["a","b"]`
    Text(String),
    /// JSON bytes
    Raw(Vec<u8>),
}

impl Output {
    /// Recover the field list, deserializing the JSON forms
    ///
    /// # Examples
    ///
    /// ```
    /// use csvstream::Output;
    ///
    /// let out = Output::Text(r#"["a","b,c"]"#.to_string());
    /// assert_eq!(out.into_row().unwrap(), vec!["a", "b,c"]);
    /// ```
    pub fn into_row(self) -> Result<Row> {
        match self {
            Output::Row(row) => Ok(row),
            Output::Text(text) => Ok(serde_json::from_str(&text)?),
            Output::Raw(bytes) => Ok(serde_json::from_slice(&bytes)?),
        }
    }

    /// Borrow the field list when the output is structured
    pub fn as_row(&self) -> Option<&Row> {
        match self {
            Output::Row(row) => Some(row),
            _ => None,
        }
    }

    /// Bytes to write to a byte-oriented consumer
    ///
    /// Structured rows are serialized on demand.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Output::Row(row) => Ok(serde_json::to_vec(row)?),
            Output::Text(text) => Ok(text.clone().into_bytes()),
            Output::Raw(bytes) => Ok(bytes.clone()),
        }
    }

    /// Encoding this value was produced with
    pub fn encoding(&self) -> OutputEncoding {
        match self {
            Output::Row(_) => OutputEncoding::Structured,
            Output::Text(_) => OutputEncoding::Text,
            Output::Raw(_) => OutputEncoding::Raw,
        }
    }
}

/// Renders parsed rows into the configured [`OutputEncoding`]
#[derive(Debug, Clone, Copy)]
pub struct OutputEncoder {
    encoding: OutputEncoding,
}

impl OutputEncoder {
    /// Create an encoder for `encoding`
    pub fn new(encoding: OutputEncoding) -> Self {
        Self { encoding }
    }

    /// The encoding this encoder produces
    pub fn encoding(&self) -> OutputEncoding {
        self.encoding
    }

    /// Encode a row
    pub fn encode(&self, row: Row) -> Result<Output> {
        match self.encoding {
            OutputEncoding::Structured => Ok(Output::Row(row)),
            OutputEncoding::Text => Ok(Output::Text(serde_json::to_string(&row)?)),
            OutputEncoding::Raw => Ok(Output::Raw(serde_json::to_vec(&row)?)),
        }
    }
}
