//! Error types for csvstream

use thiserror::Error;

/// Errors raised while driving a [`CsvStreamer`](crate::CsvStreamer)
///
/// Malformed quoting is never an error: the field splitter recovers from it.
#[derive(Error, Debug)]
pub enum CsvStreamError {
    /// The byte source failed before end of input
    #[error("Upstream read failed: {0}")]
    Upstream(#[from] std::io::Error),

    /// Parser options rejected at construction
    #[error("Invalid parser options: {0}")]
    InvalidOptions(String),

    /// Input or completion signalled after the stream already ended or failed
    #[error("Stream already closed")]
    StreamClosed,

    /// Row could not be serialized to (or deserialized from) JSON
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Downstream consumer refused a row
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Result type for csvstream operations
pub type Result<T> = std::result::Result<T, CsvStreamError>;

impl CsvStreamError {
    /// Whether the error originates from the byte source rather than the parser
    pub fn is_upstream(&self) -> bool {
        matches!(self, CsvStreamError::Upstream(_))
    }
}
