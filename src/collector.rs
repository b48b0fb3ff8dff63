//! Whole-document collection with an exactly-once completion callback

use crate::error::CsvStreamError;
use crate::Row;

/// Completion callback: `Ok(rows)` after a clean end of input, `Err(e)` on
/// upstream failure
pub type OnComplete = Box<dyn FnOnce(Result<&[Row], &CsvStreamError>) + Send>;

/// Row accumulator, active only when a completion callback was supplied
pub enum Collector {
    /// Rows are emitted downstream and never stored
    StreamingOnly,
    /// Rows are emitted and also appended to `rows`
    Collecting {
        rows: Vec<Row>,
        on_complete: Option<OnComplete>,
    },
}

impl Collector {
    /// Collector for `on_complete`, or a streaming-only one when `None`
    pub fn new(on_complete: Option<OnComplete>) -> Self {
        match on_complete {
            Some(callback) => Collector::Collecting {
                rows: Vec::new(),
                on_complete: Some(callback),
            },
            None => Collector::StreamingOnly,
        }
    }

    /// Whether rows are being stored
    pub fn is_collecting(&self) -> bool {
        matches!(self, Collector::Collecting { .. })
    }

    /// Store a copy of `row` when collecting
    pub fn push(&mut self, row: &Row) {
        if let Collector::Collecting { rows, .. } = self {
            rows.push(row.clone());
        }
    }

    /// Rows collected so far (always empty for streaming-only)
    pub fn rows(&self) -> &[Row] {
        match self {
            Collector::Collecting { rows, .. } => rows,
            Collector::StreamingOnly => &[],
        }
    }

    /// Fire the callback with the collected rows
    ///
    /// Returns `false` if the callback already ran or none was configured.
    pub fn complete(&mut self) -> bool {
        match self {
            Collector::Collecting { rows, on_complete } => match on_complete.take() {
                Some(callback) => {
                    callback(Ok(rows.as_slice()));
                    true
                }
                None => false,
            },
            Collector::StreamingOnly => false,
        }
    }

    /// Fire the callback with `error`
    ///
    /// Returns `false` if the callback already ran or none was configured.
    pub fn fail(&mut self, error: &CsvStreamError) -> bool {
        match self {
            Collector::Collecting { on_complete, .. } => match on_complete.take() {
                Some(callback) => {
                    callback(Err(error));
                    true
                }
                None => false,
            },
            Collector::StreamingOnly => false,
        }
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collector::StreamingOnly => f.write_str("StreamingOnly"),
            Collector::Collecting { rows, on_complete } => f
                .debug_struct("Collecting")
                .field("rows", &rows.len())
                .field("pending_callback", &on_complete.is_some())
                .finish(),
        }
    }
}
