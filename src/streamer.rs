//! Incremental CSV stream parser
//!
//! [`CsvStreamer`] accepts bytes in arbitrarily sized chunks and delivers one
//! row per logical line to a [`RowSink`] as soon as the line is complete.
//! Memory use is bounded by the longest line, plus the whole document when a
//! completion callback asks for it.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --write--> Scanning --write--> Scanning
//!   |                 |
//!   +---finish--------+--> Completed
//!   +---fail / sink error--> Failed
//! ```
//!
//! `Completed` and `Failed` are terminal. Any `write`, `finish` or `fail` after
//! them returns [`CsvStreamError::StreamClosed`] and has no other effect.

use crate::collector::{Collector, OnComplete};
use crate::csv::{CsvParser, LineScanner};
use crate::error::{CsvStreamError, Result};
use crate::options::ParserOptions;
use crate::output::{OutputEncoder, OutputEncoding};
use crate::sink::RowSink;
use crate::Row;
use tracing::{debug, trace, warn};

/// Lifecycle state of a [`CsvStreamer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Constructed, no input yet
    Idle,
    /// At least one chunk accepted
    Scanning,
    /// End of input processed, completion delivered
    Completed,
    /// Upstream or downstream failure delivered
    Failed,
}

/// Line-to-output half of the streamer: split, count, collect, encode
#[derive(Debug)]
struct RowPipeline {
    parser: CsvParser,
    encoder: OutputEncoder,
    collector: Collector,
    line_no: u64,
}

impl RowPipeline {
    fn emit<S: RowSink + ?Sized>(&mut self, line: &[u8], sink: &mut S) -> Result<()> {
        let row = self.parser.parse_line(line);

        let output = if self.collector.is_collecting() {
            let output = self.encoder.encode(row.clone())?;
            self.collector.push(&row);
            output
        } else {
            self.encoder.encode(row)?
        };

        self.line_no += 1;
        trace!(line_no = self.line_no, "row parsed");
        sink.row(output, self.line_no)
    }
}

/// Chunk-driven CSV parser producing one output per logical line
///
/// # Examples
///
/// ```
/// use csvstream::{CsvStreamer, ParserOptions, RowQueue};
///
/// let mut parser = CsvStreamer::new(ParserOptions::new().object_mode(true))?;
/// let mut rows = RowQueue::new();
///
/// parser.write(b"a,b\nc,\"d", &mut rows)?;
/// parser.write(b",e\"\n", &mut rows)?;
/// parser.finish(&mut rows)?;
///
/// assert_eq!(parser.line_no(), 2);
/// let second = rows.drain().nth(1).unwrap().into_row()?;
/// assert_eq!(second, vec!["c", "d,e"]);
/// # Ok::<(), csvstream::CsvStreamError>(())
/// ```
///
/// # Collecting the whole document
///
/// ```
/// use csvstream::{CsvStreamer, Discard, ParserOptions};
/// use std::sync::mpsc;
///
/// let (tx, rx) = mpsc::channel();
/// let mut parser = CsvStreamer::with_callback(ParserOptions::new(), move |result| {
///     tx.send(result.map(|rows| rows.to_vec()).map_err(|e| e.to_string())).unwrap();
/// })?;
///
/// parser.write(b"x,y\n1,2", &mut Discard)?;
/// parser.finish(&mut Discard)?;
///
/// assert_eq!(rx.recv().unwrap().unwrap(), vec![vec!["x", "y"], vec!["1", "2"]]);
/// # Ok::<(), csvstream::CsvStreamError>(())
/// ```
#[derive(Debug)]
pub struct CsvStreamer {
    options: ParserOptions,
    scanner: LineScanner,
    pipeline: RowPipeline,
    state: StreamState,
}

impl CsvStreamer {
    /// Create a streaming-only parser: rows go to the sink and are not kept
    pub fn new(options: ParserOptions) -> Result<Self> {
        Self::build(options, None)
    }

    /// Create a parser that also collects every row and reports the whole
    /// document to `on_complete` exactly once
    pub fn with_callback<F>(options: ParserOptions, on_complete: F) -> Result<Self>
    where
        F: FnOnce(std::result::Result<&[Row], &CsvStreamError>) + Send + 'static,
    {
        Self::build(options, Some(Box::new(on_complete)))
    }

    fn build(options: ParserOptions, on_complete: Option<OnComplete>) -> Result<Self> {
        options.validate()?;

        let encoding = options.effective_encoding();
        debug!(
            terminator = ?String::from_utf8_lossy(options.terminator()),
            delimiter = %(options.delimiter as char),
            ?encoding,
            collecting = on_complete.is_some(),
            "csv streamer created"
        );

        Ok(CsvStreamer {
            scanner: LineScanner::new(options.terminator(), options.quote_char),
            pipeline: RowPipeline {
                parser: CsvParser::new(options.delimiter, options.quote_char)
                    .with_empty_value(options.empty_value.clone()),
                encoder: OutputEncoder::new(encoding),
                collector: Collector::new(on_complete),
                line_no: 0,
            },
            options,
            state: StreamState::Idle,
        })
    }

    /// Feed one chunk, delivering every line it completes
    pub fn write<S: RowSink + ?Sized>(&mut self, chunk: &[u8], sink: &mut S) -> Result<()> {
        self.ensure_open()?;
        self.state = StreamState::Scanning;

        let pipeline = &mut self.pipeline;
        let result = self
            .scanner
            .ingest(chunk, |line| pipeline.emit(line, &mut *sink));

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                self.abort(&e);
                Err(e)
            }
        }
    }

    /// Signal end of input
    ///
    /// A non-empty residual line is emitted as the last row, then the sink's
    /// `end` runs and the completion callback (if any) receives the rows.
    pub fn finish<S: RowSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.ensure_open()?;

        if let Some(line) = self.scanner.flush() {
            debug!(bytes = line.len(), "flushing unterminated final line");
            if let Err(e) = self.pipeline.emit(&line, sink) {
                self.abort(&e);
                return Err(e);
            }
        }

        if let Err(e) = sink.end() {
            self.abort(&e);
            return Err(e);
        }

        self.state = StreamState::Completed;
        self.pipeline.collector.complete();
        debug!(rows = self.pipeline.line_no, "csv stream completed");
        Ok(())
    }

    /// Signal an upstream failure
    ///
    /// The error goes to the sink and to the completion callback; nothing
    /// buffered is emitted.
    pub fn fail<S: RowSink + ?Sized>(&mut self, error: CsvStreamError, sink: &mut S) -> Result<()> {
        self.ensure_open()?;

        warn!(%error, rows = self.pipeline.line_no, "csv stream failed upstream");
        sink.error(&error);
        self.abort(&error);
        Ok(())
    }

    /// Rows emitted so far
    pub fn line_no(&self) -> u64 {
        self.pipeline.line_no
    }

    /// Rows collected so far; always empty without a completion callback
    pub fn collected(&self) -> &[Row] {
        self.pipeline.collector.rows()
    }

    /// Whether a completion callback was configured
    pub fn is_collecting(&self) -> bool {
        self.pipeline.collector.is_collecting()
    }

    /// Current lifecycle state
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Options this streamer was built with
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Encoding applied to emitted rows
    pub fn encoding(&self) -> OutputEncoding {
        self.pipeline.encoder.encoding()
    }

    /// Bytes of the unterminated line currently buffered
    pub fn pending_len(&self) -> usize {
        self.scanner.pending().len()
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            StreamState::Completed | StreamState::Failed => Err(CsvStreamError::StreamClosed),
            StreamState::Idle | StreamState::Scanning => Ok(()),
        }
    }

    fn abort(&mut self, error: &CsvStreamError) {
        self.state = StreamState::Failed;
        self.scanner.clear();
        self.pipeline.collector.fail(error);
    }
}
