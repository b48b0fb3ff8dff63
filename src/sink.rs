//! Downstream consumers of parsed rows
//!
//! A [`RowSink`] receives every row in input order together with the line
//! number it was assigned, followed by exactly one of [`RowSink::end`] or
//! [`RowSink::error`].

use crate::error::{CsvStreamError, Result};
use crate::output::Output;
use std::collections::VecDeque;

/// Receiver for rows produced by a [`CsvStreamer`](crate::CsvStreamer)
pub trait RowSink {
    /// Accept one row; `line_no` already counts this row
    ///
    /// Returning an error stops the current `write` call; the rows after it in
    /// the same chunk stay buffered in the streamer.
    fn row(&mut self, output: Output, line_no: u64) -> Result<()>;

    /// End of input, after the last row
    fn end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Upstream failure, forwarded unchanged
    fn error(&mut self, _error: &CsvStreamError) {}
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn row(&mut self, output: Output, line_no: u64) -> Result<()> {
        (**self).row(output, line_no)
    }

    fn end(&mut self) -> Result<()> {
        (**self).end()
    }

    fn error(&mut self, error: &CsvStreamError) {
        (**self).error(error)
    }
}

/// FIFO sink for pull-style consumption
///
/// # Examples
///
/// ```
/// use csvstream::{CsvStreamer, ParserOptions, RowQueue};
///
/// let mut parser = CsvStreamer::new(ParserOptions::new().object_mode(true)).unwrap();
/// let mut queue = RowQueue::new();
///
/// parser.write(b"a,b\nc,d\n", &mut queue).unwrap();
/// while let Some((row, line_no)) = queue.pop() {
///     println!("{line_no}: {:?}", row);
/// }
/// ```
#[derive(Debug, Default)]
pub struct RowQueue {
    rows: VecDeque<(Output, u64)>,
    ended: bool,
    failed: Option<String>,
}

impl RowQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest row and its line number
    pub fn pop(&mut self) -> Option<(Output, u64)> {
        self.rows.pop_front()
    }

    /// Number of rows waiting to be read
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows are waiting
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether end of input was signalled
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Message of the upstream failure, if one was signalled
    pub fn failure(&self) -> Option<&str> {
        self.failed.as_deref()
    }

    /// Drain every waiting row, dropping line numbers
    pub fn drain(&mut self) -> impl Iterator<Item = Output> + '_ {
        self.rows.drain(..).map(|(output, _)| output)
    }
}

impl RowSink for RowQueue {
    fn row(&mut self, output: Output, line_no: u64) -> Result<()> {
        self.rows.push_back((output, line_no));
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.ended = true;
        Ok(())
    }

    fn error(&mut self, error: &CsvStreamError) {
        self.failed = Some(error.to_string());
    }
}

/// Push-style sink wrapping a closure
///
/// ```
/// use csvstream::{CsvStreamer, FnSink, ParserOptions};
///
/// let mut count = 0;
/// let mut parser = CsvStreamer::new(ParserOptions::new()).unwrap();
/// let mut sink = FnSink::new(|_row, line_no| {
///     count = line_no;
///     Ok(())
/// });
/// parser.write(b"a\nb\n", &mut sink).unwrap();
/// parser.finish(&mut sink).unwrap();
/// drop(sink);
/// assert_eq!(count, 2);
/// ```
pub struct FnSink<F> {
    on_row: F,
}

impl<F> FnSink<F>
where
    F: FnMut(Output, u64) -> Result<()>,
{
    /// Wrap `on_row`
    pub fn new(on_row: F) -> Self {
        Self { on_row }
    }
}

impl<F> RowSink for FnSink<F>
where
    F: FnMut(Output, u64) -> Result<()>,
{
    fn row(&mut self, output: Output, line_no: u64) -> Result<()> {
        (self.on_row)(output, line_no)
    }
}

/// Sink that drops every row, for collect-only use
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl RowSink for Discard {
    fn row(&mut self, _output: Output, _line_no: u64) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = RowQueue::new();
        queue.row(Output::Text("[\"a\"]".into()), 1).unwrap();
        queue.row(Output::Text("[\"b\"]".into()), 2).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some((Output::Text("[\"a\"]".into()), 1)));
        assert_eq!(queue.pop(), Some((Output::Text("[\"b\"]".into()), 2)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_records_signals() {
        let mut queue = RowQueue::new();
        assert!(!queue.is_ended());
        queue.error(&CsvStreamError::StreamClosed);
        assert_eq!(queue.failure(), Some("Stream already closed"));
        queue.end().unwrap();
        assert!(queue.is_ended());
    }

    #[test]
    fn test_fn_sink_forwards_errors() {
        let mut sink = FnSink::new(|_, line_no| {
            if line_no > 1 {
                Err(CsvStreamError::Sink("full".into()))
            } else {
                Ok(())
            }
        });
        assert!(sink.row(Output::Row(vec![]), 1).is_ok());
        assert!(sink.row(Output::Row(vec![]), 2).is_err());
    }
}
