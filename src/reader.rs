//! Pull-based CSV reading from any `std::io::Read`
//!
//! The reader pulls fixed-size chunks from its source, pushes them through a
//! [`CsvStreamer`] and hands out rows one at a time. Memory stays bounded by
//! the chunk size plus the longest line, whatever the file size.

use crate::error::{CsvStreamError, Result};
use crate::options::ParserOptions;
use crate::output::Output;
use crate::sink::{RowQueue, RowSink};
use crate::streamer::CsvStreamer;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::debug;

/// Default number of bytes requested from the source per read
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Streaming CSV reader over any byte source
///
/// # Examples
///
/// ```no_run
/// use csvstream::CsvReader;
///
/// let mut reader = CsvReader::open("data.csv").unwrap();
///
/// for row_result in reader.rows() {
///     let row = row_result.unwrap().into_row().unwrap();
///     println!("{:?}", row);
/// }
/// ```
pub struct CsvReader<R: Read> {
    source: R,
    streamer: CsvStreamer,
    queue: RowQueue,
    buffer: Vec<u8>,
    done: bool,
}

impl CsvReader<File> {
    /// Open a CSV file with structured output and default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            CsvStreamError::Upstream(std::io::Error::new(
                e.kind(),
                format!("Failed to open CSV file {}: {}", path.as_ref().display(), e),
            ))
        })?;
        CsvReader::new(file, ParserOptions::new().object_mode(true))
    }
}

impl<R: Read> CsvReader<R> {
    /// Wrap `source` with a streaming-only parser built from `options`
    pub fn new(source: R, options: ParserOptions) -> Result<Self> {
        Ok(Self::from_streamer(source, CsvStreamer::new(options)?))
    }

    /// Wrap `source` with an already configured streamer
    pub fn from_streamer(source: R, streamer: CsvStreamer) -> Self {
        CsvReader {
            source,
            streamer,
            queue: RowQueue::new(),
            buffer: vec![0; DEFAULT_CHUNK_SIZE],
            done: false,
        }
    }

    /// Set how many bytes are requested per read (builder pattern)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.buffer = vec![0; size.max(1)];
        self
    }

    /// Read a single row
    ///
    /// Returns `Ok(None)` when the source is exhausted.
    pub fn read_row(&mut self) -> Result<Option<Output>> {
        loop {
            if let Some((output, _)) = self.queue.pop() {
                return Ok(Some(output));
            }
            if self.done {
                return Ok(None);
            }

            let n = match self.source.read(&mut self.buffer) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    self.streamer.fail(copy_io_error(&e), &mut self.queue)?;
                    return Err(CsvStreamError::Upstream(e));
                }
            };

            let result = if n == 0 {
                self.done = true;
                self.streamer.finish(&mut self.queue)
            } else {
                self.streamer.write(&self.buffer[..n], &mut self.queue)
            };
            if let Err(e) = result {
                self.done = true;
                return Err(e);
            }
        }
    }

    /// Get iterator over rows
    pub fn rows(&mut self) -> CsvRowIterator<'_, R> {
        CsvRowIterator { reader: self }
    }

    /// Rows parsed so far, including any not yet handed out
    pub fn line_no(&self) -> u64 {
        self.streamer.line_no()
    }

    /// The underlying streamer
    pub fn streamer(&self) -> &CsvStreamer {
        &self.streamer
    }
}

/// Iterator over CSV rows
pub struct CsvRowIterator<'a, R: Read> {
    reader: &'a mut CsvReader<R>,
}

impl<'a, R: Read> Iterator for CsvRowIterator<'a, R> {
    type Item = Result<Output>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row().transpose()
    }
}

/// Drive `streamer` to completion from `source`, pushing rows into `sink`
///
/// Read failures are delivered through [`CsvStreamer::fail`] and also
/// returned. Returns the final row count.
pub fn parse_reader<R, S>(
    mut source: R,
    streamer: &mut CsvStreamer,
    sink: &mut S,
    chunk_size: usize,
) -> Result<u64>
where
    R: Read,
    S: RowSink + ?Sized,
{
    let mut buffer = vec![0; chunk_size.max(1)];
    let mut chunks = 0u64;

    loop {
        let n = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                streamer.fail(copy_io_error(&e), sink)?;
                return Err(CsvStreamError::Upstream(e));
            }
        };
        streamer.write(&buffer[..n], sink)?;
        chunks += 1;
    }

    streamer.finish(sink)?;
    debug!(chunks, rows = streamer.line_no(), "reader exhausted");
    Ok(streamer.line_no())
}

/// `io::Error` is not `Clone`; keep kind and message for the second owner
pub(crate) fn copy_io_error(e: &std::io::Error) -> CsvStreamError {
    CsvStreamError::Upstream(std::io::Error::new(e.kind(), e.to_string()))
}
