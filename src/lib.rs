//! # csvstream
//!
//! Incremental CSV parsing for byte streams that arrive in arbitrary chunks.
//!
//! Bytes are pushed into a [`CsvStreamer`] as they arrive. Every complete
//! logical line is split into fields and delivered to a [`RowSink`]
//! immediately, so memory stays bounded by the longest line instead of the
//! document size. Chunk boundaries may fall anywhere: inside a quoted field,
//! between the two bytes of a `\r\n` terminator, or in the middle of a
//! doubled quote.
//!
//! ## Features
//!
//! - Quote-aware line scanning: terminators and delimiters inside quoted
//!   fields are literal, `""` escapes a quote
//! - Lenient recovery: ragged quoting never fails a parse
//! - Structured rows, JSON text or JSON bytes per row
//! - Optional whole-document collection with an exactly-once completion
//!   callback
//! - Pull-style [`CsvReader`] over any `std::io::Read`
//! - Async driver over `tokio::io::AsyncRead` (feature `tokio`)
//!
//! ## Push-style parsing
//!
//! ```
//! use csvstream::{CsvStreamer, ParserOptions, RowQueue};
//!
//! let mut parser = CsvStreamer::new(ParserOptions::new().line_terminator("\r\n"))?;
//! let mut rows = RowQueue::new();
//!
//! parser.write(b"hey,yo\r", &mut rows)?;
//! parser.write(b"\nfoo,bar", &mut rows)?;
//! parser.finish(&mut rows)?;
//!
//! let (first, line_no) = rows.pop().unwrap();
//! assert_eq!(line_no, 1);
//! assert_eq!(first.into_row()?, vec!["hey", "yo"]);
//! assert_eq!(parser.line_no(), 2);
//! # Ok::<(), csvstream::CsvStreamError>(())
//! ```
//!
//! ## Reading a file
//!
//! ```no_run
//! use csvstream::CsvReader;
//!
//! let mut reader = CsvReader::open("data.csv")?;
//! for row in reader.rows() {
//!     println!("{:?}", row?.into_row()?);
//! }
//! # Ok::<(), csvstream::CsvStreamError>(())
//! ```

pub mod collector;
pub mod csv;
pub mod error;
pub mod options;
pub mod output;
pub mod reader;
pub mod sink;
pub mod streamer;

#[cfg(feature = "tokio")]
pub mod async_reader;

/// One parsed line: its fields in order
pub type Row = Vec<String>;

pub use collector::{Collector, OnComplete};
pub use error::{CsvStreamError, Result};
pub use options::ParserOptions;
pub use output::{Output, OutputEncoder, OutputEncoding};
pub use reader::{parse_reader, CsvReader, CsvRowIterator, DEFAULT_CHUNK_SIZE};
pub use sink::{Discard, FnSink, RowQueue, RowSink};
pub use streamer::{CsvStreamer, StreamState};

#[cfg(feature = "tokio")]
pub use async_reader::parse_async_reader;
