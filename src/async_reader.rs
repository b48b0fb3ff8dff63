//! Async CSV parsing from a `tokio::io::AsyncRead` source
//!
//! Requires the `tokio` feature. Parsing itself stays synchronous per chunk;
//! the only await point is the read from the source.

use crate::error::{CsvStreamError, Result};
use crate::reader::copy_io_error;
use crate::sink::RowSink;
use crate::streamer::CsvStreamer;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

/// Drive `streamer` to completion from an async `source`
///
/// # Examples
///
/// ```no_run
/// use csvstream::{parse_async_reader, CsvStreamer, ParserOptions, RowQueue};
///
/// # async fn run() -> csvstream::Result<()> {
/// let file = tokio::fs::File::open("data.csv").await?;
/// let mut streamer = CsvStreamer::new(ParserOptions::new())?;
/// let mut rows = RowQueue::new();
///
/// let count = parse_async_reader(file, &mut streamer, &mut rows, 64 * 1024).await?;
/// println!("{count} rows");
/// # Ok(())
/// # }
/// ```
pub async fn parse_async_reader<R, S>(
    mut source: R,
    streamer: &mut CsvStreamer,
    sink: &mut S,
    chunk_size: usize,
) -> Result<u64>
where
    R: AsyncRead + Unpin,
    S: RowSink + ?Sized,
{
    let mut buffer = vec![0; chunk_size.max(1)];

    loop {
        let n = match source.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                streamer.fail(copy_io_error(&e), sink)?;
                return Err(CsvStreamError::Upstream(e));
            }
        };
        streamer.write(&buffer[..n], sink)?;
    }

    streamer.finish(sink)?;
    debug!(rows = streamer.line_no(), "async reader exhausted");
    Ok(streamer.line_no())
}
