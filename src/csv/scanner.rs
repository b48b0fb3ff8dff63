//! Line buffering and quote-aware terminator scanning
//!
//! [`LineScanner`] owns the bytes of the line currently being assembled. Every
//! call to [`LineScanner::ingest`] appends a chunk and hands each complete
//! logical line to a callback; whatever follows the last unquoted terminator
//! stays buffered for the next call.
//!
//! Quote state and the scan position survive between calls, so a quoted field
//! or a multi-byte terminator split across chunks is handled exactly like one
//! that arrives in a single chunk.

/// Incremental line splitter that ignores terminators inside quoted spans
#[derive(Debug, Clone)]
pub struct LineScanner {
    terminator: Vec<u8>,
    quote_char: u8,

    // Scanner state
    pending: Vec<u8>,
    scan_pos: usize,
    quote_open: bool,
}

impl LineScanner {
    /// Create a scanner for `terminator` (must be non-empty)
    pub fn new(terminator: &[u8], quote_char: u8) -> Self {
        debug_assert!(!terminator.is_empty());
        Self {
            terminator: terminator.to_vec(),
            quote_char,
            pending: Vec::with_capacity(1024),
            scan_pos: 0,
            quote_open: false,
        }
    }

    /// Append `chunk` and emit every complete logical line, terminator stripped
    ///
    /// Returns the number of lines emitted. Stops early if `on_line` fails:
    /// the failing line is consumed, later lines remain buffered.
    pub fn ingest<F, E>(&mut self, chunk: &[u8], mut on_line: F) -> Result<usize, E>
    where
        F: FnMut(&[u8]) -> Result<(), E>,
    {
        self.pending.extend_from_slice(chunk);

        let term_len = self.terminator.len();
        let mut line_start = 0;
        let mut pos = self.scan_pos;
        let mut emitted = 0;
        let mut result = Ok(());

        while pos < self.pending.len() {
            let byte = self.pending[pos];

            if byte == self.quote_char {
                self.quote_open = !self.quote_open;
                pos += 1;
                continue;
            }

            if !self.quote_open && byte == self.terminator[0] {
                let rest = &self.pending[pos..];
                if rest.starts_with(&self.terminator) {
                    if let Err(e) = on_line(&self.pending[line_start..pos]) {
                        result = Err(e);
                        pos += term_len;
                        line_start = pos;
                        break;
                    }
                    emitted += 1;
                    pos += term_len;
                    line_start = pos;
                    continue;
                }
                if rest.len() < term_len && self.terminator.starts_with(rest) {
                    // Partial terminator at the end of the buffer
                    break;
                }
            }

            pos += 1;
        }

        self.pending.drain(..line_start);
        self.scan_pos = pos - line_start;

        result.map(|()| emitted)
    }

    /// Take the residual partial line, if any, leaving the scanner empty
    pub fn flush(&mut self) -> Option<Vec<u8>> {
        self.scan_pos = 0;
        self.quote_open = false;
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }

    /// Bytes buffered towards the next line
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Whether the scan position is inside an open quoted span
    pub fn quote_open(&self) -> bool {
        self.quote_open
    }

    /// Release the buffered partial line without emitting it
    pub fn clear(&mut self) {
        self.pending = Vec::new();
        self.scan_pos = 0;
        self.quote_open = false;
    }
}
