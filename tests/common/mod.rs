//! Shared helpers for integration tests

#![allow(dead_code)]

use csvstream::{CsvStreamer, ParserOptions, Row, RowQueue};
use std::path::PathBuf;

/// Path of a fixture under `tests/data`
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Fixture contents
pub fn load_fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture(name)).unwrap()
}

/// Quote a field when it contains anything the splitter would interpret
pub fn encode_field(field: &str, out: &mut Vec<u8>) {
    let needs_quoting = field
        .bytes()
        .any(|b| b == b',' || b == b'"' || b == b'\n' || b == b'\r');
    if needs_quoting {
        out.push(b'"');
        for byte in field.bytes() {
            if byte == b'"' {
                out.extend_from_slice(b"\"\"");
            } else {
                out.push(byte);
            }
        }
        out.push(b'"');
    } else {
        out.extend_from_slice(field.as_bytes());
    }
}

/// Write `rows` as CSV, every line ended by `terminator`
pub fn encode_rows(rows: &[Row], terminator: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for row in rows {
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                out.push(b',');
            }
            encode_field(field, &mut out);
        }
        out.extend_from_slice(terminator);
    }
    out
}

/// Cut `data` at the given offsets (any order, duplicates allowed)
pub fn split_at(data: &[u8], mut cuts: Vec<usize>) -> Vec<&[u8]> {
    cuts.retain(|&c| c <= data.len());
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        chunks.push(&data[start..cut]);
        start = cut;
    }
    chunks.push(&data[start..]);
    chunks
}

/// Parse `chunks` in structured mode, returning the rows and final line count
pub fn parse_chunks(options: ParserOptions, chunks: &[&[u8]]) -> (Vec<Row>, u64) {
    let mut parser = CsvStreamer::new(options.object_mode(true)).unwrap();
    let mut queue = RowQueue::new();
    for chunk in chunks {
        parser.write(chunk, &mut queue).unwrap();
    }
    parser.finish(&mut queue).unwrap();

    let rows = queue.drain().map(|o| o.into_row().unwrap()).collect();
    (rows, parser.line_no())
}
