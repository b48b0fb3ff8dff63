//! Integration tests for csvstream over fixture files

mod common;

use common::{fixture, load_fixture, parse_chunks, split_at};
use csvstream::{
    parse_reader, CsvReader, CsvStreamError, CsvStreamer, Discard, FnSink, Output,
    OutputEncoding, ParserOptions, Row, RowQueue, StreamState,
};
use pretty_assertions::assert_eq;
use std::fs::File;
use std::sync::{Arc, Mutex};

const FIXTURE_ROWS: u64 = 13;

fn row(fields: &[&str]) -> Row {
    fields.iter().map(|f| f.to_string()).collect()
}

fn expected_rows() -> Vec<Row> {
    vec![
        row(&["Auftragsnummer", "Beschreibung"]),
        row(&[
            "Job Description:",
            r#""Etiketten", "Borthener Obst" - A4 (Neutral)"#,
        ]),
        row(&["Menge:", "1.000"]),
        row(&["Material:", "Papier, weiss"]),
        row(&["Notiz:", "Zeile eins\nZeile zwei"]),
        row(&["Preis:", "12,50 EUR"]),
        row(&["Kunde:", r#"Müller "Obst" GmbH"#]),
        row(&["Leer:", ""]),
        row(&["plain", "unquoted", "row"]),
        row(&[r#"a"b"#, "c"]),
        row(&[r#""hey,yo""#, "foo", "bar"]),
        row(&["multi\nline\nfield", "end"]),
        row(&["last", "line"]),
    ]
}

#[test]
fn test_buffer_per_line_pull_mode() {
    let mut parser = CsvStreamer::new(ParserOptions::new()).unwrap();
    let mut queue = RowQueue::new();
    let mut count = 0u64;

    for chunk in load_fixture("quote.csv").chunks(16) {
        parser.write(chunk, &mut queue).unwrap();
        while let Some((output, line_no)) = queue.pop() {
            assert!(matches!(output, Output::Raw(_)));
            let fields: Vec<String> = serde_json::from_slice(&output.to_bytes().unwrap()).unwrap();
            assert!(!fields.is_empty());
            count += 1;
            assert_eq!(line_no, count);
        }
    }
    parser.finish(&mut queue).unwrap();
    count += queue.drain().count() as u64;

    assert!(parser.collected().is_empty(), "should not buffer");
    assert_eq!(count, FIXTURE_ROWS);
    assert_eq!(parser.line_no(), FIXTURE_ROWS);
}

#[test]
fn test_buffer_per_line_push_mode() {
    let mut parser = CsvStreamer::new(ParserOptions::new()).unwrap();
    let mut count = 0u64;
    let mut sink = FnSink::new(|output: Output, line_no| {
        count += 1;
        assert_eq!(line_no, count);
        assert!(output.into_row().is_ok());
        Ok(())
    });

    let file = File::open(fixture("quote.csv")).unwrap();
    let rows = parse_reader(file, &mut parser, &mut sink, 7).unwrap();
    drop(sink);

    assert_eq!(rows, FIXTURE_ROWS);
    assert_eq!(count, FIXTURE_ROWS);
    assert_eq!(parser.line_no(), FIXTURE_ROWS);
}

#[test]
fn test_text_encoding_emits_strings() {
    let options = ParserOptions::new().output_encoding(OutputEncoding::Text);
    let mut parser = CsvStreamer::new(options).unwrap();
    let mut queue = RowQueue::new();
    parser.write(&load_fixture("quote.csv"), &mut queue).unwrap();
    parser.finish(&mut queue).unwrap();

    let mut rows = Vec::new();
    for output in queue.drain() {
        match output {
            Output::Text(text) => rows.push(serde_json::from_str::<Row>(&text).unwrap()),
            other => panic!("expected text output, got {:?}", other),
        }
    }
    assert_eq!(rows, expected_rows());
}

#[test]
fn test_callback_receives_entire_document() {
    let document: Arc<Mutex<Option<Vec<Row>>>> = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&document);
    let mut parser = CsvStreamer::with_callback(ParserOptions::new(), move |result| {
        let rows = result.expect("clean end of input");
        let previous = slot.lock().unwrap().replace(rows.to_vec());
        assert!(previous.is_none(), "callback fired twice");
    })
    .unwrap();

    let mut incremental = RowQueue::new();
    let file = File::open(fixture("quote.csv")).unwrap();
    parse_reader(file, &mut parser, &mut incremental, 32).unwrap();

    let doc = document.lock().unwrap().take().expect("callback fired");
    assert_eq!(doc.len(), FIXTURE_ROWS as usize);
    assert_eq!(doc[1].len(), 2);
    assert_eq!(
        doc[1],
        row(&[
            "Job Description:",
            r#""Etiketten", "Borthener Obst" - A4 (Neutral)"#
        ])
    );

    // Same rows, same order as the incremental path
    let emitted: Vec<Row> = incremental
        .drain()
        .map(|o| o.into_row().unwrap())
        .collect();
    assert_eq!(emitted, doc);
    assert_eq!(parser.collected(), doc.as_slice());
}

#[test]
fn test_crlf_newline_option() {
    let options = ParserOptions::new().line_terminator("\r\n");
    let (rows, line_no) = parse_chunks(options, &[load_fixture("quote_crlf.csv").as_slice()]);

    assert_eq!(line_no, FIXTURE_ROWS);
    assert_eq!(rows[1], expected_rows()[1]);
    assert_eq!(rows[4], row(&["Notiz:", "Zeile eins\r\nZeile zwei"]));
    assert_eq!(rows[12], row(&["last", "line"]));
}

#[test]
fn test_object_mode_emits_rows() {
    let options = ParserOptions::new()
        .output_encoding(OutputEncoding::Raw)
        .object_mode(true);
    let mut reader = CsvReader::new(File::open(fixture("quote.csv")).unwrap(), options)
        .unwrap()
        .chunk_size(5);

    let mut rows = Vec::new();
    for output in reader.rows() {
        let output = output.unwrap();
        let fields = output.as_row().expect("structured row").clone();
        rows.push(fields);
    }
    assert_eq!(rows, expected_rows());
    assert_eq!(reader.line_no(), FIXTURE_ROWS);
}

#[test]
fn test_every_two_way_split_matches() {
    for name in ["quote.csv", "quote_crlf.csv"] {
        let data = load_fixture(name);
        let terminator = if name.ends_with("crlf.csv") { "\r\n" } else { "\n" };
        let options = ParserOptions::new().line_terminator(terminator);
        let (whole, _) = parse_chunks(options.clone(), &[data.as_slice()]);

        for cut in 0..=data.len() {
            let chunks = split_at(&data, vec![cut]);
            let (rows, line_no) = parse_chunks(options.clone(), &chunks);
            assert_eq!(line_no, FIXTURE_ROWS, "{} split at {}", name, cut);
            assert_eq!(rows, whole, "{} split at {}", name, cut);
        }
    }
}

#[test]
fn test_single_byte_chunks() {
    let data = load_fixture("quote_crlf.csv");
    let chunks: Vec<&[u8]> = data.chunks(1).collect();
    let options = ParserOptions::new().line_terminator("\r\n");
    let (rows, line_no) = parse_chunks(options, &chunks);
    assert_eq!(line_no, FIXTURE_ROWS);
    assert_eq!(rows[10], row(&[r#""hey,yo""#, "foo", "bar"]));
}

#[test]
fn test_terminator_split_across_chunks() {
    let options = ParserOptions::new().line_terminator("\r\n");
    let (rows, line_no) = parse_chunks(options, &[&b"hey,yo\r"[..], &b"\nfoo,bar"[..]]);
    assert_eq!(rows, vec![row(&["hey", "yo"]), row(&["foo", "bar"])]);
    assert_eq!(line_no, 2);
}

#[test]
fn test_upstream_failure_is_terminal() {
    let outcome = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&outcome);
    let mut parser = CsvStreamer::with_callback(ParserOptions::new(), move |result| {
        record.lock().unwrap().push(result.is_ok());
    })
    .unwrap();
    let mut queue = RowQueue::new();

    parser.write(b"a,b\nc,", &mut queue).unwrap();
    let error = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
    parser
        .fail(CsvStreamError::Upstream(error), &mut queue)
        .unwrap();

    assert_eq!(parser.state(), StreamState::Failed);
    assert!(queue.failure().is_some());
    assert!(parser.finish(&mut Discard).is_err());
    assert_eq!(queue.len(), 1);
    assert_eq!(*outcome.lock().unwrap(), vec![false]);
}
