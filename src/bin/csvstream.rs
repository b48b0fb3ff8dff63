//! `csvstream` - convert CSV on stdin (or a file) to one JSON array per line

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use csvstream::{
    parse_reader, CsvStreamError, CsvStreamer, FnSink, Output, ParserOptions, Row, RowSink,
    DEFAULT_CHUNK_SIZE,
};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use tracing::{debug, info};

/// Stream CSV into JSON arrays
///
/// Each logical line of the input becomes one JSON array on stdout. Quoted
/// fields may contain the delimiter, the line terminator and doubled quotes.
#[derive(Debug, Parser)]
#[command(name = "csvstream", version, about = "Stream CSV into JSON arrays, one per line")]
struct Args {
    /// Input file; reads stdin when omitted or `-`
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Field delimiter (single ASCII character, `\t` for tab)
    #[arg(short = 'd', long = "delimiter", default_value = ",", value_parser = parse_byte)]
    delimiter: u8,

    /// Quote character (single ASCII character)
    #[arg(short = 'q', long = "quote", default_value = "\"", value_parser = parse_byte)]
    quote: u8,

    /// Line terminator; accepts `\n`, `\r\n`, `\r` and `\t` escapes
    #[arg(short = 'n', long = "newline", default_value = "\\n", value_parser = parse_terminator)]
    newline: String,

    /// Value to emit for empty fields
    #[arg(short = 'e', long = "empty", default_value = "")]
    empty: String,

    /// Bytes read from the input per chunk
    #[arg(long = "chunk-size", value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Print the whole document as one JSON array of rows at the end
    #[arg(long = "collect")]
    collect: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    fn parser_options(&self) -> ParserOptions {
        ParserOptions::new()
            .delimiter(self.delimiter)
            .quote_char(self.quote)
            .line_terminator(&self.newline)
            .empty_value(self.empty.clone())
    }
}

fn parse_byte(value: &str) -> std::result::Result<u8, String> {
    let unescaped = unescape(value);
    match unescaped.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("expected a single ASCII character, got {value:?}")),
    }
}

fn parse_terminator(value: &str) -> std::result::Result<String, String> {
    let unescaped = unescape(value);
    if unescaped.is_empty() {
        return Err("line terminator must not be empty".to_string());
    }
    Ok(unescaped)
}

fn unescape(value: &str) -> String {
    value
        .replace("\\r", "\r")
        .replace("\\n", "\n")
        .replace("\\t", "\t")
}

/// Set up structured logging on stderr
fn setup_logging(args: &Args) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("csvstream={}", args.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

/// Writes each row's JSON followed by a newline
fn line_writer<W: Write>(out: &mut W) -> impl RowSink + '_ {
    FnSink::new(move |row: Output, _line_no| {
        let bytes = row.to_bytes()?;
        out.write_all(&bytes)
            .and_then(|()| out.write_all(b"\n"))
            .map_err(|e| CsvStreamError::Sink(format!("Failed to write to stdout: {}", e)))
    })
}

fn run(args: Args) -> Result<u64> {
    let input = open_input(args.input.as_ref())?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let rows = if args.collect {
        let (tx, rx) = mpsc::channel::<std::result::Result<Vec<Row>, String>>();
        let mut streamer = CsvStreamer::with_callback(args.parser_options(), move |result| {
            let _ = tx.send(result.map(|rows| rows.to_vec()).map_err(|e| e.to_string()));
        })
        .context("Invalid parser options")?;

        let count = parse_reader(input, &mut streamer, &mut csvstream::Discard, args.chunk_size)
            .context("Failed to parse input")?;

        let document = rx
            .recv()
            .context("Completion callback never ran")?
            .map_err(anyhow::Error::msg)?;
        serde_json::to_writer(&mut out, &document).context("Failed to write document")?;
        out.write_all(b"\n").context("Failed to write document")?;
        count
    } else {
        let mut streamer =
            CsvStreamer::new(args.parser_options()).context("Invalid parser options")?;
        let mut sink = line_writer(&mut out);
        parse_reader(input, &mut streamer, &mut sink, args.chunk_size)
            .context("Failed to parse input")?
    };

    out.flush().context("Failed to flush stdout")?;
    Ok(rows)
}

fn main() {
    let args = Args::parse();
    setup_logging(&args);
    debug!(?args, "starting");

    match run(args) {
        Ok(rows) => {
            info!(rows, "done");
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
