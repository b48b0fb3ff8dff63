use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use csvstream::{CsvStreamer, Discard, OutputEncoding, ParserOptions};

fn sample_csv(rows: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(rows * 48);
    data.extend_from_slice(b"ID,Name,Comment,Value\n");
    for i in 0..rows {
        data.extend_from_slice(
            format!(
                "{},Name_{},\"quoted, with \"\"escapes\"\"\",{}\n",
                i,
                i,
                i * 100
            )
            .as_bytes(),
        );
    }
    data
}

fn benchmark_chunk_sizes(c: &mut Criterion) {
    let data = sample_csv(100_000);
    let mut group = c.benchmark_group("chunk_size");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk_size in [64, 4096, 65536].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let options = ParserOptions::new().object_mode(true);
                    let mut parser = CsvStreamer::new(options).unwrap();
                    for chunk in data.chunks(chunk_size) {
                        parser.write(chunk, &mut Discard).unwrap();
                    }
                    parser.finish(&mut Discard).unwrap();
                    black_box(parser.line_no());
                });
            },
        );
    }

    group.finish();
}

fn benchmark_encodings(c: &mut Criterion) {
    let data = sample_csv(50_000);
    let mut group = c.benchmark_group("encoding");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for (name, encoding) in [
        ("structured", OutputEncoding::Structured),
        ("text", OutputEncoding::Text),
        ("raw", OutputEncoding::Raw),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let options = ParserOptions::new().output_encoding(encoding);
                let mut parser = CsvStreamer::new(options).unwrap();
                for chunk in data.chunks(8192) {
                    parser.write(chunk, &mut Discard).unwrap();
                }
                parser.finish(&mut Discard).unwrap();
                black_box(parser.line_no());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_chunk_sizes, benchmark_encodings);
criterion_main!(benches);
