use bencher::{BenchCase, CaseKind, WireFile};
use bytes::{Buf, BytesMut};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use h1_parse::protocol::VecBody;
use h1_parse::{Kind, NullSink, Parser};

static SMALL_REQUEST: WireFile =
    WireFile::new("request_small.txt", include_str!("../resources/request_small.txt"));
static LARGE_REQUEST: WireFile =
    WireFile::new("request_large.txt", include_str!("../resources/request_large.txt"));
static CHUNKED_RESPONSE: WireFile =
    WireFile::new("response_chunked.txt", include_str!("../resources/response_chunked.txt"));

fn create_cases() -> Vec<BenchCase> {
    vec![
        BenchCase::header("small_header", SMALL_REQUEST),
        BenchCase::header("large_header", LARGE_REQUEST),
        BenchCase::chunked("chunked_body", CHUNKED_RESPONSE),
    ]
}

fn parse_header(wire: &'static [u8]) {
    let mut parser = Parser::request(NullSink);
    let consumed = parser.write(wire).expect("fixture should be a valid header");
    black_box(consumed);
}

fn parse_full_message(kind: Kind, wire: &'static [u8]) {
    let mut parser = Parser::new(kind, NullSink);
    let mut buf = BytesMut::from(wire);
    let mut body = VecBody::new();
    while !parser.done() {
        let n = parser.write(&buf[..]).expect("fixture should be a complete message");
        buf.advance(n);
        if parser.done() {
            break;
        }
        parser
            .write_body(&mut body, &mut buf)
            .expect("fixture should be a complete message");
    }
    black_box(body.len());
}

fn benchmark_parser(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("parser");

    for case in create_cases() {
        group.throughput(Throughput::Bytes(case.file().bytes().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            b.iter_batched(
                || case.file().bytes(),
                |wire| match case.kind() {
                    CaseKind::Header => parse_header(wire),
                    CaseKind::Chunked => parse_full_message(Kind::Response, wire),
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(parser, benchmark_parser);
criterion_main!(parser);
