#[macro_use]
extern crate criterion;

#[path = "../tests/fixtures.rs"]
mod fixtures;

use criterion::Criterion;
use rtasevent::{Verbosity, parse_event, parse_events, render_event};

fn src_event() -> Vec<u8> {
    let frus: Vec<Vec<u8>> = (0..4u8).map(fru_callout_numbered).collect();
    fixtures::v6_event(&[
        fixtures::private_header(6),
        fixtures::user_header(),
        fixtures::primary_src(b"B7001111", &frus),
        fixtures::machine_type(b"9119-MME", b"10ABCDE\0\0\0\0\0"),
        fixtures::hotplug_drc_index(0x2100_0004),
        fixtures::dump_locator(4, b"abc"),
    ])
}

fn fru_callout_numbered(i: u8) -> Vec<u8> {
    let mut loc = *b"U78A9.0\0";
    loc[7] = b'0' + i;
    fixtures::fru_callout(b'H', &loc, b"00E1234\0")
}

fn criterion_benchmark(c: &mut Criterion) {
    let event = src_event();
    c.bench_function("parse v6 event", |b| b.iter(|| parse_event(&event)));

    let parsed = match parse_event(&event) {
        Ok(parsed) => parsed,
        Err(e) => panic!("benchmark event does not parse: {}", e),
    };
    c.bench_function("render v6 event", |b| {
        b.iter(|| render_event(&parsed, Verbosity::Detailed))
    });

    let batch: Vec<&[u8]> = (0..256).map(|_| event.as_slice()).collect();
    c.bench_function("parse 256 events", |b| b.iter(|| parse_events(&batch)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
