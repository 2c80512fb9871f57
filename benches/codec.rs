#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use cbor_kit::{build, deserialize, Context, FromValue, ToValue, Value};

#[derive(ToValue, FromValue)]
struct Row {
    #[cbor(required)]
    id: u64,
    name: String,
    scores: Vec<f64>,
}

fn sample_small() -> Vec<u8> {
    vec![0xa1, 0x61, 0x61, 0x01] // {"a":1}
}

fn sample_rows(ctx: &Context) -> Value {
    let rows: Vec<Row> = (0..64_u64)
        .map(|i| Row {
            id: i,
            name: format!("row{i:03}"),
            scores: vec![0.5; 8],
        })
        .collect();
    ctx.make(&rows)
}

fn bench_codec(c: &mut Criterion) {
    let ctx = Context::new();
    let small = sample_small();

    c.bench_function("parse_small", |b| {
        b.iter(|| {
            let (v, used) = ctx.parse(black_box(&small));
            black_box((v, used));
        })
    });

    let rows = sample_rows(&ctx);
    let medium = build(&rows);

    c.bench_function("parse_medium", |b| {
        b.iter(|| {
            let (v, used) = ctx.parse(black_box(&medium));
            black_box((v, used));
        })
    });

    c.bench_function("build_medium", |b| {
        b.iter(|| black_box(build(black_box(&rows))))
    });

    c.bench_function("deserialize_rows", |b| {
        b.iter(|| {
            let out: Vec<Row> = deserialize(black_box(&rows)).unwrap();
            black_box(out);
        })
    });

    let other = Context::new();
    c.bench_function("deep_copy_foreign", |b| {
        b.iter(|| black_box(other.deep_copy(black_box(&rows))))
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
