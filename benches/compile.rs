//! Benchmarks the top-level `compile` entry point end to end.

use cadence_lang::diagnostics::CollectingReporter;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SOURCE: &str = "\
bpm 120  note 60
alias kick 1
alias snare 2
let swing 2

beat skip beat beat skip beat skip beat chain base

send kick 3:8 rep 4
send snare (base rotl swing) cat (base rev) $ send kick 5:16 map 60 62 64 67
";

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile end-to-end", |b| {
        b.iter(|| {
            let mut reporter = CollectingReporter::new();
            let output = cadence_lang::compile(black_box(SOURCE.as_bytes()), &mut reporter);
            black_box(output);
        });
    });
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
