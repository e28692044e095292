//! Benchmarks for the chorus engine.
//!
//! Run with: cargo bench
//!
//! Cost grows with the tap count (every tap interpolates two rings per
//! sample), so each block size is measured at 1, 4 and 8 taps.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use multitap_chorus::{ChorusEngine, ChorusParameters, MAX_TAPS};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn bench_chorus_block(c: &mut Criterion) {
    for tap_count in [1, 4, MAX_TAPS] {
        let mut group = c.benchmark_group(format!("chorus/block/{tap_count}_taps"));

        for size in BLOCK_SIZES {
            group.throughput(Throughput::Elements(*size as u64));

            let mut engine = ChorusEngine::new(SAMPLE_RATE);
            engine.set_parameters(ChorusParameters {
                tap_count,
                depth: 0.8,
                rate: 0.7,
                ..ChorusParameters::default()
            });

            let input: Vec<f32> = (0..*size).map(|i| (i as f32 / 100.0).sin()).collect();
            let mut out_left = vec![0.0; *size];
            let mut out_right = vec![0.0; *size];

            group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
                b.iter(|| {
                    engine.process_block(
                        black_box(&input),
                        black_box(&input),
                        black_box(&mut out_left),
                        black_box(&mut out_right),
                    );
                })
            });
        }

        group.finish();
    }
}

fn bench_chorus_in_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("chorus/in_place");
    group.throughput(Throughput::Elements(512));

    let mut engine = ChorusEngine::new(SAMPLE_RATE);
    engine.set_parameters(ChorusParameters::default());
    let source: Vec<f32> = (0..512).map(|i| (i as f32 / 50.0).sin()).collect();
    let mut left = source.clone();
    let mut right = source.clone();

    // Refill each iteration, otherwise the output feeds back into itself.
    group.bench_function("default_params", |b| {
        b.iter(|| {
            left.copy_from_slice(&source);
            right.copy_from_slice(&source);
            engine.process_block_in_place(black_box(&mut left), black_box(&mut right));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_chorus_block, bench_chorus_in_place);
criterion_main!(benches);
