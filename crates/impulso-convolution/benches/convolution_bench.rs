//! Criterion benchmarks for the partitioned convolution engine
//!
//! Run with: cargo bench -p impulso-convolution
#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use impulso_convolution::{ConvolutionEngine, SpectralPartitioner};
use impulso_core::BlockProcessor;

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];
const IR_SECONDS: &[f32] = &[0.5, 2.0];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn generate_impulse(seconds: f32) -> Vec<f32> {
    let len = (seconds * SAMPLE_RATE) as usize;
    let mut state = 0x1234_5678u32;
    (0..len)
        .map(|i| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (state >> 8) as f32 / (1u32 << 24) as f32 - 0.5;
            noise * (-(i as f32) / (0.3 * SAMPLE_RATE)).exp()
        })
        .collect()
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("ConvolutionEngine");

    for &seconds in IR_SECONDS {
        let impulse = generate_impulse(seconds);

        for &block_size in BLOCK_SIZES {
            let mut partitioner = SpectralPartitioner::new(block_size);
            let ir = Arc::new(partitioner.build_mono(&impulse).unwrap());
            let input = generate_test_signal(block_size);

            group.bench_with_input(
                BenchmarkId::new(format!("stereo_{seconds}s"), block_size),
                &block_size,
                |b, _| {
                    let mut engine = ConvolutionEngine::new();
                    engine.set_ir(Arc::clone(&ir));
                    engine.set_mix(0.5);
                    engine.prepare(SAMPLE_RATE, block_size, 2);
                    let mut left = input.clone();
                    let mut right = input.clone();
                    b.iter(|| {
                        left.copy_from_slice(&input);
                        right.copy_from_slice(&input);
                        engine.process(&mut [&mut left, &mut right]);
                        black_box(left[0]);
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_partitioner(c: &mut Criterion) {
    let mut group = c.benchmark_group("SpectralPartitioner");
    let impulse = generate_impulse(2.0);

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("build_2s", block_size),
            &block_size,
            |b, &block_size| {
                let mut partitioner = SpectralPartitioner::new(block_size);
                b.iter(|| black_box(partitioner.build_mono(black_box(&impulse)).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_engine, bench_partitioner);
criterion_main!(benches);
