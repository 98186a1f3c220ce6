//! Benchmarks for bulk and scalar transfer across segment boundaries

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hypermap::{ArrayConfig, MappedArray, Shape};
use rand::Rng;

const LEN: u64 = 1 << 20;
// 64K elements per segment so most transfers below cross a boundary
const SEGMENT_SHIFT: u32 = 16;

fn mapped_array() -> MappedArray<f64> {
    let file = tempfile::tempfile().unwrap();
    let mut array = MappedArray::from_file(
        &file,
        Shape::flat(LEN),
        ArrayConfig::with_segment_shift(SEGMENT_SHIFT),
    )
    .unwrap();
    let values: Vec<f64> = (0..LEN).map(|i| i as f64).collect();
    array.unflatten(&values, 0, 0, values.len()).unwrap();
    array
}

fn bench_flatten(c: &mut Criterion) {
    let array = mapped_array();
    let mut rng = rand::thread_rng();
    let mut group = c.benchmark_group("flatten");

    for length in [1usize, 1024, 1 << 16, 1 << 18] {
        let mut buf = vec![0.0f64; length];
        group.throughput(Throughput::Bytes((length * 8) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            b.iter(|| {
                let start = rng.gen_range(0..=LEN - length as u64);
                array.flatten(start, &mut buf, 0, length).unwrap();
                black_box(&buf);
            });
        });
    }

    group.finish();
}

fn bench_unflatten(c: &mut Criterion) {
    let mut array = mapped_array();
    let mut rng = rand::thread_rng();
    let mut group = c.benchmark_group("unflatten");

    for length in [1024usize, 1 << 16, 1 << 18] {
        let buf: Vec<f64> = (0..length).map(|_| rng.gen()).collect();
        group.throughput(Throughput::Bytes((length * 8) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            b.iter(|| {
                let start = rng.gen_range(0..=LEN - length as u64);
                array.unflatten(&buf, 0, start, length).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_scalar_reads(c: &mut Criterion) {
    let array = mapped_array();
    let mut rng = rand::thread_rng();
    let offsets: Vec<u64> = (0..4096).map(|_| rng.gen_range(0..LEN)).collect();

    c.bench_function("get_at_random", |b| {
        b.iter(|| {
            let sum: f64 = offsets.iter().map(|&offset| array.get_at(offset)).sum();
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_flatten, bench_unflatten, bench_scalar_reads);
criterion_main!(benches);
