//! Criterion micro-benchmarks for spatial samplers over a 10K-point frame.

use braid_bench::{reference_frame, reference_grid, scattered_points};
use braid_core::Point;
use braid_sampler::SpatialSampler;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Benchmark: 100 exact lookups of grid points.
fn bench_exact_100_of_10k(c: &mut Criterion) {
    let (points, values) = reference_grid(100);
    let frames = [reference_frame(0, &points, &values)];
    let queries: Vec<Point> = points.iter().step_by(100).cloned().collect();
    let sampler = SpatialSampler::exact();

    c.bench_function("exact_100_of_10k", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(sampler.sample("data", q, &frames).unwrap());
            }
        });
    });
}

/// Benchmark: 100 nearest-neighbour lookups at off-grid points.
fn bench_nearest_100_of_10k(c: &mut Criterion) {
    let (points, values) = reference_grid(100);
    let frames = [reference_frame(0, &points, &values)];
    let queries = scattered_points(100, 99.0, 42);
    let sampler = SpatialSampler::nearest(1.0);

    c.bench_function("nearest_100_of_10k", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(sampler.sample("data", q, &frames).unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_exact_100_of_10k, bench_nearest_100_of_10k);
criterion_main!(benches);
