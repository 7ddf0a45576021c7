//! Benchmarks for reprojection and bounding box construction.

use busproxy_geo::{bbox, Reprojector};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_test_points(count: usize) -> Vec<(f64, f64)> {
    (0..count)
        .map(|i| {
            // Grid across the country
            let x = 50_000.0 + (i as f64 * 37.0) % 60_000.0;
            let y = 60_000.0 + (i as f64 * 53.0) % 80_000.0;
            (x, y)
        })
        .collect()
}

fn bench_single_point(c: &mut Criterion) {
    let reprojector = Reprojector::new().unwrap();

    c.bench_function("to_projected_single", |b| {
        b.iter(|| reprojector.to_projected(black_box(6.13), black_box(49.61)))
    });

    c.bench_function("to_geographic_single", |b| {
        b.iter(|| reprojector.to_geographic(black_box(77_500.0), black_box(75_000.0)))
    });
}

fn bench_feature_batches(c: &mut Criterion) {
    let reprojector = Reprojector::new().unwrap();
    let mut group = c.benchmark_group("to_geographic_batch");

    for size in [10, 100, 1000].iter() {
        let points = create_test_points(*size);

        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
            b.iter(|| {
                points
                    .iter()
                    .map(|&(x, y)| reprojector.to_geographic(x, y))
                    .collect::<Vec<_>>()
            })
        });
    }

    group.finish();
}

fn bench_bbox(c: &mut Criterion) {
    let reprojector = Reprojector::new().unwrap();
    let mut group = c.benchmark_group("bbox");

    group.bench_function("around", |b| {
        b.iter(|| bbox::around(&reprojector, black_box(6.13), black_box(49.61), black_box(1000.0)))
    });

    group.bench_function("from_wsen", |b| {
        b.iter(|| bbox::from_wsen(&reprojector, black_box("6.11,49.59,6.15,49.60")))
    });

    group.finish();
}

criterion_group!(benches, bench_single_point, bench_feature_batches, bench_bbox);
criterion_main!(benches);
