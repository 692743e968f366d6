//! Scan and descent benchmarks on generated cave-like maps.
//!
//! Run with: cargo bench --package influence-paths

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use influence_paths::{CostField, Grid, Measurement, ObstacleMask, Point, ScanEngine};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Bordered map with a deterministic scatter of pillars.
fn cave(size: i32) -> CostField {
    let grid = Grid::from_fn(size, size, |p| {
        let border = p.x == 0 || p.y == 0 || p.x == size - 1 || p.y == size - 1;
        border || (p.x * 31 + p.y * 17) % 11 == 0
    });
    CostField::build(&grid, |&wall| wall, Measurement::Euclidean)
}

fn bench_full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_scan");

    for size in [32, 64, 128, 256].iter() {
        let field = cave(*size);
        let mut engine = ScanEngine::new(&field);
        engine.add_goal(Point::new(1, 1), 0.0).unwrap();
        let mask = ObstacleMask::none();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let field = engine.scan(black_box(&mask)).unwrap();
                black_box(field.as_slice().len())
            });
        });
    }

    group.finish();
}

fn bench_partial_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("partial_scan_256");
    let field = cave(256);

    for budget in [256usize, 1024, 4096].iter() {
        let mut engine = ScanEngine::new(&field);
        engine.add_goal(Point::new(128, 128), 0.0).unwrap();
        let mask = ObstacleMask::none();

        group.bench_with_input(BenchmarkId::from_parameter(budget), budget, |b, &budget| {
            b.iter(|| {
                engine.reset_map();
                black_box(engine.partial_scan(budget, &mask).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_find_path(c: &mut Criterion) {
    let field = cave(128);
    let mut engine = ScanEngine::new(&field);
    engine.add_goal(Point::new(1, 1), 0.0).unwrap();
    let mask = ObstacleMask::new((0..16).map(|i| Point::new(40 + i, 60)));
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("find_path_128", |b| {
        b.iter(|| {
            let path = engine
                .find_path(black_box(Point::new(126, 126)), 400, &mask, &mut rng)
                .unwrap();
            black_box(path.len())
        });
    });
}

criterion_group!(benches, bench_full_scan, bench_partial_scan, bench_find_path);
criterion_main!(benches);
