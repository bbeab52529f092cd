//! Benchmarks for the CPU side of a frame.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lorenz_tracers::prelude::*;

fn filled_cloud(store: &mut MemoryMeshStore, count: usize, trail: usize) -> TracerCloud {
    let mut rng = StdRng::seed_from_u64(1);
    let mut cloud = TracerCloud::new();
    cloud.resize(count, store, |s| Tracer::spawn_random(s, &mut rng, 10.0));
    cloud.set_max_length(trail);
    for _ in 0..trail {
        cloud.advance(store, &Euler::default(), &Lorenz::default());
    }
    cloud
}

fn bench_cloud_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("cloud_advance");

    for count in [20usize, 200, 2000] {
        group.bench_with_input(BenchmarkId::new("full_trails", count), &count, |b, &count| {
            let mut store = MemoryMeshStore::new();
            let mut cloud = filled_cloud(&mut store, count, 1000);
            b.iter(|| cloud.advance(&mut store, &Euler::default(), black_box(&Lorenz::default())))
        });
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_driver");

    group.bench_function("default_scene", |b| {
        let mut config = ViewerConfig::default();
        config.simulation.seed = Some(7);
        let mut store = MemoryMeshStore::new();
        let host = HostInputs::from_config(&config);
        let mut driver = FrameDriver::new(config, &mut store);
        let mut input = Input::new();
        b.iter(|| black_box(driver.frame(&host, &mut input, &mut store)))
    });

    group.finish();
}

fn bench_grid_build(c: &mut Criterion) {
    c.bench_function("grid_build_size_10", |b| {
        b.iter(|| {
            let mut store = MemoryMeshStore::new();
            let grid = Grid::new(&mut store, Plane::Y, black_box(10));
            black_box(grid.lines().segment_count())
        })
    });
}

criterion_group!(benches, bench_cloud_advance, bench_frame, bench_grid_build);
criterion_main!(benches);
