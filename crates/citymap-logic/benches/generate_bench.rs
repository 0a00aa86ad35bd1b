//! Criterion benchmarks for map generation.
//!
//! Benchmarks:
//!   - value noise sampling over a full 56x56 sweep
//!   - world mask on the reference grid
//!   - full pipeline on the reference config
//!   - full pipeline on a 112x112 grid
//!   - artifact serialization
//!
//! Run with: cargo bench -p citymap-logic --bench generate_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use citymap_logic::config::{WorldConfig, WorldSeeds};
use citymap_logic::grid::Grid;
use citymap_logic::mask::generate_world_mask;
use citymap_logic::noise::ValueNoise2D;
use citymap_logic::generate_world;

// ---------------------------------------------------------------------------
// Benchmark: noise sampling
// ---------------------------------------------------------------------------

fn bench_noise(c: &mut Criterion) {
    let noise = ValueNoise2D::new(32, 5555).expect("non-zero lattice");
    c.bench_function("noise_sample_56x56", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for row in 0..56 {
                for col in 0..56 {
                    acc += noise.sample(black_box(col as f64 * 0.1), black_box(row as f64 * 0.1));
                }
            }
            black_box(acc)
        });
    });
}

// ---------------------------------------------------------------------------
// Benchmark: world mask
// ---------------------------------------------------------------------------

fn bench_mask(c: &mut Criterion) {
    let seeds = WorldSeeds::default();
    c.bench_function("world_mask_56x56", |b| {
        b.iter(|| black_box(generate_world_mask(black_box(Grid::new(56, 56)), &seeds)));
    });
}

// ---------------------------------------------------------------------------
// Benchmark: full pipeline
// ---------------------------------------------------------------------------

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_world");

    let reference = WorldConfig::reference();
    group.bench_function("reference_56x56", |b| {
        b.iter(|| black_box(generate_world(black_box(&reference))));
    });

    // Seeds are scaled with the grid so districts stay spread over the mask.
    let mut large = WorldConfig::reference();
    large.grid = Grid::new(112, 112);
    for d in &mut large.districts {
        d.seed_col *= 2;
        d.seed_row *= 2;
    }
    group.sample_size(20);
    group.bench_function("scaled_112x112", |b| {
        b.iter(|| black_box(generate_world(black_box(&large))));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: artifact serialization
// ---------------------------------------------------------------------------

fn bench_artifact(c: &mut Criterion) {
    let world = generate_world(&WorldConfig::reference()).expect("reference config generates");
    c.bench_function("artifact_to_json", |b| {
        b.iter(|| black_box(world.to_artifact(None).to_json()));
    });
}

criterion_group!(benches, bench_noise, bench_mask, bench_generate, bench_artifact);
criterion_main!(benches);
