use biotope_core::config::AppConfig;
use biotope_core::lifecycle::{create_creature_with_rng, create_food_with_rng};
use biotope_core::spatial_grid::SpatialGrid;
use biotope_core::step::WorldStep;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn lattice(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| ((i % 100) as f64 * 10.0, (i / 100) as f64 * 10.0))
        .collect()
}

fn bench_spatial_grid_build(c: &mut Criterion) {
    let positions = lattice(1000);

    c.bench_function("spatial_grid_build_1000", |b| {
        b.iter(|| {
            let mut grid = SpatialGrid::new(0.0, 0.0, 50.0, 20, 20);
            grid.build_parallel(black_box(&positions));
            black_box(grid)
        })
    });
}

fn bench_spatial_grid_neighborhood(c: &mut Criterion) {
    let positions = lattice(1000);
    let mut grid = SpatialGrid::new(0.0, 0.0, 50.0, 20, 20);
    grid.build_parallel(&positions);

    c.bench_function("spatial_grid_neighborhood", |b| {
        b.iter(|| {
            let mut count = 0usize;
            grid.for_each_in_neighborhood(black_box(10), black_box(10), |_| count += 1);
            black_box(count)
        })
    });
}

fn bench_compute_visibility(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let config = AppConfig::default();
    let bounds = config.world.bounds();
    let creatures = (0..500)
        .map(|id| {
            let x = rng.gen_range(0.0..bounds.width);
            let y = rng.gen_range(0.0..bounds.height);
            create_creature_with_rng(id, x, y, &config, &mut rng).unwrap()
        })
        .collect();
    let food = (0..300)
        .map(|id| create_food_with_rng(id, &bounds, &config.food, &mut rng))
        .collect();
    let mut step = WorldStep::with_population(config, creatures, food);

    c.bench_function("compute_visibility_500", |b| {
        b.iter(|| {
            step.compute_visibility();
            black_box(step.cache.visible_creatures.len())
        })
    });
}

criterion_group!(
    benches,
    bench_spatial_grid_build,
    bench_spatial_grid_neighborhood,
    bench_compute_visibility
);
criterion_main!(benches);
