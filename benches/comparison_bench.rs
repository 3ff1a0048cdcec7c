use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use grid_routing::{astar, compare, dijkstra, Adjacency, Grid, GridConfig};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

const N_GRIDS: usize = 16;
const DENSITY: f64 = 0.3;

fn random_grids(size: usize, adjacency: Adjacency) -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(0);
    let config = GridConfig::new(size, size).with_adjacency(adjacency);
    (0..N_GRIDS)
        .map(|_| {
            let mut grid = Grid::new(&config).unwrap();
            grid.regenerate(&mut rng, DENSITY).unwrap();
            grid
        })
        .collect()
}

fn adjacency_str(adjacency: Adjacency) -> &'static str {
    match adjacency {
        Adjacency::Four => "4-grid",
        Adjacency::Eight {
            corner_cutting: true,
        } => "8-grid",
        Adjacency::Eight {
            corner_cutting: false,
        } => "8-grid (no corner cutting)",
    }
}

fn random_grid_bench(c: &mut Criterion) {
    for adjacency in [
        Adjacency::Four,
        Adjacency::Eight {
            corner_cutting: false,
        },
    ] {
        let mut group = c.benchmark_group(adjacency_str(adjacency));
        for size in [32, 64, 128] {
            let grids = random_grids(size, adjacency);
            group.bench_with_input(BenchmarkId::new("Dijkstra", size), &grids, |b, grids| {
                b.iter(|| {
                    for grid in grids {
                        black_box(dijkstra(grid).unwrap());
                    }
                })
            });
            group.bench_with_input(BenchmarkId::new("Astar", size), &grids, |b, grids| {
                b.iter(|| {
                    for grid in grids {
                        black_box(astar(grid).unwrap());
                    }
                })
            });
        }
        group.finish();
    }
}

fn compare_bench(c: &mut Criterion) {
    let grids = random_grids(64, Adjacency::Four);
    c.bench_function("compare, 64x64 4-grid", |b| {
        b.iter(|| {
            for grid in &grids {
                black_box(compare(grid).unwrap());
            }
        })
    });
}

criterion_group!(benches, random_grid_bench, compare_bench);
criterion_main!(benches);
