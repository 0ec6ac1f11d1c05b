use std::{hint::black_box, time::Duration};

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use percolation::{Percolation, PercolationStats};
use rand::{rngs::StdRng, SeedableRng};
use union_find::UnionFind;

fn union_find_chain(c: &mut Criterion) {
  const ELEMENTS: usize = 1 << 16;

  let mut group = c.benchmark_group("union-find");
  group.throughput(Throughput::Elements(ELEMENTS as u64));

  group.bench_function("chain unions then find all", |b| {
    b.iter(|| {
      let mut uf = UnionFind::new(ELEMENTS).unwrap();
      for i in 0..ELEMENTS - 1 {
        uf.union(i, i + 1).unwrap();
      }
      for i in 0..ELEMENTS {
        black_box(uf.find(i).unwrap());
      }
    })
  });

  group.finish();
}

fn open_full_grid(c: &mut Criterion) {
  const GRID_SIZE: usize = 128;

  let mut group = c.benchmark_group("percolation open");
  group.throughput(Throughput::Elements((GRID_SIZE * GRID_SIZE) as u64));

  group.bench_function("open every site row-major n=128", |b| {
    b.iter(|| {
      let mut percolation = Percolation::new(GRID_SIZE).unwrap();
      for row in 1..=GRID_SIZE {
        for col in 1..=GRID_SIZE {
          percolation.open(row, col).unwrap();
        }
      }
      black_box(percolation.percolates().unwrap());
    })
  });

  group.finish();
}

fn random_trial(c: &mut Criterion) {
  const GRID_SIZE: usize = 64;

  let mut group = c.benchmark_group("percolation trial");
  group.throughput(Throughput::Elements((GRID_SIZE * GRID_SIZE) as u64));
  group.measurement_time(Duration::from_secs(10));

  let mut rng = StdRng::seed_from_u64(392420);
  group.bench_function("random trial n=64", |b| {
    b.iter(|| {
      let stats = PercolationStats::with_rng(GRID_SIZE, 1, &mut rng).unwrap();
      black_box(stats.thresholds()[0]);
    })
  });

  group.finish();
}

criterion_group!(benches, union_find_chain, open_full_grid, random_trial);
criterion_main!(benches);
