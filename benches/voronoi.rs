use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use geom_kernel::algorithms::voronoi::{bounding_box_of, build};
use geom_kernel::geom::Point;

fn random_sites(n: usize, seed: u64) -> Vec<Point> {
  let mut rng = SmallRng::seed_from_u64(seed);
  (0..n).map(|_| rng.gen::<Point>()).collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
  for &n in &[10usize, 100, 1_000] {
    let sites = random_sites(n, 0xf0173e);
    let bounds = bounding_box_of(&sites, 100.0);
    c.bench_function(&format!("voronoi::build(n={n})"), |b| b.iter(|| build(&sites, bounds)));
  }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
