use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use geom_kernel::algorithms::bentley_ottmann::intersections;
use geom_kernel::geom::{Point, Segment};

fn random_segments(n: usize, seed: u64) -> Vec<Segment> {
  let mut rng = SmallRng::seed_from_u64(seed);
  (0..n)
    .map(|_| {
      let a = Point::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
      let b = Point::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
      Segment::new(a, b)
    })
    .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
  for &n in &[50usize, 200, 1_000] {
    let segments = random_segments(n, 0x5eed);
    c.bench_function(&format!("intersections(n={n})"), |b| b.iter(|| intersections(&segments)));
  }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
