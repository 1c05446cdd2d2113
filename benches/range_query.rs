use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use geom_kernel::geom::Point;
use geom_kernel::range::range_tree_1d::Range;
use geom_kernel::range::{KdTree, Range2D, RangeTree1D, RangeTree2D};

fn random_points(n: usize, seed: u64) -> Vec<Point> {
  let mut rng = SmallRng::seed_from_u64(seed);
  (0..n).map(|_| rng.gen::<Point>()).collect()
}

fn query_range() -> Range2D {
  Range2D {
    x_min: -200.0,
    x_max: 200.0,
    y_min: -200.0,
    y_max: 200.0,
  }
}

pub fn criterion_benchmark(c: &mut Criterion) {
  for &n in &[1_000usize, 10_000, 100_000] {
    let points = random_points(n, 0xaaaa);
    let range = query_range();

    let tree2d = RangeTree2D::new(&points);
    c.bench_function(&format!("RangeTree2D::range_query(n={n})"), |b| b.iter(|| tree2d.range_query(&range)));

    let kdtree = KdTree::new(&points);
    c.bench_function(&format!("KdTree::range_search(n={n})"), |b| b.iter(|| kdtree.range_search(&range)));

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let tree1d = RangeTree1D::new(xs);
    let range_1d = Range {
      min: range.x_min,
      max: range.x_max,
    };
    c.bench_function(&format!("RangeTree1D::range_search(n={n})"), |b| {
      b.iter(|| tree1d.range_search(&range_1d))
    });
  }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
