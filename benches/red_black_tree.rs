use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use geom_kernel::tree::RedBlackTree;

fn random_keys(n: usize, seed: u64) -> Vec<i64> {
  let mut rng = SmallRng::seed_from_u64(seed);
  (0..n).map(|_| rng.gen_range(-1_000_000..1_000_000)).collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
  for &n in &[100usize, 1_000, 10_000] {
    let keys = random_keys(n, 0xc0ffee);
    c.bench_function(&format!("RedBlackTree::insert({n})"), |b| {
      b.iter(|| {
        let mut tree = RedBlackTree::new();
        for &k in &keys {
          tree.insert(k, ());
        }
        tree
      })
    });

    let mut tree = RedBlackTree::new();
    for &k in &keys {
      tree.insert(k, ());
    }
    let queries = random_keys(1_000, 0xdeadbeef);
    c.bench_function(&format!("RedBlackTree::find(n={n})"), |b| {
      b.iter(|| {
        for &q in &queries {
          tree.find(&q);
        }
      })
    });
  }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
