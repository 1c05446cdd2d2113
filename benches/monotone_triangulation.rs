use criterion::{criterion_group, criterion_main, Criterion};

use geom_kernel::algorithms::monotone::triangulate_polygon;
use geom_kernel::dcel::Dcel;
use geom_kernel::geom::Point;

/// A "comb" polygon with `teeth` spikes along its top edge, forcing the sweep to process
/// a Split/Merge vertex at every tooth.
fn comb(teeth: usize) -> Vec<Point> {
  let mut top = Vec::new();
  for i in 0..teeth {
    let x = i as f64 * 2.0;
    top.push(Point::new(x, 10.0));
    top.push(Point::new(x + 1.0, 8.0));
  }
  top.push(Point::new(teeth as f64 * 2.0, 10.0));

  let mut points = top;
  points.push(Point::new(teeth as f64 * 2.0, 0.0));
  points.push(Point::new(0.0, 0.0));
  points
}

pub fn criterion_benchmark(c: &mut Criterion) {
  for &teeth in &[10usize, 100, 500] {
    let points = comb(teeth);
    c.bench_function(&format!("triangulate_polygon(teeth={teeth})"), |b| {
      b.iter(|| {
        let mut dcel = Dcel::new(&points).expect("comb polygon is simple");
        triangulate_polygon(&mut dcel).expect("comb polygon partitions and triangulates cleanly")
      })
    });
  }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
