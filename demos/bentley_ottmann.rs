//! Runs Bentley-Ottmann over a small fan of segments crossing a horizontal one, printing
//! every intersection point and the segments through it.

use geom_kernel::algorithms::bentley_ottmann::intersections;
use geom_kernel::geom::{Point, Segment};

fn main() {
  env_logger::init();

  let mut segments = vec![Segment::new(Point::new(-10.0, 0.0), Point::new(10.0, 0.0))];
  for i in -2..=2 {
    if i == 0 {
      continue;
    }
    let x = i as f64 * 2.0;
    segments.push(Segment::new(Point::new(x, -5.0), Point::new(x, 5.0)));
  }
  segments.push(Segment::new(Point::new(-8.0, -4.0), Point::new(8.0, 4.0)));

  println!("{} segments:", segments.len());
  for s in &segments {
    println!("  {:?} -> {:?}", s.start, s.end);
  }

  println!("\nintersections:");
  for hit in intersections(&segments) {
    println!("  {:?}, {} segments through it", hit.point, hit.segments.len());
  }
}
