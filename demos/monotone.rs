//! Partitions a comb-shaped polygon into monotone pieces and triangulates the result,
//! printing every diagonal found at each stage.

use geom_kernel::algorithms::monotone::{triangulate_monotone_face, triangulate_polygon};
use geom_kernel::dcel::Dcel;
use geom_kernel::geom::Point;

fn main() {
  env_logger::init();

  let points = vec![
    Point::new(0.0, 10.0),
    Point::new(2.0, 8.0),
    Point::new(1.0, 10.0),
    Point::new(4.0, 8.0),
    Point::new(6.0, 10.0),
    Point::new(8.0, 10.0),
    Point::new(10.0, 10.0),
    Point::new(10.0, 0.0),
    Point::new(8.0, 0.0),
    Point::new(7.0, 2.0),
    Point::new(6.0, 0.0),
    Point::new(4.0, 0.0),
    Point::new(2.0, 0.0),
    Point::new(0.0, 0.0),
    Point::new(-2.0, 5.0),
  ];
  let mut dcel = Dcel::new(&points).expect("comb polygon is simple");

  println!("triangulating {} vertices end to end:", points.len());
  let diagonals = triangulate_polygon(&mut dcel).expect("comb polygon partitions and triangulates cleanly");
  for (a, b) in &diagonals {
    println!("  diagonal: {:?} -- {:?}", dcel.vertex(*a).point, dcel.vertex(*b).point);
  }
  let triangle_count = dcel.face_ids().filter(|&f| dcel.face(f).outer.is_some()).count();
  println!("{} diagonals applied, {} triangles", diagonals.len(), triangle_count);

  println!("\ntriangulating a convex pentagon directly (already monotone):");
  let pentagon = Dcel::new(&[
    Point::new(0.0, 0.0),
    Point::new(10.0, 0.0),
    Point::new(10.0, 6.0),
    Point::new(5.0, 10.0),
    Point::new(0.0, 6.0),
  ])
  .expect("pentagon is simple");
  let face = pentagon.face_ids().next().expect("at least one face");
  for (a, b) in triangulate_monotone_face(&pentagon, face) {
    println!("  diagonal: {:?} -- {:?}", pentagon.vertex(a).point, pentagon.vertex(b).point);
  }
}
