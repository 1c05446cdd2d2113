//! Builds the Voronoi diagram of a ten-site configuration, printing every vertex, edge,
//! and cell.

use geom_kernel::algorithms::voronoi::{bounding_box_of, build};
use geom_kernel::geom::Point;

fn main() {
  env_logger::init();

  let sites = vec![
    Point::new(50.0, 10.0),
    Point::new(54.0, 9.0),
    Point::new(48.0, 7.0),
    Point::new(47.3, 5.5),
    Point::new(53.0, 5.0),
    Point::new(52.0, 3.0),
    Point::new(58.0, -2.0),
    Point::new(56.0, -3.5),
    Point::new(44.0, 0.8),
    Point::new(50.0, -7.0),
  ];
  let bounds = bounding_box_of(&sites, 20.0);
  let diagram = build(&sites, bounds);

  println!("{} sites, {} vertices, {} edges", diagram.sites.len(), diagram.vertices.len(), diagram.edges.len());
  for v in &diagram.vertices {
    println!("  vertex: {:?}", v);
  }
  for e in &diagram.edges {
    println!("  edge {:?} -- {:?}, sites {:?}/{:?}", e.start, e.end, e.site_left, e.site_right);
  }
  for face in diagram.faces() {
    println!("  cell for {:?}: {} boundary vertices", face.site, face.boundary.len());
  }
}
