//! A simple, CCW-oriented polygon backed by a [`Dcel`] (`spec.md` §3.3/§4.3).

use crate::dcel::Dcel;
use crate::geom::{orientation, signed_area, Orientation, Point};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Polygon {
  points: Vec<Point>,
  dcel: Dcel,
}

impl Polygon {
  /// Builds a polygon from a CCW-oriented, simple point sequence. Mirrors
  /// `Polygon::validate_weakly`: at least three points, positive signed area.
  pub fn new(points: Vec<Point>) -> Result<Polygon> {
    if points.len() < 3 {
      return Err(Error::Precondition(format!(
        "a polygon needs at least 3 vertices, got {}",
        points.len()
      )));
    }
    if signed_area_of(&points) < 0.0 {
      return Err(Error::Precondition(
        "polygon points must be wound counter-clockwise".to_string(),
      ));
    }
    let dcel = Dcel::new(&points)?;
    Ok(Polygon { points, dcel })
  }

  pub fn points(&self) -> &[Point] {
    &self.points
  }

  pub fn dcel(&self) -> &Dcel {
    &self.dcel
  }

  pub fn dcel_mut(&mut self) -> &mut Dcel {
    &mut self.dcel
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// `idx` indexes modulo the vertex count, so `-1` is the last vertex.
  pub fn vertex(&self, idx: isize) -> &Point {
    let n = self.points.len() as isize;
    &self.points[idx.rem_euclid(n) as usize]
  }

  pub fn vertex_orientation(&self, idx: isize) -> Orientation {
    let p1 = self.vertex(idx - 1);
    let p2 = self.vertex(idx);
    let p3 = self.vertex(idx + 1);
    orientation(p1, p2, p3)
  }

  pub fn signed_area(&self) -> f64 {
    signed_area_of(&self.points)
  }

  /// The area centroid (not the vertex average).
  pub fn centroid(&self) -> Point {
    let n = self.points.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    let area2 = self.signed_area() * 2.0;
    for i in 0..n {
      let p = self.points[i];
      let q = self.points[(i + 1) % n];
      let cross = p.x * q.y - q.x * p.y;
      cx += (p.x + q.x) * cross;
      cy += (p.y + q.y) * cross;
    }
    Point::new(cx / (3.0 * area2), cy / (3.0 * area2))
  }

  /// Ear-clipping triangulation: an O(n^2) baseline independent of the sweep-based
  /// monotone triangulator in [`crate::algorithms::monotone`], useful for small inputs
  /// and as a cross-check oracle.
  pub fn triangulate_ear_clipping(&self) -> Vec<[Point; 3]> {
    let mut ring: Vec<Point> = self.points.clone();
    let mut triangles = Vec::new();
    while ring.len() > 3 {
      let n = ring.len();
      let mut clipped = false;
      for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let cur = ring[i];
        let next = ring[(i + 1) % n];
        if orientation(&prev, &cur, &next) != Orientation::Left {
          continue;
        }
        let is_ear = (0..n)
          .filter(|&j| j != i && j != (i + n - 1) % n && j != (i + 1) % n)
          .all(|j| !point_in_triangle(&ring[j], &prev, &cur, &next));
        if is_ear {
          triangles.push([prev, cur, next]);
          ring.remove(i);
          clipped = true;
          break;
        }
      }
      if !clipped {
        // Numerically degenerate input (near-collinear ears); stop rather than loop.
        log::warn!("ear clipping stalled with {} vertices remaining", ring.len());
        break;
      }
    }
    if ring.len() == 3 {
      triangles.push([ring[0], ring[1], ring[2]]);
    }
    triangles
  }
}

fn signed_area_of(points: &[Point]) -> f64 {
  let n = points.len();
  let mut sum = 0.0;
  for i in 0..n {
    let p = points[i];
    let q = points[(i + 1) % n];
    sum += p.x * q.y - q.x * p.y;
  }
  sum / 2.0
}

fn point_in_triangle(p: &Point, a: &Point, b: &Point, c: &Point) -> bool {
  let o1 = orientation(a, b, p);
  let o2 = orientation(b, c, p);
  let o3 = orientation(c, a, p);
  let has_left = matches!(o1, Orientation::Left) || matches!(o2, Orientation::Left) || matches!(o3, Orientation::Left);
  let has_right = matches!(o1, Orientation::Right) || matches!(o2, Orientation::Right) || matches!(o3, Orientation::Right);
  !(has_left && has_right)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn square() -> Polygon {
    Polygon::new(vec![
      Point::new(0.0, 0.0),
      Point::new(10.0, 0.0),
      Point::new(10.0, 10.0),
      Point::new(0.0, 10.0),
    ])
    .unwrap()
  }

  #[test]
  fn area_and_centroid_of_a_square() {
    let p = square();
    assert!((p.signed_area() - 100.0).abs() < 1e-9);
    let c = p.centroid();
    assert!((c.x - 5.0).abs() < 1e-9);
    assert!((c.y - 5.0).abs() < 1e-9);
  }

  #[test]
  fn clockwise_points_are_rejected() {
    let pts = vec![
      Point::new(0.0, 0.0),
      Point::new(0.0, 10.0),
      Point::new(10.0, 10.0),
      Point::new(10.0, 0.0),
    ];
    assert!(Polygon::new(pts).is_err());
  }

  #[test]
  fn ear_clipping_triangulates_a_square_into_two_triangles() {
    let p = square();
    let tris = p.triangulate_ear_clipping();
    assert_eq!(tris.len(), 2);
  }

  #[test]
  fn ear_clipping_count_is_n_minus_2() {
    // A simple "house" pentagon.
    let p = Polygon::new(vec![
      Point::new(0.0, 0.0),
      Point::new(10.0, 0.0),
      Point::new(10.0, 6.0),
      Point::new(5.0, 10.0),
      Point::new(0.0, 6.0),
    ])
    .unwrap();
    assert_eq!(p.triangulate_ear_clipping().len(), 3);
  }
}
