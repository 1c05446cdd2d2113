//! The numerically robust 2D predicate layer every higher-level decision in this crate
//! rests on (`spec.md` §4.1). Predicates never panic; degenerate inputs surface as a rich
//! enum variant or `None`, never a collapsed boolean, per the design note in `spec.md`
//! §9 ("do not collapse to bool inside the predicate layer").

use super::point::Point;
use super::segment::Segment;
use crate::tolerance::{approx_eq, approx_zero};

/// The turn direction of three points `(a, b, c)`, or — when they are collinear — where
/// `c` falls relative to the directed segment `a -> b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
  /// `c` is to the left of `a -> b` (CCW turn).
  Left,
  /// `c` is to the right of `a -> b` (CW turn).
  Right,
  /// `c` is collinear with `a -> b` and strictly between them.
  Between,
  /// `c` is collinear with `a -> b`, beyond `a` on the far side (before `a`).
  Behind,
  /// `c` is collinear with `a -> b`, beyond `b`.
  Beyond,
  /// `c` coincides with `a`.
  Origin,
  /// `c` coincides with `b`.
  Destination,
}
use Orientation::*;

impl Orientation {
  /// `true` for any of the four collinear sub-kinds.
  pub fn is_collinear(self) -> bool {
    matches!(self, Between | Behind | Beyond | Origin | Destination)
  }

  pub fn is_left_or_beyond(self) -> bool {
    matches!(self, Left | Beyond)
  }

  pub fn is_right_or_behind(self) -> bool {
    matches!(self, Right | Behind)
  }
}

/// Signed area of the triangle `(a, b, c)`, i.e. `0.5 * det(b - a, c - a)`. Positive for a
/// CCW-oriented triple, negative for CW, zero (within tolerance) for collinear points.
pub fn signed_area(a: &Point, b: &Point, c: &Point) -> f64 {
  0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
}

/// Orientation of `c` relative to the directed line `a -> b` (`spec.md` §4.1).
pub fn orientation(a: &Point, b: &Point, c: &Point) -> Orientation {
  let scale = (b.x - a.x).abs().max((b.y - a.y).abs()).max(1.0);
  let area = signed_area(a, b, c);
  if !approx_zero(area, scale * scale) {
    return if area > 0.0 { Left } else { Right };
  }
  if a == c {
    return Origin;
  }
  if b == c {
    return Destination;
  }
  let ab = (b.x - a.x, b.y - a.y);
  let ac = (c.x - a.x, c.y - a.y);
  if ab.0 * ac.0 < 0.0 || ab.1 * ac.1 < 0.0 {
    return Behind;
  }
  let len2_ab = ab.0 * ab.0 + ab.1 * ab.1;
  let len2_ac = ac.0 * ac.0 + ac.1 * ac.1;
  if len2_ab < len2_ac {
    Beyond
  } else {
    Between
  }
}

/// `|signed_area(a, b, c)| <= eps`.
pub fn collinear(a: &Point, b: &Point, c: &Point) -> bool {
  orientation(a, b, c).is_collinear()
}

fn left(seg: &Segment, p: &Point) -> bool {
  orientation(&seg.start, &seg.end, p) == Left
}

fn xor(a: bool, b: bool) -> bool {
  a != b
}

/// `true` when `s1` and `s2` properly cross, or an endpoint of one is collinear and
/// between the endpoints of the other, or an endpoint of one coincides with an endpoint
/// of the other.
pub fn intersection_exists(s1: &Segment, s2: &Segment) -> bool {
  let (a, b, c, d) = (s1.start, s1.end, s2.start, s2.end);
  if orientation(&a, &b, &c) == Between
    || orientation(&a, &b, &d) == Between
    || orientation(&c, &d, &a) == Between
    || orientation(&c, &d, &b) == Between
  {
    return true;
  }
  if a == c || a == d || b == c || b == d {
    return true;
  }
  strict_intersection_exists(s1, s2)
}

/// `true` only when `s1` and `s2` properly cross in their interiors; `false` for
/// coincident or collinear-touching endpoints.
pub fn strict_intersection_exists(s1: &Segment, s2: &Segment) -> bool {
  xor(left(s1, &s2.start), left(s1, &s2.end)) && xor(left(s2, &s1.start), left(s2, &s1.end))
}

/// The unique point where the (infinite) lines through `s1` and `s2` cross, via the
/// normal-form equation `n . (p - a) = n . AC / n . AB`. `None` when the lines are
/// parallel (the denominator is zero within tolerance).
pub fn compute_intersection(s1: &Segment, s2: &Segment) -> Option<Point> {
  let (a, b) = (s1.start, s1.end);
  let (c, d) = (s2.start, s2.end);
  let ab = (b.x - a.x, b.y - a.y);
  let cd = (d.x - c.x, d.y - c.y);
  let normal = (cd.1, -cd.0);
  let denominator = normal.0 * ab.0 + normal.1 * ab.1;
  let scale = ab.0.abs().max(ab.1.abs()).max(cd.0.abs()).max(cd.1.abs()).max(1.0);
  if approx_zero(denominator, scale * scale) {
    return None;
  }
  let ac = (c.x - a.x, c.y - a.y);
  let numerator = normal.0 * ac.0 + normal.1 * ac.1;
  let t = numerator / denominator;
  Some(Point::new(a.x + t * ab.0, a.y + t * ab.1))
}

/// Signed angle in `[-180, 180]` degrees from `s1`'s direction to `s2`'s direction; CCW
/// positive. Computed via `atan2(det, dot)` rather than `acos` of a normalized dot
/// product, which is both faster and well-behaved near 0 and 180 degrees.
pub fn angle(s1: &Segment, s2: &Segment) -> f64 {
  let u = (s1.end.x - s1.start.x, s1.end.y - s1.start.y);
  let v = (s2.end.x - s2.start.x, s2.end.y - s2.start.y);
  let det = u.0 * v.1 - u.1 * v.0;
  let dot = u.0 * v.0 + u.1 * v.1;
  det.atan2(dot).to_degrees()
}

/// The angle (degrees, signed as in [`angle`]) between vectors `a->b` and `b->c` — the
/// turn made at `b` while walking from `a` to `c`.
pub fn vertex_angle(a: &Point, b: &Point, c: &Point) -> f64 {
  angle(&Segment::new(*a, *b), &Segment::new(*b, *c))
}

/// The angle (degrees, in `[0, 180]`) subtended at `b` by the sides `b->a` and `b->c`.
pub fn subtended_angle(a: &Point, b: &Point, c: &Point) -> f64 {
  180.0 - vertex_angle(a, b, c).abs()
}

/// A line in the plane, represented as a point plus a direction vector.
#[derive(Debug, Clone, Copy)]
pub struct Line {
  pub origin: Point,
  pub direction: (f64, f64),
}

/// The perpendicular bisector of segment `(p1, p2)`.
pub fn bisector(p1: &Point, p2: &Point) -> Line {
  let mid = Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
  let d = (p2.x - p1.x, p2.y - p1.y);
  Line {
    origin: mid,
    direction: (-d.1, d.0),
  }
}

/// Coefficients `(a, b, c)` of `y = a*x^2 + b*x + c`, the parabola with the given `focus`
/// and horizontal `directrix_y`. `is_degenerate` is set (and `a = b = c = 0`) when the
/// focus lies on the directrix, in which case the "parabola" is really the vertical ray
/// through the focus (`spec.md` §4.6.5, "two sites at identical y").
#[derive(Debug, Clone, Copy)]
pub struct Parabola {
  pub a: f64,
  pub b: f64,
  pub c: f64,
  pub is_degenerate: bool,
}

impl Parabola {
  pub fn new(focus: Point, directrix_y: f64) -> Parabola {
    if approx_eq(focus.y, directrix_y) {
      return Parabola {
        a: 0.0,
        b: 0.0,
        c: 0.0,
        is_degenerate: true,
      };
    }
    let a = 0.5 / (focus.y - directrix_y);
    let b = -2.0 * focus.x * a;
    let c = (focus.x * focus.x + focus.y * focus.y - directrix_y * directrix_y) * a;
    Parabola {
      a,
      b,
      c,
      is_degenerate: false,
    }
  }

  pub fn eval(&self, x: f64) -> f64 {
    self.a * x * x + self.b * x + self.c
  }
}

/// Centre and radius of the circle through `a`, `b`, `c`, via the determinant form.
/// `None` when the three points are near-collinear (the denominator vanishes).
pub fn circumcircle(a: &Point, b: &Point, c: &Point) -> Option<(Point, f64)> {
  let ax2_ay2 = a.x * a.x + a.y * a.y;
  let bx2_by2 = b.x * b.x + b.y * b.y;
  let cx2_cy2 = c.x * c.x + c.y * c.y;

  let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
  let scale = a.x.abs().max(a.y.abs()).max(b.x.abs()).max(b.y.abs()).max(1.0);
  if approx_zero(d, scale * scale) {
    return None;
  }
  let ux = (ax2_ay2 * (b.y - c.y) + bx2_by2 * (c.y - a.y) + cx2_cy2 * (a.y - b.y)) / d;
  let uy = (ax2_ay2 * (c.x - b.x) + bx2_by2 * (a.x - c.x) + cx2_cy2 * (b.x - a.x)) / d;
  let centre = Point::new(ux, uy);
  let radius = centre.distance_to(a);
  Some((centre, radius))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn orientation_left() {
    let a = Point::new(-2.96, -1.48);
    let b = Point::new(5.044, 1.43);
    let c = Point::new(-3.02, 0.924);
    assert_eq!(orientation(&a, &b, &c), Left);
    // Even permutation: still Left.
    assert_eq!(orientation(&b, &c, &a), Left);
    assert_eq!(orientation(&c, &a, &b), Left);
    // Odd permutation: Right.
    assert_eq!(orientation(&a, &c, &b), Right);
    assert_eq!(orientation(&c, &b, &a), Right);
    assert_eq!(orientation(&b, &a, &c), Right);
  }

  #[test]
  fn area_antisymmetric() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);
    let c = Point::new(0.0, 1.0);
    assert!(approx_eq(signed_area(&a, &b, &c), -signed_area(&a, &c, &b)));
    assert!(approx_eq(signed_area(&a, &a, &c), 0.0));
  }

  #[test]
  fn collinear_implies_collinear_orientation() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(2.0, 2.0);
    let c = Point::new(1.0, 1.0);
    assert!(collinear(&a, &b, &c));
    assert!(orientation(&a, &b, &c).is_collinear());
  }

  #[test]
  fn intersection_is_symmetric() {
    let s1 = Segment::new(Point::new(0.0, 10.0), Point::new(10.0, 0.0));
    let s2 = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
    assert_eq!(intersection_exists(&s1, &s2), intersection_exists(&s2, &s1));
  }

  #[test]
  fn intersection_point_at_crossing() {
    let s1 = Segment::new(Point::new(0.0, 10.0), Point::new(10.0, 0.0));
    let s2 = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
    let p = compute_intersection(&s1, &s2).unwrap();
    assert!(approx_eq(p.x, 5.0));
    assert!(approx_eq(p.y, 5.0));
  }

  #[test]
  fn parallel_lines_have_no_intersection() {
    let s1 = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
    let s2 = Segment::new(Point::new(0.0, 1.0), Point::new(1.0, 2.0));
    assert!(compute_intersection(&s1, &s2).is_none());
  }

  #[test]
  fn circumcircle_unit_triangle() {
    let a = Point::new(1.0, 0.0);
    let b = Point::new(0.0, 1.0);
    let c = Point::new(-1.0, 0.0);
    let (centre, radius) = circumcircle(&a, &b, &c).unwrap();
    assert!(approx_eq(centre.x, 0.0));
    assert!(approx_eq(centre.y, 0.0));
    assert!(approx_eq(radius, 1.0));
  }

  #[test]
  fn circumcircle_collinear_is_none() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);
    let c = Point::new(2.0, 0.0);
    assert!(circumcircle(&a, &b, &c).is_none());
  }
}
